use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::de::DeserializeOwned;
use tracing::info;

use argo_core::models::RegionRegistry;
use argo_rank::export::write_tsv;
use argo_rank::{CategoryInput, CategoryRows, RankingConfig, RankingResult, rank_regions};

/// Rows for one category: pending when no file was given.
fn category_input<T: DeserializeOwned>(matches: &ArgMatches, arg: &str) -> CategoryInput<T> {
    match matches.get_one::<String>(arg) {
        Some(path) => CategoryInput::from_json_path(Path::new(path)),
        None => CategoryInput::Pending,
    }
}

fn write_result<W: Write>(
    mut writer: W,
    result: &RankingResult,
    config: &RankingConfig,
    json: bool,
) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut writer, result)?;
        writeln!(writer)?;
        writer.flush()?;
    } else {
        write_tsv(writer, &result.aggregate, config)?;
    }
    Ok(())
}

pub fn run_rank(matches: &ArgMatches) -> Result<()> {
    let regions_path = matches
        .get_one::<String>("regions")
        .context("--regions is required")?;

    let registry = RegionRegistry::try_from(Path::new(regions_path))
        .with_context(|| format!("Failed to load regions from {}", regions_path))?;

    let config = match matches.get_one::<String>("config") {
        Some(p) => RankingConfig::try_from(Path::new(p))
            .with_context(|| format!("Failed to load ranking config {}", p))?,
        None => RankingConfig::default(),
    };

    let rows = CategoryRows {
        sequence: category_input(matches, "sequence"),
        elements: category_input(matches, "elements"),
        genes: category_input(matches, "genes"),
    };

    info!("Ranking {} regions...", registry.len());

    let result = rank_regions(&registry, &rows, &config);

    if let Some(field) = result.sequence_field {
        info!("Sequence category ranked by {:?}", field);
    }

    let json = matches.get_flag("json");
    match matches.get_one::<String>("output") {
        Some(p) => {
            let file = File::create(Path::new(p))
                .with_context(|| format!("Failed to create output file: {}", p))?;
            write_result(BufWriter::new(file), &result, &config, json)?;
            info!("Output written to {}", p);
        }
        None => {
            let stdout = io::stdout();
            write_result(stdout.lock(), &result, &config, json)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs::read_to_string;

    use tempfile::tempdir;

    use crate::rank::cli::{RANK_CMD, create_rank_cli};

    #[test]
    fn test_run_rank_to_file() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("ranks.tsv");

        let matches = create_rank_cli()
            .try_get_matches_from([
                RANK_CMD,
                "--regions",
                "../tests/data/regions.bed",
                "--sequence",
                "../tests/data/sequence.json",
                "--genes",
                "../tests/data/genes.json",
                "--output",
                output.to_str().unwrap(),
            ])
            .unwrap();

        run_rank(&matches).unwrap();

        let text = read_to_string(&output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines[0],
            "regionID\tchr\tstart\tend\tsequenceRank\telementRank\tgeneRank\taggregateRank"
        );
        // elements were never supplied, so that column is all zero
        assert!(lines[1..].iter().all(|l| l.split('\t').nth(5) == Some("0")));
    }

    #[test]
    fn test_broken_category_file_does_not_abort() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join("genes.json");
        std::fs::write(&broken, "{ not json").unwrap();
        let output = dir.path().join("ranks.json");

        let matches = create_rank_cli()
            .try_get_matches_from([
                RANK_CMD,
                "--regions",
                "../tests/data/regions.bed",
                "--genes",
                broken.to_str().unwrap(),
                "--output",
                output.to_str().unwrap(),
                "--json",
            ])
            .unwrap();

        run_rank(&matches).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&read_to_string(&output).unwrap()).unwrap();
        assert_eq!(value["gene"]["state"]["state"], "failed");
        assert_eq!(value["aggregate"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_missing_regions_file_errors() {
        let matches = create_rank_cli()
            .try_get_matches_from([RANK_CMD, "--regions", "does/not/exist.bed"])
            .unwrap();
        assert!(run_rank(&matches).is_err());
    }
}
