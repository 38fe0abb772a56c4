use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use tracing::info;

use argo_core::models::RegionRegistry;
use argo_core::utils::{get_dynamic_reader, is_comment_line};
use argo_rank::matcher::{Ccre, match_intersections, matched_ccres, parse_intersection_line};

fn write_ccres<W: Write>(mut writer: W, ccres: &[Ccre]) -> Result<()> {
    for c in ccres {
        let class = c.class.as_ref().map(|c| c.to_string()).unwrap_or_else(|| ".".to_string());
        let region_id = c.region_id.as_ref().map(|id| id.to_string()).unwrap_or_default();
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}",
            c.chr, c.start, c.end, c.accession, class, region_id
        )?;
    }
    writer.flush()?;
    Ok(())
}

pub fn run_match(matches: &ArgMatches) -> Result<()> {
    let regions_path = matches
        .get_one::<String>("regions")
        .context("--regions is required")?;
    let intersections_path = matches
        .get_one::<String>("intersections")
        .context("--intersections is required")?;

    let registry = RegionRegistry::try_from(Path::new(regions_path))
        .with_context(|| format!("Failed to load regions from {}", regions_path))?;

    let reader = get_dynamic_reader(Path::new(intersections_path))
        .with_context(|| format!("Failed to open {}", intersections_path))?;

    let mut records: Vec<Vec<String>> = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if is_comment_line(&line) {
            continue;
        }
        records.push(parse_intersection_line(&line));
    }

    let all = match_intersections(&registry, &records);
    let total = all.len();
    let matched = matched_ccres(all);

    info!(
        "{} of {} cCREs matched a submitted region",
        matched.len(),
        total
    );

    match matches.get_one::<String>("output") {
        Some(p) => {
            let file = File::create(Path::new(p))
                .with_context(|| format!("Failed to create output file: {}", p))?;
            write_ccres(BufWriter::new(file), &matched)?;
            info!("Output written to {}", p);
        }
        None => {
            let stdout = io::stdout();
            write_ccres(stdout.lock(), &matched)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs::read_to_string;

    use tempfile::tempdir;

    use crate::matcher::cli::{MATCH_CMD, create_match_cli};

    #[test]
    fn test_run_match() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("matched.tsv");

        let matches = create_match_cli()
            .try_get_matches_from([
                MATCH_CMD,
                "--regions",
                "../tests/data/regions.bed",
                "--intersections",
                "../tests/data/intersections.tsv",
                "--output",
                output.to_str().unwrap(),
            ])
            .unwrap();

        run_match(&matches).unwrap();

        let text = read_to_string(&output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "chr1\t900\t1200\tEH38E1516972\tPLS\tR1",
                "chr1\t1950\t2300\tEH38E1517433\tCA-CTCF\tR2",
                "chr2\t480\t620\tEH38E2776514\tpELS\tR3",
            ]
        );
    }
}
