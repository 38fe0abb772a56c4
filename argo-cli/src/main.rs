mod matcher;
mod rank;

use anyhow::Result;
use clap::Command;
use tracing_subscriber::EnvFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "argo";
    pub const BIN_NAME: &str = "argo";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Rank submitted genomic regions by sequence, regulatory element and linked gene annotations.")
        .subcommand_required(true)
        .subcommand(rank::cli::create_rank_cli())
        .subcommand(matcher::cli::create_match_cli())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // RANK
        //
        Some((rank::cli::RANK_CMD, matches)) => {
            rank::handlers::run_rank(matches)?;
        }

        //
        // MATCH cCREs TO REGIONS
        //
        Some((matcher::cli::MATCH_CMD, matches)) => {
            matcher::handlers::run_match(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
