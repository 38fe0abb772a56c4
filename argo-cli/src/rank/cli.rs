use clap::{Arg, Command};

pub const RANK_CMD: &str = "rank";

pub fn create_rank_cli() -> Command {
    Command::new(RANK_CMD)
        .about("Rank regions in every enabled category and aggregate the ranks. Outputs TSV (regionID, chr, start, end, category ranks, aggregateRank).")
        .arg(
            Arg::new("regions")
                .long("regions")
                .short('r')
                .required(true)
                .help("BED file of submitted regions (chr, start, end, [regionID, ref, alt, strand])"),
        )
        .arg(
            Arg::new("sequence")
                .long("sequence")
                .required(false)
                .help("JSON array of sequence rows (conservation, motif scores)"),
        )
        .arg(
            Arg::new("elements")
                .long("elements")
                .required(false)
                .help("JSON array of cCRE rows with assay z-scores"),
        )
        .arg(
            Arg::new("genes")
                .long("genes")
                .required(false)
                .help("JSON array of linked gene rows"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .required(false)
                .help("Ranking configuration, `.toml` or `.json` (default: all categories enabled)"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .required(false)
                .help("Output TSV file (default: stdout)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .required(false)
                .num_args(0)
                .help("Write the full ranking result as JSON instead of TSV"),
        )
}
