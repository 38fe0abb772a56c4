use clap::{Arg, Command};

pub const MATCH_CMD: &str = "match";

pub fn create_match_cli() -> Command {
    Command::new(MATCH_CMD)
        .about("Join cCRE intersection records back to submitted regions. Outputs TSV (chr, start, end, accession, class, regionID).")
        .arg(
            Arg::new("regions")
                .long("regions")
                .short('r')
                .required(true)
                .help("BED file of submitted regions"),
        )
        .arg(
            Arg::new("intersections")
                .long("intersections")
                .short('i')
                .required(true)
                .help("`bedtools intersect -wa -wb` output of cCREs against the regions"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .required(false)
                .help("Output TSV file (default: stdout)"),
        )
}
