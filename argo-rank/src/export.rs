//! Tab-separated export of the aggregate table.

use std::io::Write;

use crate::aggregate::AggregateRow;
use crate::config::RankingConfig;

/// Header columns; category columns appear only for enabled categories.
pub fn header(config: &RankingConfig) -> Vec<&'static str> {
    let mut columns = vec!["regionID", "chr", "start", "end"];
    columns.extend(config.enabled_categories().iter().map(|c| c.rank_column()));
    columns.push("aggregateRank");
    columns
}

///
/// Write aggregate rows as TSV, one row per region.
///
/// Ranks are written as integers with 0 for unranked.
///
pub fn write_tsv<W: Write>(
    mut writer: W,
    rows: &[AggregateRow],
    config: &RankingConfig,
) -> std::io::Result<()> {
    let categories = config.enabled_categories();

    writeln!(writer, "{}", header(config).join("\t"))?;

    for row in rows {
        let mut fields = vec![
            row.region_id.to_string(),
            row.input_region.chr.clone(),
            row.input_region.start.to_string(),
            row.input_region.end.to_string(),
        ];
        fields.extend(categories.iter().map(|c| row.category_rank(*c).to_string()));
        fields.push(row.aggregate_rank.to_string());
        writeln!(writer, "{}", fields.join("\t"))?;
    }

    writer.flush()
}
