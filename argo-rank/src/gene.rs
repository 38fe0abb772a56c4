//! Gene category: genes linked to each region.
//!
//! Three sub-criteria are ranked independently (expression specificity,
//! expression level, number of linked genes), summed per region and the
//! sums re-ranked into the gene category rank.

use std::collections::HashSet;

use argo_core::models::{Coordinates, RegionId, RegionRegistry};
use serde::{Deserialize, Serialize};

use crate::config::{Combine, GeneConfig};
use crate::models::{
    Category, CategoryInput, CategoryOutcome, CategoryState, first_rows, loaded_rows,
};
use crate::rank::{Rank, ScoreOrder, rank_category, sum_and_rerank, to_ranked_regions};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedGene {
    pub gene: String,
    /// Linkage method, e.g. distance, chromatin contact or eQTL.
    #[serde(default)]
    pub method: Option<String>,
    /// Expression in TPM in the selected biosample.
    #[serde(default)]
    pub expression: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneRow {
    #[serde(rename = "regionID")]
    pub region_id: RegionId,
    #[serde(rename = "inputRegion")]
    pub input_region: Coordinates,
    #[serde(default, rename = "expressionSpecificity")]
    pub expression_specificity: Option<f64>,
    #[serde(default, rename = "linkedGenes")]
    pub linked_genes: Vec<LinkedGene>,
}

impl GeneRow {
    /// Number of distinct linked genes; `None` when there are none.
    pub fn linked_gene_count(&self) -> Option<f64> {
        let distinct: HashSet<&str> = self.linked_genes.iter().map(|g| g.gene.as_str()).collect();
        match distinct.len() {
            0 => None,
            n => Some(n as f64),
        }
    }
}

/// Reduce the expression of all linked genes to one value.
pub fn reduce_expression(genes: &[LinkedGene], policy: Combine) -> Option<f64> {
    policy.apply(genes.iter().filter_map(|g| g.expression))
}

/// The three gene sub-ranks of one region and their sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneSubRanks {
    #[serde(rename = "regionID")]
    pub region_id: RegionId,
    pub specificity_rank: Rank,
    pub max_exp_rank: Rank,
    pub linked_genes_rank: Rank,
    pub total_rank: u32,
}

fn sub_rank_column<F>(
    registry: &RegionRegistry,
    rows: &[&GeneRow],
    order: ScoreOrder,
    enabled: bool,
    score: F,
) -> Vec<Rank>
where
    F: Fn(&GeneRow) -> Option<f64>,
{
    rank_category(
        registry,
        rows.iter().map(|&row| (&row.region_id, score(row))),
        order,
        enabled,
    )
    .into_iter()
    .map(|r| r.rank)
    .collect()
}

///
/// Compute the specificity, expression and linked-gene sub-ranks.
///
/// A sub-criterion switched off in `config` is unranked for every region.
/// Only the first row of a region is used, so all three sub-ranks of a
/// region come from the same row.
///
pub fn sub_ranks(
    registry: &RegionRegistry,
    rows: &[GeneRow],
    config: &GeneConfig,
) -> Vec<GeneSubRanks> {
    let rows = first_rows(rows, |row| &row.region_id);
    let rows = rows.as_slice();

    let specificity = sub_rank_column(
        registry,
        rows,
        ScoreOrder::Descending,
        config.specificity,
        |row: &GeneRow| row.expression_specificity,
    );
    let expression = sub_rank_column(
        registry,
        rows,
        ScoreOrder::Descending,
        config.expression,
        |row: &GeneRow| reduce_expression(&row.linked_genes, config.expression_policy),
    );
    let linked = sub_rank_column(
        registry,
        rows,
        config.linked_genes_order,
        config.linked_genes,
        GeneRow::linked_gene_count,
    );

    registry
        .iter()
        .enumerate()
        .map(|(idx, region)| GeneSubRanks {
            region_id: region.id.clone(),
            specificity_rank: specificity[idx],
            max_exp_rank: expression[idx],
            linked_genes_rank: linked[idx],
            total_rank: specificity[idx].value() + expression[idx].value() + linked[idx].value(),
        })
        .collect()
}

///
/// Rank the gene category.
///
/// Sub-ranks are summed with unranked sub-criteria adding 0, so a missing
/// value never penalizes a region. Totals are re-ranked lowest first; a
/// total of 0 means the region had no gene data at all and it stays
/// unranked.
///
pub fn rank_genes(
    registry: &RegionRegistry,
    input: &CategoryInput<GeneRow>,
    config: &GeneConfig,
) -> CategoryOutcome {
    if !(config.specificity || config.expression || config.linked_genes) {
        return CategoryOutcome::unranked(Category::Gene, CategoryState::Disabled, registry);
    }

    let rows = match loaded_rows(Category::Gene, config.enabled, input, registry) {
        Ok(rows) => rows,
        Err(outcome) => return outcome,
    };

    let subs = sub_ranks(registry, rows, config);
    let specificity: Vec<Rank> = subs.iter().map(|s| s.specificity_rank).collect();
    let expression: Vec<Rank> = subs.iter().map(|s| s.max_exp_rank).collect();
    let linked: Vec<Rank> = subs.iter().map(|s| s.linked_genes_rank).collect();

    let ranks = sum_and_rerank(&[&specificity[..], &expression[..], &linked[..]]);

    CategoryOutcome::from_ranks(Category::Gene, to_ranked_regions(registry, &ranks))
}
