//! The ranking pipeline, from category rows to aggregate rows in one call.

use argo_core::models::RegionRegistry;
use serde::Serialize;
use tracing::{info, warn};

use crate::aggregate::{AggregateRow, aggregate};
use crate::config::RankingConfig;
use crate::element::{ElementRow, rank_elements};
use crate::gene::{GeneRow, rank_genes};
use crate::models::{CategoryInput, CategoryOutcome, CategoryState};
use crate::sequence::{SequenceField, SequenceRow, rank_sequence};

/// Everything the query layer has delivered so far, per category.
#[derive(Debug, Clone, Default)]
pub struct CategoryRows {
    pub sequence: CategoryInput<SequenceRow>,
    pub elements: CategoryInput<ElementRow>,
    pub genes: CategoryInput<GeneRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingResult {
    /// Field the sequence category was ranked by, if any.
    pub sequence_field: Option<SequenceField>,
    pub sequence: CategoryOutcome,
    pub element: CategoryOutcome,
    pub gene: CategoryOutcome,
    pub aggregate: Vec<AggregateRow>,
}

impl RankingResult {
    pub fn outcomes(&self) -> [&CategoryOutcome; 3] {
        [&self.sequence, &self.element, &self.gene]
    }
}

fn log_outcome(outcome: &CategoryOutcome) {
    match &outcome.state {
        CategoryState::Failed(message) => {
            warn!("{} category failed upstream: {}", outcome.category, message)
        }
        CategoryState::Ranked => info!(
            "{} category ranked {} of {} regions",
            outcome.category,
            outcome.ranks.iter().filter(|r| r.rank.is_ranked()).count(),
            outcome.ranks.len()
        ),
        state => info!("{} category not ranked: {:?}", outcome.category, state),
    }
}

///
/// Run the full ranking pipeline.
///
/// A pure function of its inputs: the same registry, rows and config always
/// give the same result, and nothing is cached between calls. Callers re-run
/// it whenever regions, rows or filters change.
///
pub fn rank_regions(
    registry: &RegionRegistry,
    rows: &CategoryRows,
    config: &RankingConfig,
) -> RankingResult {
    let sequence = rank_sequence(registry, &rows.sequence, &config.sequence);
    let element = rank_elements(registry, &rows.elements, &config.element);
    let gene = rank_genes(registry, &rows.genes, &config.gene);

    for outcome in [&sequence, &element, &gene] {
        log_outcome(outcome);
    }

    let aggregate = aggregate(registry, &sequence, &element, &gene, config);

    RankingResult {
        sequence_field: config.sequence.ranking_field(),
        sequence,
        element,
        gene,
        aggregate,
    }
}
