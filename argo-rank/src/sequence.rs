//! Sequence category: conservation and transcription factor motif disruption.

use argo_core::models::{Coordinates, RegionId, RegionRegistry};
use serde::{Deserialize, Serialize};

use crate::config::SequenceConfig;
use crate::models::{
    Category, CategoryInput, CategoryOutcome, CategoryState, first_rows, loaded_rows,
};
use crate::rank::{ScoreOrder, finite_score, rank_category};

/// Score field the sequence category is ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceField {
    Conservation,
    MotifDisruption,
}

/// Match scores of one motif against the reference and alternate allele.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotifHit {
    pub motif: String,
    pub ref_score: Option<f64>,
    pub alt_score: Option<f64>,
}

impl MotifHit {
    /// `|ref - alt|`, when both scores are finite.
    pub fn disruption(&self) -> Option<f64> {
        let reference = finite_score(self.ref_score)?;
        let alternate = finite_score(self.alt_score)?;
        Some((reference - alternate).abs())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceRow {
    #[serde(rename = "regionID")]
    pub region_id: RegionId,
    #[serde(rename = "inputRegion")]
    pub input_region: Coordinates,
    #[serde(default)]
    pub conservation: Option<f64>,
    #[serde(default)]
    pub motifs: Vec<MotifHit>,
}

impl SequenceRow {
    /// Largest disruption over all motif hits at this region.
    pub fn motif_disruption(&self) -> Option<f64> {
        self.motifs
            .iter()
            .filter_map(MotifHit::disruption)
            .fold(None, |best, d| Some(best.map_or(d, |b: f64| b.max(d))))
    }

    /// The scalar this row is ranked by for `field`.
    pub fn score(&self, field: SequenceField) -> Option<f64> {
        match field {
            SequenceField::Conservation => finite_score(self.conservation),
            SequenceField::MotifDisruption => self.motif_disruption(),
        }
    }
}

///
/// Rank the sequence category.
///
/// Each region is reduced to one scalar by [SequenceConfig::ranking_field]
/// and ranked highest first. Regions without a usable value stay unranked.
/// Only the first row of a region is used.
///
pub fn rank_sequence(
    registry: &RegionRegistry,
    input: &CategoryInput<SequenceRow>,
    config: &SequenceConfig,
) -> CategoryOutcome {
    let Some(field) = config.ranking_field() else {
        return CategoryOutcome::unranked(Category::Sequence, CategoryState::Disabled, registry);
    };

    let rows = match loaded_rows(Category::Sequence, true, input, registry) {
        Ok(rows) => rows,
        Err(outcome) => return outcome,
    };

    let rows = first_rows(rows, |row| &row.region_id);
    let scored = rows.iter().map(|row| (&row.region_id, row.score(field)));
    let ranks = rank_category(registry, scored, ScoreOrder::Descending, true);

    CategoryOutcome::from_ranks(Category::Sequence, ranks)
}
