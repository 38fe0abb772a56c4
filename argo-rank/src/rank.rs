//! Dense competition ranking.
//!
//! Every ranking pass in the engine goes through [rank_scores]: the three
//! categories, the gene and element sub-criteria, and the final aggregate.
//! Ranks follow the "1224" rule: tied scores share a rank and the next
//! distinct score takes its position in the sorted list plus one, so a
//! three-way tie at rank 1 is followed by rank 4.
//!
//! [Rank::Unranked] is the only representation of "no applicable rank".
//! It is a separate variant rather than an integer 0 so that a category
//! that was disabled, or a region that had no data, can never be mistaken
//! for one that tied for best.

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::num::NonZeroU32;

use argo_core::models::{Region, RegionId, RegionRegistry};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum Rank {
    #[default]
    Unranked,
    Ranked(NonZeroU32),
}

impl Rank {
    /// The integer form used at the export boundary, 0 for [Rank::Unranked].
    pub fn value(&self) -> u32 {
        match self {
            Rank::Unranked => 0,
            Rank::Ranked(r) => r.get(),
        }
    }

    pub fn get(&self) -> Option<NonZeroU32> {
        match self {
            Rank::Unranked => None,
            Rank::Ranked(r) => Some(*r),
        }
    }

    pub fn is_ranked(&self) -> bool {
        matches!(self, Rank::Ranked(_))
    }
}

impl From<u32> for Rank {
    fn from(value: u32) -> Self {
        NonZeroU32::new(value).map_or(Rank::Unranked, Rank::Ranked)
    }
}

impl From<Rank> for u32 {
    fn from(value: Rank) -> Self {
        value.value()
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Which end of the score range ranks first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreOrder {
    /// Highest score gets rank 1.
    #[default]
    Descending,
    /// Lowest score gets rank 1.
    Ascending,
}

impl ScoreOrder {
    /// Ordering that puts the better of `a` and `b` first.
    pub fn compare<S: PartialOrd>(&self, a: &S, b: &S) -> Ordering {
        let ord = match self {
            ScoreOrder::Descending => b.partial_cmp(a),
            ScoreOrder::Ascending => a.partial_cmp(b),
        };
        ord.unwrap_or(Ordering::Equal)
    }
}

/// One region's rank within a single category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedRegion {
    #[serde(rename = "regionID")]
    pub region_id: RegionId,
    pub chr: String,
    pub start: u32,
    pub end: u32,
    pub rank: Rank,
}

impl RankedRegion {
    pub fn new(region: &Region, rank: Rank) -> Self {
        RankedRegion {
            region_id: region.id.clone(),
            chr: region.chr.clone(),
            start: region.start,
            end: region.end,
            rank,
        }
    }
}

/// Drop NaN and infinities; they must never reach a comparison.
pub fn finite_score(score: Option<f64>) -> Option<f64> {
    score.filter(|s| s.is_finite())
}

///
/// Dense competition ranking over scores indexed by registry position.
///
/// `None` entries and entries for which `exempt` returns true are left
/// [Rank::Unranked] and take no position in the ordering. Ties in the sort
/// are broken by position so the result is deterministic.
///
/// # Arguments
/// - scores: one optional score per region, in registry order
/// - order: whether high or low scores rank first
/// - exempt: predicate for scores that must stay out of the competition
pub fn rank_scores<S, F>(scores: &[Option<S>], order: ScoreOrder, exempt: F) -> Vec<Rank>
where
    S: PartialOrd + Copy,
    F: Fn(&S) -> bool,
{
    let mut scored: Vec<(usize, S)> = scores
        .iter()
        .enumerate()
        .filter_map(|(idx, score)| match score {
            Some(s) if !exempt(s) => Some((idx, *s)),
            _ => None,
        })
        .collect();

    scored.sort_by(|a, b| order.compare(&a.1, &b.1).then(a.0.cmp(&b.0)));

    let mut ranks = vec![Rank::Unranked; scores.len()];
    let mut current_rank: u32 = 1;

    for (pos, &(idx, score)) in scored.iter().enumerate() {
        if pos > 0 && order.compare(&score, &scored[pos - 1].1) != Ordering::Equal {
            current_rank = pos as u32 + 1;
        }
        ranks[idx] = Rank::from(current_rank);
    }

    ranks
}

///
/// Sum several rank columns per region and re-rank the sums, lowest first.
///
/// Unranked entries add nothing to a sum, so a missing sub-criterion does
/// not penalize a region. A region whose every column is unranked has a
/// sum of 0 and stays unranked instead of tying for first.
///
pub fn sum_and_rerank(columns: &[&[Rank]]) -> Vec<Rank> {
    let len = columns.iter().map(|c| c.len()).max().unwrap_or(0);

    let totals: Vec<Option<u32>> = (0..len)
        .map(|idx| {
            Some(
                columns
                    .iter()
                    .map(|c| c.get(idx).map_or(0, Rank::value))
                    .sum(),
            )
        })
        .collect();

    rank_scores(&totals, ScoreOrder::Ascending, |total| *total == 0)
}

/// Line up `(region, score)` pairs with registry positions.
///
/// Pairs for regions outside the registry and non-finite scores are dropped.
/// When a region appears more than once the first usable score wins.
pub fn scores_by_position<'a, I>(registry: &RegionRegistry, scored: I) -> Vec<Option<f64>>
where
    I: IntoIterator<Item = (&'a RegionId, Option<f64>)>,
{
    let mut scores: Vec<Option<f64>> = vec![None; registry.len()];

    for (region_id, score) in scored {
        let Some(idx) = registry.position(region_id) else {
            debug!("dropping score for unknown region {}", region_id);
            continue;
        };
        let Some(score) = finite_score(score) else {
            continue;
        };
        match scores[idx] {
            Some(_) => debug!("ignoring duplicate score for region {}", region_id),
            None => scores[idx] = Some(score),
        }
    }

    scores
}

/// Every region in the registry, unranked.
pub fn unranked(registry: &RegionRegistry) -> Vec<RankedRegion> {
    registry
        .iter()
        .map(|region| RankedRegion::new(region, Rank::Unranked))
        .collect()
}

/// Attach a rank column (registry order) to the registry's regions.
pub fn to_ranked_regions(registry: &RegionRegistry, ranks: &[Rank]) -> Vec<RankedRegion> {
    registry
        .iter()
        .enumerate()
        .map(|(idx, region)| {
            RankedRegion::new(region, ranks.get(idx).copied().unwrap_or_default())
        })
        .collect()
}

///
/// Rank one category's scores over the whole registry.
///
/// A disabled category, or one without a single usable score, leaves every
/// region unranked. Otherwise scored regions are ranked in `order` and the
/// rest stay unranked.
///
pub fn rank_category<'a, I>(
    registry: &RegionRegistry,
    scored: I,
    order: ScoreOrder,
    enabled: bool,
) -> Vec<RankedRegion>
where
    I: IntoIterator<Item = (&'a RegionId, Option<f64>)>,
{
    if !enabled {
        return unranked(registry);
    }

    let scores = scores_by_position(registry, scored);
    if scores.iter().all(Option::is_none) {
        return unranked(registry);
    }

    to_ranked_regions(registry, &rank_scores(&scores, order, |_| false))
}
