//! Element category: candidate cis-regulatory elements (cCREs) overlapping
//! each region.
//!
//! One region can overlap several cCREs. Their z-scores are combined into a
//! single value per region before ranking; ranking the raw rows would rank
//! elements, not regions.

use std::fmt::{self, Display};

use argo_core::models::{RegionId, RegionRegistry};
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Combine, ElementConfig};
use crate::models::{Category, CategoryInput, CategoryOutcome, CategoryState, loaded_rows};
use crate::rank::{Rank, ScoreOrder, rank_category, sum_and_rerank, to_ranked_regions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Assay {
    Dnase,
    Atac,
    H3k4me3,
    H3k27ac,
    Ctcf,
}

/// Per-assay z-scores of one cCRE in the selected biosample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssayScores {
    pub dnase: Option<f64>,
    pub atac: Option<f64>,
    pub h3k4me3: Option<f64>,
    pub h3k27ac: Option<f64>,
    pub ctcf: Option<f64>,
}

impl AssayScores {
    pub fn get(&self, assay: Assay) -> Option<f64> {
        match assay {
            Assay::Dnase => self.dnase,
            Assay::Atac => self.atac,
            Assay::H3k4me3 => self.h3k4me3,
            Assay::H3k27ac => self.h3k27ac,
            Assay::Ctcf => self.ctcf,
        }
    }
}

/// cCRE classification as published by ENCODE.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CcreClass {
    /// Promoter-like signature
    Pls,
    /// Proximal enhancer-like signature
    Pels,
    /// Distal enhancer-like signature
    Dels,
    CaH3k4me3,
    CaCtcf,
    CaTf,
    Ca,
    Tf,
    Other(String),
}

impl From<&str> for CcreClass {
    fn from(value: &str) -> Self {
        match value {
            "PLS" => CcreClass::Pls,
            "pELS" => CcreClass::Pels,
            "dELS" => CcreClass::Dels,
            "CA-H3K4me3" => CcreClass::CaH3k4me3,
            "CA-CTCF" => CcreClass::CaCtcf,
            "CA-TF" => CcreClass::CaTf,
            "CA" => CcreClass::Ca,
            "TF" => CcreClass::Tf,
            other => CcreClass::Other(other.to_string()),
        }
    }
}

impl From<String> for CcreClass {
    fn from(value: String) -> Self {
        CcreClass::from(value.as_str())
    }
}

impl From<CcreClass> for String {
    fn from(value: CcreClass) -> Self {
        value.to_string()
    }
}

impl Display for CcreClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CcreClass::Pls => "PLS",
            CcreClass::Pels => "pELS",
            CcreClass::Dels => "dELS",
            CcreClass::CaH3k4me3 => "CA-H3K4me3",
            CcreClass::CaCtcf => "CA-CTCF",
            CcreClass::CaTf => "CA-TF",
            CcreClass::Ca => "CA",
            CcreClass::Tf => "TF",
            CcreClass::Other(other) => other,
        };
        write!(f, "{}", s)
    }
}

/// One cCRE overlapping one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRow {
    #[serde(rename = "regionID")]
    pub region_id: RegionId,
    pub accession: String,
    pub class: CcreClass,
    #[serde(default)]
    pub orthologous: bool,
    #[serde(default)]
    pub z_scores: AssayScores,
}

impl ElementRow {
    /// True when the row survives the class and ortholog filters.
    pub fn passes_filters(&self, config: &ElementConfig) -> bool {
        if config.require_ortholog && !self.orthologous {
            return false;
        }
        if config.exclude_classes.contains(&self.class) {
            return false;
        }
        match &config.classes {
            Some(classes) => classes.contains(&self.class),
            None => true,
        }
    }
}

///
/// Combine the `assay` z-scores of all cCREs per region.
///
/// Returns one `(region, value)` pair per region that has at least one
/// finite z-score, in order of first appearance.
///
pub fn combine_elements<'a, I>(rows: I, assay: Assay, policy: Combine) -> Vec<(RegionId, f64)>
where
    I: IntoIterator<Item = &'a ElementRow>,
{
    let mut order: Vec<RegionId> = Vec::new();
    let mut values: FxHashMap<RegionId, Vec<f64>> = FxHashMap::default();

    for row in rows {
        let Some(z) = row.z_scores.get(assay).filter(|z| z.is_finite()) else {
            continue;
        };
        values
            .entry(row.region_id.clone())
            .or_insert_with(|| {
                order.push(row.region_id.clone());
                Vec::new()
            })
            .push(z);
    }

    order
        .into_iter()
        .filter_map(|id| {
            let combined = policy.apply(values.remove(&id).unwrap_or_default())?;
            Some((id, combined))
        })
        .collect()
}

///
/// Rank the element category.
///
/// Rows for unknown regions are dropped first. The class and ortholog
/// filters then remove rows outright; if they remove every remaining row
/// the outcome is [CategoryState::FullyFiltered]. Each selected assay is
/// combined per region and ranked highest first. With several assays the
/// per-assay ranks are summed and re-ranked, lowest sum first.
///
pub fn rank_elements(
    registry: &RegionRegistry,
    input: &CategoryInput<ElementRow>,
    config: &ElementConfig,
) -> CategoryOutcome {
    let mut assays: Vec<Assay> = Vec::new();
    for assay in &config.assays {
        if !assays.contains(assay) {
            assays.push(*assay);
        }
    }
    if assays.is_empty() {
        return CategoryOutcome::unranked(Category::Element, CategoryState::Disabled, registry);
    }

    let rows = match loaded_rows(Category::Element, config.enabled, input, registry) {
        Ok(rows) => rows,
        Err(outcome) => return outcome,
    };

    let candidates: Vec<&ElementRow> = rows
        .iter()
        .filter(|row| {
            let known = registry.contains(&row.region_id);
            if !known {
                debug!("dropping cCRE {} for unknown region {}", row.accession, row.region_id);
            }
            known
        })
        .collect();
    if candidates.is_empty() {
        return CategoryOutcome::unranked(Category::Element, CategoryState::Empty, registry);
    }

    let kept: Vec<&ElementRow> = candidates
        .into_iter()
        .filter(|row| row.passes_filters(config))
        .collect();
    if kept.is_empty() {
        return CategoryOutcome::unranked(
            Category::Element,
            CategoryState::FullyFiltered,
            registry,
        );
    }

    let columns: Vec<Vec<Rank>> = assays
        .iter()
        .map(|assay| {
            let combined = combine_elements(kept.iter().copied(), *assay, config.combine);
            rank_category(
                registry,
                combined.iter().map(|(id, v)| (id, Some(*v))),
                ScoreOrder::Descending,
                true,
            )
            .into_iter()
            .map(|r| r.rank)
            .collect()
        })
        .collect();

    let ranks = match columns.as_slice() {
        [single] => single.clone(),
        many => {
            let refs: Vec<&[Rank]> = many.iter().map(Vec::as_slice).collect();
            sum_and_rerank(&refs)
        }
    };

    CategoryOutcome::from_ranks(Category::Element, to_ranked_regions(registry, &ranks))
}
