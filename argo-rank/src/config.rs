//! Ranking configuration: which categories and sub-criteria are active.

use std::ffi::OsStr;
use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::element::{Assay, CcreClass};
use crate::errors::{ConfigError, ConfigResult};
use crate::models::Category;
use crate::rank::ScoreOrder;
use crate::sequence::SequenceField;

/// How several values for one region collapse into one.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Combine {
    #[default]
    Max,
    Average,
}

impl Combine {
    /// Combine finite values; `None` when there are none.
    pub fn apply<I: IntoIterator<Item = f64>>(&self, values: I) -> Option<f64> {
        let mut count: usize = 0;
        let mut acc = match self {
            Combine::Max => f64::NEG_INFINITY,
            Combine::Average => 0.0,
        };

        for v in values.into_iter().filter(|v| v.is_finite()) {
            count += 1;
            match self {
                Combine::Max => acc = acc.max(v),
                Combine::Average => acc += v,
            }
        }

        match (count, self) {
            (0, _) => None,
            (_, Combine::Max) => Some(acc),
            (n, Combine::Average) => Some(acc / n as f64),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SequenceConfig {
    pub enabled: bool,
    /// Rank by conservation at the locus.
    pub conservation: bool,
    /// Rank by motif disruption between reference and alternate allele.
    pub motifs: bool,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        SequenceConfig {
            enabled: true,
            conservation: true,
            motifs: false,
        }
    }
}

impl SequenceConfig {
    ///
    /// The field the sequence category is ranked by.
    ///
    /// Conservation wins when both conservation and motifs are switched on;
    /// motif scores are then informational only. Callers should surface the
    /// returned field rather than assume one.
    ///
    pub fn ranking_field(&self) -> Option<SequenceField> {
        match (self.enabled, self.conservation, self.motifs) {
            (false, _, _) => None,
            (true, true, _) => Some(SequenceField::Conservation),
            (true, false, true) => Some(SequenceField::MotifDisruption),
            (true, false, false) => None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ElementConfig {
    pub enabled: bool,
    /// Assays whose z-scores are ranked; more than one are combined.
    pub assays: Vec<Assay>,
    /// How overlapping cCREs of one region are combined.
    pub combine: Combine,
    /// Keep only cCREs of these classes. `None` keeps every class.
    pub classes: Option<Vec<CcreClass>>,
    /// Drop cCREs of these classes, applied after `classes`.
    pub exclude_classes: Vec<CcreClass>,
    /// Keep only cCREs with a mouse ortholog.
    pub require_ortholog: bool,
}

impl Default for ElementConfig {
    fn default() -> Self {
        ElementConfig {
            enabled: true,
            assays: vec![Assay::Dnase],
            combine: Combine::Max,
            classes: None,
            exclude_classes: Vec::new(),
            require_ortholog: false,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GeneConfig {
    pub enabled: bool,
    pub specificity: bool,
    pub expression: bool,
    pub linked_genes: bool,
    /// How expression of several linked genes is reduced per region.
    pub expression_policy: Combine,
    /// `descending` ranks regions with more linked genes first.
    pub linked_genes_order: ScoreOrder,
}

impl Default for GeneConfig {
    fn default() -> Self {
        GeneConfig {
            enabled: true,
            specificity: true,
            expression: true,
            linked_genes: true,
            expression_policy: Combine::Max,
            linked_genes_order: ScoreOrder::Descending,
        }
    }
}

///
/// The complete filter configuration for one ranking pass.
///
/// Immutable; a change in any toggle means building a new config and
/// running the pipeline again.
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct RankingConfig {
    pub sequence: SequenceConfig,
    pub element: ElementConfig,
    pub gene: GeneConfig,
}

impl RankingConfig {
    pub fn is_enabled(&self, category: Category) -> bool {
        match category {
            Category::Sequence => self.sequence.enabled,
            Category::Element => self.element.enabled,
            Category::Gene => self.gene.enabled,
        }
    }

    /// Enabled categories in their fixed column order.
    pub fn enabled_categories(&self) -> Vec<Category> {
        [Category::Sequence, Category::Element, Category::Gene]
            .into_iter()
            .filter(|c| self.is_enabled(*c))
            .collect()
    }
}

#[derive(Debug)]
pub enum ConfigFileType {
    Toml,
    Json,
}

impl ConfigFileType {
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(OsStr::to_str) {
            Some("toml") => Ok(ConfigFileType::Toml),
            Some("json") => Ok(ConfigFileType::Json),
            _ => Err(ConfigError::InvalidFileType),
        }
    }
}

impl TryFrom<&Path> for RankingConfig {
    type Error = ConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let file_type = ConfigFileType::from_path(path)?;
        let raw = read_to_string(path)?;
        let config = match file_type {
            ConfigFileType::Toml => toml::from_str(&raw)?,
            ConfigFileType::Json => serde_json::from_str(&raw)?,
        };
        Ok(config)
    }
}
