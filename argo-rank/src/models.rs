use std::fmt::{self, Display};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use argo_core::models::{RegionId, RegionRegistry};
use fxhash::FxHashSet;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::RankError;
use crate::rank::{Rank, RankedRegion, unranked};

/// The three independent annotation axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Sequence,
    Element,
    Gene,
}

impl Category {
    /// Column name used in exported tables.
    pub fn rank_column(&self) -> &'static str {
        match self {
            Category::Sequence => "sequenceRank",
            Category::Element => "elementRank",
            Category::Gene => "geneRank",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Sequence => write!(f, "sequence"),
            Category::Element => write!(f, "element"),
            Category::Gene => write!(f, "gene"),
        }
    }
}

///
/// Rows for one category as handed over by the query layer.
///
/// `Pending` means the rows have not arrived yet and `Failed` carries the
/// upstream error. Neither is an engine error: both leave the category
/// contributing nothing to the aggregate.
///
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryInput<T> {
    Pending,
    Failed(String),
    Loaded(Vec<T>),
}

impl<T> Default for CategoryInput<T> {
    fn default() -> Self {
        CategoryInput::Pending
    }
}

impl<T> From<Vec<T>> for CategoryInput<T> {
    fn from(rows: Vec<T>) -> Self {
        CategoryInput::Loaded(rows)
    }
}

impl<T: DeserializeOwned> CategoryInput<T> {
    ///
    /// Load category rows from a JSON array on disk.
    ///
    /// A file that can't be read or parsed becomes [CategoryInput::Failed]
    /// so one broken category never blocks the others.
    ///
    pub fn from_json_path(path: &Path) -> Self {
        match read_rows(path) {
            Ok(rows) => CategoryInput::Loaded(rows),
            Err(e) => {
                warn!("failed to load rows from {}: {}", path.display(), e);
                CategoryInput::Failed(e.to_string())
            }
        }
    }
}

/// Read a JSON array of rows.
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, RankError> {
    let file = File::open(path)?;
    let rows = serde_json::from_reader(BufReader::new(file))?;
    Ok(rows)
}

/// Where a category ended up after ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum CategoryState {
    /// Turned off in the configuration.
    Disabled,
    /// Rows not supplied yet.
    Pending,
    /// Upstream query failed.
    Failed(String),
    /// Rows supplied, but no region had a usable score.
    Empty,
    /// Rows supplied, and the class/ortholog filters removed all of them.
    FullyFiltered,
    Ranked,
}

/// Ranks for one category, covering every region in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryOutcome {
    pub category: Category,
    pub state: CategoryState,
    pub ranks: Vec<RankedRegion>,
}

impl CategoryOutcome {
    /// An outcome in which no region is ranked.
    pub fn unranked(category: Category, state: CategoryState, registry: &RegionRegistry) -> Self {
        CategoryOutcome {
            category,
            state,
            ranks: unranked(registry),
        }
    }

    ///
    /// Wrap a computed rank list, downgrading to [CategoryState::Empty] when
    /// nothing in it is actually ranked.
    ///
    pub fn from_ranks(category: Category, ranks: Vec<RankedRegion>) -> Self {
        let state = if ranks.iter().any(|r| r.rank.is_ranked()) {
            CategoryState::Ranked
        } else {
            CategoryState::Empty
        };
        CategoryOutcome {
            category,
            state,
            ranks,
        }
    }

    pub fn is_ranked(&self) -> bool {
        self.state == CategoryState::Ranked
    }

    /// The bare rank column in registry order.
    pub fn rank_column(&self) -> Vec<Rank> {
        self.ranks.iter().map(|r| r.rank).collect()
    }
}

///
/// Resolve the cases shared by every category before any ranking happens.
///
/// Returns the rows to rank, or the finished outcome when the category is
/// disabled, pending, failed, or was handed an empty row list.
///
pub(crate) fn loaded_rows<'a, T>(
    category: Category,
    enabled: bool,
    input: &'a CategoryInput<T>,
    registry: &RegionRegistry,
) -> Result<&'a [T], CategoryOutcome> {
    if !enabled {
        return Err(CategoryOutcome::unranked(
            category,
            CategoryState::Disabled,
            registry,
        ));
    }

    match input {
        CategoryInput::Pending => Err(CategoryOutcome::unranked(
            category,
            CategoryState::Pending,
            registry,
        )),
        CategoryInput::Failed(message) => Err(CategoryOutcome::unranked(
            category,
            CategoryState::Failed(message.clone()),
            registry,
        )),
        CategoryInput::Loaded(rows) if rows.is_empty() => Err(CategoryOutcome::unranked(
            category,
            CategoryState::Empty,
            registry,
        )),
        CategoryInput::Loaded(rows) => Ok(rows),
    }
}

///
/// Keep only the first row for each region.
///
/// Later rows for the same region are dropped whole, so every score of a
/// region comes from one row.
///
pub fn first_rows<'a, T, F>(rows: &'a [T], region_id: F) -> Vec<&'a T>
where
    F: Fn(&T) -> &RegionId,
{
    let mut seen: FxHashSet<&RegionId> = FxHashSet::default();
    let mut kept: Vec<&T> = Vec::with_capacity(rows.len());

    for row in rows {
        let id = region_id(row);
        if seen.insert(id) {
            kept.push(row);
        } else {
            debug!("ignoring duplicate row for region {}", id);
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use argo_core::models::Region;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use tempfile::NamedTempFile;

    #[fixture]
    fn registry() -> RegionRegistry {
        RegionRegistry::try_from(vec![
            Region::new("R1", "chr1", 10, 11),
            Region::new("R2", "chr1", 20, 21),
        ])
        .unwrap()
    }

    #[rstest]
    fn test_loaded_rows_states(registry: RegionRegistry) {
        let rows: CategoryInput<u8> = CategoryInput::Loaded(vec![1, 2]);
        assert_eq!(
            loaded_rows(Category::Gene, true, &rows, &registry).unwrap(),
            &[1, 2]
        );

        let disabled = loaded_rows(Category::Gene, false, &rows, &registry).unwrap_err();
        assert_eq!(disabled.state, CategoryState::Disabled);
        assert_eq!(disabled.ranks.len(), 2);

        let pending: CategoryInput<u8> = CategoryInput::default();
        let outcome = loaded_rows(Category::Gene, true, &pending, &registry).unwrap_err();
        assert_eq!(outcome.state, CategoryState::Pending);

        let failed: CategoryInput<u8> = CategoryInput::Failed("timeout".to_string());
        let outcome = loaded_rows(Category::Gene, true, &failed, &registry).unwrap_err();
        assert_eq!(outcome.state, CategoryState::Failed("timeout".to_string()));

        let empty: CategoryInput<u8> = CategoryInput::Loaded(vec![]);
        let outcome = loaded_rows(Category::Gene, true, &empty, &registry).unwrap_err();
        assert_eq!(outcome.state, CategoryState::Empty);
    }

    #[rstest]
    fn test_from_ranks_downgrades_to_empty(registry: RegionRegistry) {
        let outcome = CategoryOutcome::from_ranks(Category::Sequence, unranked(&registry));
        assert_eq!(outcome.state, CategoryState::Empty);
        assert!(!outcome.is_ranked());
    }

    #[rstest]
    fn test_from_json_path_failure_is_not_fatal() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let input: CategoryInput<u32> = CategoryInput::from_json_path(file.path());
        assert!(matches!(input, CategoryInput::Failed(_)));
    }

    #[rstest]
    fn test_from_json_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[1, 2, 3]").unwrap();
        let input: CategoryInput<u32> = CategoryInput::from_json_path(file.path());
        assert_eq!(input, CategoryInput::Loaded(vec![1, 2, 3]));
    }

    #[rstest]
    fn test_first_rows_keeps_first_per_region() {
        let rows = vec![
            (RegionId::from("R1"), 1),
            (RegionId::from("R2"), 2),
            (RegionId::from("R1"), 3),
        ];
        let kept: Vec<i32> = first_rows(&rows, |r| &r.0).into_iter().map(|r| r.1).collect();
        assert_eq!(kept, vec![1, 2]);
    }

    #[rstest]
    fn test_category_state_serialization() {
        let json = serde_json::to_string(&CategoryState::FullyFiltered).unwrap();
        assert_eq!(json, r#"{"state":"fully_filtered"}"#);
    }
}
