//! Aggregate ranker: fuses the category ranks into one consensus rank per region.

use argo_core::models::{Coordinates, RegionId, RegionRegistry};
use serde::{Deserialize, Serialize};

use crate::config::RankingConfig;
use crate::models::{Category, CategoryOutcome};
use crate::rank::{Rank, sum_and_rerank};

/// Final per-region row handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRow {
    #[serde(rename = "regionID")]
    pub region_id: RegionId,
    pub input_region: Coordinates,
    pub sequence_rank: Rank,
    pub element_rank: Rank,
    pub gene_rank: Rank,
    pub aggregate_rank: Rank,
}

impl AggregateRow {
    pub fn category_rank(&self, category: Category) -> Rank {
        match category {
            Category::Sequence => self.sequence_rank,
            Category::Element => self.element_rank,
            Category::Gene => self.gene_rank,
        }
    }
}

/// The rank column a category contributes: its ranks if it ranked, else nothing.
fn contribution(outcome: &CategoryOutcome, enabled: bool, len: usize) -> Vec<Rank> {
    if enabled && outcome.is_ranked() {
        let mut column = outcome.rank_column();
        column.resize(len, Rank::Unranked);
        column
    } else {
        vec![Rank::Unranked; len]
    }
}

///
/// Fuse the category ranks into one aggregate rank per region.
///
/// Only enabled categories that actually ranked contribute; disabled,
/// pending and failed categories are unranked for every region. Each
/// region's category ranks are summed and the sums ranked lowest first.
/// A region unranked in every contributing category stays unranked.
///
/// An empty registry or a configuration with no enabled category yields an
/// empty result.
///
pub fn aggregate(
    registry: &RegionRegistry,
    sequence: &CategoryOutcome,
    element: &CategoryOutcome,
    gene: &CategoryOutcome,
    config: &RankingConfig,
) -> Vec<AggregateRow> {
    if registry.is_empty() || config.enabled_categories().is_empty() {
        return Vec::new();
    }

    let len = registry.len();
    let sequence_ranks = contribution(sequence, config.sequence.enabled, len);
    let element_ranks = contribution(element, config.element.enabled, len);
    let gene_ranks = contribution(gene, config.gene.enabled, len);

    let aggregate_ranks =
        sum_and_rerank(&[&sequence_ranks[..], &element_ranks[..], &gene_ranks[..]]);

    registry
        .iter()
        .enumerate()
        .map(|(idx, region)| AggregateRow {
            region_id: region.id.clone(),
            input_region: region.coordinates(),
            sequence_rank: sequence_ranks[idx],
            element_rank: element_ranks[idx],
            gene_rank: gene_ranks[idx],
            aggregate_rank: aggregate_ranks[idx],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use argo_core::models::Region;
    use pretty_assertions::assert_eq;
    use rstest::*;

    use crate::config::SequenceConfig;
    use crate::models::CategoryState;
    use crate::rank::to_ranked_regions;

    #[fixture]
    fn registry() -> RegionRegistry {
        RegionRegistry::try_from(vec![
            Region::new("R1", "chr1", 10, 11),
            Region::new("R2", "chr1", 20, 21),
            Region::new("R3", "chr1", 30, 31),
            Region::new("R4", "chr1", 40, 41),
        ])
        .unwrap()
    }

    fn outcome(registry: &RegionRegistry, category: Category, ranks: [u32; 4]) -> CategoryOutcome {
        let ranks: Vec<Rank> = ranks.into_iter().map(Rank::from).collect();
        CategoryOutcome::from_ranks(category, to_ranked_regions(registry, &ranks))
    }

    fn aggregate_ranks(rows: &[AggregateRow]) -> Vec<u32> {
        rows.iter().map(|r| r.aggregate_rank.value()).collect()
    }

    #[rstest]
    fn test_sequence_disabled_scenario(registry: RegionRegistry) {
        let config = RankingConfig {
            sequence: SequenceConfig {
                enabled: false,
                ..Default::default()
            },
            ..Default::default()
        };
        let sequence =
            CategoryOutcome::unranked(Category::Sequence, CategoryState::Disabled, &registry);
        let element = outcome(&registry, Category::Element, [1, 2, 0, 3]);
        let gene = outcome(&registry, Category::Gene, [2, 1, 0, 1]);

        let rows = aggregate(&registry, &sequence, &element, &gene, &config);
        assert_eq!(aggregate_ranks(&rows), vec![1, 1, 0, 3]);
        assert_eq!(rows[2].aggregate_rank, Rank::Unranked);
        assert_eq!(rows[0].element_rank.value(), 1);
        assert_eq!(rows[0].input_region, Coordinates::new("chr1", 10, 11));
    }

    #[rstest]
    fn test_partial_zero_still_competes(registry: RegionRegistry) {
        let config = RankingConfig::default();
        let sequence = outcome(&registry, Category::Sequence, [1, 2, 3, 4]);
        let element = outcome(&registry, Category::Element, [0, 1, 2, 3]);
        let gene = outcome(&registry, Category::Gene, [0, 0, 0, 0]);

        // sums [1, 3, 5, 7]; R1 only has a sequence rank but still ranks
        let rows = aggregate(&registry, &sequence, &element, &gene, &config);
        assert_eq!(aggregate_ranks(&rows), vec![1, 2, 3, 4]);
    }

    #[rstest]
    fn test_failed_category_contributes_nothing(registry: RegionRegistry) {
        let config = RankingConfig::default();
        let sequence = outcome(&registry, Category::Sequence, [4, 3, 2, 1]);
        let mut element = outcome(&registry, Category::Element, [1, 1, 1, 1]);
        element.state = CategoryState::Failed("upstream timeout".to_string());
        let gene = CategoryOutcome::unranked(Category::Gene, CategoryState::Pending, &registry);

        let rows = aggregate(&registry, &sequence, &element, &gene, &config);
        assert_eq!(aggregate_ranks(&rows), vec![4, 3, 2, 1]);
        assert!(rows.iter().all(|r| r.element_rank == Rank::Unranked));
    }

    #[rstest]
    fn test_disabled_category_ignored_even_with_ranks(registry: RegionRegistry) {
        let mut config = RankingConfig::default();
        config.gene.enabled = false;
        let sequence = outcome(&registry, Category::Sequence, [1, 2, 3, 4]);
        let element = outcome(&registry, Category::Element, [1, 2, 3, 4]);
        let gene = outcome(&registry, Category::Gene, [4, 3, 2, 1]);

        let rows = aggregate(&registry, &sequence, &element, &gene, &config);
        assert_eq!(aggregate_ranks(&rows), vec![1, 2, 3, 4]);
        assert_eq!(rows[0].category_rank(Category::Gene), Rank::Unranked);
    }

    #[rstest]
    fn test_nothing_enabled_is_empty(registry: RegionRegistry) {
        let mut config = RankingConfig::default();
        config.sequence.enabled = false;
        config.element.enabled = false;
        config.gene.enabled = false;
        let none = CategoryOutcome::unranked(Category::Gene, CategoryState::Disabled, &registry);

        assert!(aggregate(&registry, &none, &none, &none, &config).is_empty());
    }

    #[rstest]
    fn test_empty_registry_is_empty() {
        let registry = RegionRegistry::default();
        let none = CategoryOutcome::unranked(Category::Gene, CategoryState::Empty, &registry);
        assert!(aggregate(&registry, &none, &none, &none, &RankingConfig::default()).is_empty());
    }
}
