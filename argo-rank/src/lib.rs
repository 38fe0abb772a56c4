//! Rank aggregation engine for ARGO.
//!
//! Regions are ranked independently in three annotation categories and the
//! category ranks are fused into one consensus rank per region:
//!
//! - sequence: conservation or motif disruption ([sequence])
//! - element: cCRE assay z-scores, combined per region ([element])
//! - gene: specificity, expression and linked gene count ([gene])
//!
//! All ranking uses dense competition ranks ([rank]). A region without an
//! applicable rank is [Rank::Unranked], never rank 0 of a real ordering.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use argo_core::models::RegionRegistry;
//! use argo_rank::{CategoryInput, CategoryRows, RankingConfig, rank_regions};
//!
//! let registry = RegionRegistry::try_from("regions.bed").unwrap();
//! let rows = CategoryRows {
//!     genes: CategoryInput::from_json_path(Path::new("genes.json")),
//!     ..Default::default()
//! };
//!
//! let result = rank_regions(&registry, &rows, &RankingConfig::default());
//! for row in &result.aggregate {
//!     println!("{}\t{}", row.region_id, row.aggregate_rank);
//! }
//! ```

pub mod aggregate;
pub mod config;
pub mod element;
pub mod errors;
pub mod export;
pub mod gene;
pub mod matcher;
pub mod models;
pub mod pipeline;
pub mod rank;
pub mod sequence;

// re-exports
pub use aggregate::{AggregateRow, aggregate};
pub use config::RankingConfig;
pub use models::{Category, CategoryInput, CategoryOutcome, CategoryState};
pub use pipeline::{CategoryRows, RankingResult, rank_regions};
pub use rank::{Rank, RankedRegion, ScoreOrder};
