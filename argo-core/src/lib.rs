//! Core models for ARGO.
//!
//! This crate holds the input side of the ranking engine: the submitted
//! [`Region`](models::Region)s and the [`RegionRegistry`](models::RegionRegistry)
//! that owns their order and identity. Everything downstream joins back to
//! the registry, so it is the only place where region identity is decided.
//!
//! # Example
//!
//! ```no_run
//! use argo_core::models::RegionRegistry;
//!
//! let registry = RegionRegistry::try_from("regions.bed").unwrap();
//! for region in registry.iter() {
//!     println!("{}\t{}", region.id, region.coordinates());
//! }
//! ```

pub mod errors;
pub mod models;
pub mod utils;

// re-exports
pub use errors::RegistryError;
pub use models::{Coordinates, Region, RegionId, RegionRegistry, Strand};
