pub mod region;
pub mod registry;

// re-export for cleaner imports
pub use self::region::{Coordinates, Region, RegionId, Strand};
pub use self::registry::RegionRegistry;
