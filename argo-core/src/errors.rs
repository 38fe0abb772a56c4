use thiserror::Error;

use crate::models::{Coordinates, RegionId};

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Can't read file: {0}")]
    FileReadError(String),

    #[error("Error parsing region on line {line}: {message}")]
    RegionParseError { line: usize, message: String },

    #[error("Region {id} has start >= end ({start} >= {end})")]
    InvalidInterval { id: RegionId, start: u32, end: u32 },

    #[error("Duplicate region ID in submission: {0}")]
    DuplicateRegionId(RegionId),

    #[error("Regions {first} and {second} share the same coordinates {coordinates}")]
    DuplicateCoordinates {
        first: RegionId,
        second: RegionId,
        coordinates: Coordinates,
    },

    #[error("0 regions found in the file: {0}")]
    EmptyRegistry(String),

    #[error("Invalid strand: {0}")]
    InvalidStrand(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
