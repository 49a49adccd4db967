//! Procedural footprint growth and district partitioning

mod districts;
mod region;

use std::collections::BTreeSet;

use thiserror::Error;

use crate::spatial::Coord;

pub use districts::{DistrictPartitioner, DistrictSizeRule, DistrictSpec, Partition, PartitionParams};
pub use region::{GrowthParams, RegionGrower};

/// Connected set of cells making up a settlement's usable footprint.
pub type Blob = BTreeSet<Coord>;

#[derive(Debug, Error, PartialEq)]
pub enum GenerationError {
    #[error("grid size must be at least 1")]
    InvalidGrid,
    #[error("target cell count must be at least 1")]
    InvalidTarget,
}
