use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::{
    catalog::{Catalog, SettlementKind},
    cell::{Cell, DangerLevel},
    generation::{DistrictPartitioner, GenerationError, Partition, RegionGrower},
    map::{MapError, SettlementCellMap},
    rng::RngManager,
    spatial::Coord,
};

const REGION_STREAM: &str = "region";
const DISTRICT_STREAM: &str = "districts";
const NAME_STREAM: &str = "names";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no settlement has been generated yet")]
    NoSettlement,
    #[error("{kind} name pool is empty")]
    EmptyNamePool { kind: SettlementKind },
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Map(#[from] MapError),
}

#[derive(Debug, Clone, Default)]
pub struct SessionSettings {
    /// Master seed; `None` seeds from the platform generator.
    pub seed: Option<u64>,
}

pub struct SessionBuilder {
    settings: SessionSettings,
    catalog: Catalog,
}

impl SessionBuilder {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            settings,
            catalog: Catalog::builtin(),
        }
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn build(self) -> Session {
        let rng = match self.settings.seed {
            Some(seed) => RngManager::new(seed),
            None => RngManager::from_entropy(),
        };
        Session {
            grower: RegionGrower::new(self.catalog.growth.clone()),
            partitioner: DistrictPartitioner::new(self.catalog.partition.clone()),
            catalog: self.catalog,
            rng,
            current: None,
        }
    }
}

/// The settlement currently on display.
#[derive(Debug, Clone)]
pub struct Settlement {
    pub name: String,
    pub kind: SettlementKind,
    pub map: SettlementCellMap,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub name: String,
    pub kind: SettlementKind,
    pub seed: u64,
    pub grid_size: u32,
    pub target_cells: usize,
    pub footprint_cells: usize,
    pub districts: BTreeMap<String, usize>,
    pub skipped: Vec<String>,
}

/// Owns the catalog, the random streams and the one mutable cell map.
pub struct Session {
    catalog: Catalog,
    grower: RegionGrower,
    partitioner: DistrictPartitioner,
    rng: RngManager,
    current: Option<Settlement>,
}

impl Session {
    /// Replace the current settlement with a freshly generated one of `kind`.
    pub fn generate(&mut self, kind: SettlementKind) -> Result<GenerationReport, SessionError> {
        let profile = self.catalog.profile(kind);

        let name = profile
            .names
            .choose(&mut self.rng.stream(NAME_STREAM))
            .cloned()
            .ok_or(SessionError::EmptyNamePool { kind })?;

        let blob = self.grower.grow(
            profile.grid_size,
            profile.target_cells,
            profile.avoid_edges,
            &mut self.rng.stream(REGION_STREAM),
        )?;

        let specs = profile.district_specs();
        let partition: Partition =
            self.partitioner
                .partition(&blob, &specs, &mut self.rng.stream(DISTRICT_STREAM));

        let mut map = SettlementCellMap::new(profile.grid_size);
        map.apply_partition(&partition)?;

        let report = GenerationReport {
            name: name.clone(),
            kind,
            seed: self.rng.seed(),
            grid_size: profile.grid_size,
            target_cells: profile.target_cells,
            footprint_cells: blob.len(),
            districts: specs
                .iter()
                .map(|spec| (spec.name.clone(), partition.cells(&spec.name)))
                .collect(),
            skipped: partition.skipped.clone(),
        };
        info!(
            name = %report.name,
            kind = %kind,
            footprint = report.footprint_cells,
            skipped = report.skipped.len(),
            "settlement generated"
        );

        self.current = Some(Settlement { name, kind, map });
        Ok(report)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn settlement(&self) -> Option<&Settlement> {
        self.current.as_ref()
    }

    pub fn map(&self) -> Option<&SettlementCellMap> {
        self.current.as_ref().map(|settlement| &settlement.map)
    }

    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.map().and_then(|map| map.get(coord))
    }

    pub fn assign_district(&mut self, coord: Coord, district: &str) -> Result<(), SessionError> {
        Ok(self.map_mut()?.assign_district(coord, district)?)
    }

    pub fn set_point_of_interest(&mut self, coord: Coord, text: &str) -> Result<(), SessionError> {
        Ok(self.map_mut()?.set_point_of_interest(coord, text)?)
    }

    pub fn set_danger(&mut self, coord: Coord, level: DangerLevel) -> Result<(), SessionError> {
        Ok(self.map_mut()?.set_danger(coord, level)?)
    }

    pub fn clear_cell(&mut self, coord: Coord) -> Result<Option<Cell>, SessionError> {
        Ok(self.map_mut()?.clear_cell(coord)?)
    }

    fn map_mut(&mut self) -> Result<&mut SettlementCellMap, SessionError> {
        self.current
            .as_mut()
            .map(|settlement| &mut settlement.map)
            .ok_or(SessionError::NoSettlement)
    }
}
