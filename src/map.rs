//! Sparse per-cell settlement state
//!
//! Only cells that generation or an edit touched are stored. Every stored cell
//! carries a non-empty district; annotation edits on an untouched cell create
//! it under [`UNASSIGNED_DISTRICT`](crate::cell::UNASSIGNED_DISTRICT).

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use crate::cell::{Cell, DangerLevel};
use crate::generation::Partition;
use crate::spatial::Coord;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("cell {coord} lies outside the {grid_size}x{grid_size} grid")]
    OutOfBounds { coord: Coord, grid_size: u32 },
    #[error("district name must not be empty")]
    EmptyDistrict,
}

#[derive(Debug, Clone, Default)]
pub struct SettlementCellMap {
    grid_size: u32,
    cells: HashMap<Coord, Cell>,
}

impl SettlementCellMap {
    pub fn new(grid_size: u32) -> Self {
        Self {
            grid_size,
            cells: HashMap::new(),
        }
    }

    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        self.cells.get(&coord)
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.cells.contains_key(&coord)
    }

    /// Present cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Cell)> {
        let mut entries: Vec<_> = self.cells.iter().map(|(c, cell)| (*c, cell)).collect();
        entries.sort_by_key(|(coord, _)| *coord);
        entries.into_iter()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn assign_district(&mut self, coord: Coord, district: &str) -> Result<(), MapError> {
        self.check_bounds(coord)?;
        if district.trim().is_empty() {
            return Err(MapError::EmptyDistrict);
        }
        self.cells
            .entry(coord)
            .and_modify(|cell| cell.district = district.to_string())
            .or_insert_with(|| Cell::new(district));
        Ok(())
    }

    pub fn set_point_of_interest(&mut self, coord: Coord, text: &str) -> Result<(), MapError> {
        self.touch(coord)?.point_of_interest = Some(text.to_string());
        Ok(())
    }

    pub fn set_danger(&mut self, coord: Coord, level: DangerLevel) -> Result<(), MapError> {
        self.touch(coord)?.danger = Some(level);
        Ok(())
    }

    /// Remove the point of interest; the cell itself stays. No-op on an
    /// untouched cell.
    pub fn clear_point_of_interest(&mut self, coord: Coord) -> Result<(), MapError> {
        self.check_bounds(coord)?;
        if let Some(cell) = self.cells.get_mut(&coord) {
            cell.point_of_interest = None;
        }
        Ok(())
    }

    pub fn clear_danger(&mut self, coord: Coord) -> Result<(), MapError> {
        self.check_bounds(coord)?;
        if let Some(cell) = self.cells.get_mut(&coord) {
            cell.danger = None;
        }
        Ok(())
    }

    /// Remove the cell entirely. Returns what was stored there.
    pub fn clear_cell(&mut self, coord: Coord) -> Result<Option<Cell>, MapError> {
        self.check_bounds(coord)?;
        Ok(self.cells.remove(&coord))
    }

    /// Write every chunk of `partition` into the map as district assignments.
    pub fn apply_partition(&mut self, partition: &Partition) -> Result<(), MapError> {
        for (district, chunk) in &partition.chunks {
            for &coord in chunk {
                self.assign_district(coord, district)?;
            }
        }
        Ok(())
    }

    /// Cell count per district, sentinel included.
    pub fn district_sizes(&self) -> BTreeMap<String, usize> {
        let mut sizes = BTreeMap::new();
        for cell in self.cells.values() {
            *sizes.entry(cell.district.clone()).or_insert(0) += 1;
        }
        sizes
    }

    pub fn cells_in_district(&self, district: &str) -> Vec<Coord> {
        let mut coords: Vec<Coord> = self
            .cells
            .iter()
            .filter(|(_, cell)| cell.district == district)
            .map(|(coord, _)| *coord)
            .collect();
        coords.sort();
        coords
    }

    fn touch(&mut self, coord: Coord) -> Result<&mut Cell, MapError> {
        self.check_bounds(coord)?;
        Ok(self.cells.entry(coord).or_insert_with(Cell::unassigned))
    }

    fn check_bounds(&self, coord: Coord) -> Result<(), MapError> {
        if coord.x < self.grid_size && coord.y < self.grid_size {
            Ok(())
        } else {
            Err(MapError::OutOfBounds {
                coord,
                grid_size: self.grid_size,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::UNASSIGNED_DISTRICT;

    #[test]
    fn test_assign_preserves_annotations() {
        let mut map = SettlementCellMap::new(4);
        let c = Coord::new(1, 2);
        map.set_point_of_interest(c, "Well").unwrap();
        map.set_danger(c, DangerLevel::Risky).unwrap();
        map.assign_district(c, "Market").unwrap();

        let cell = map.get(c).unwrap();
        assert_eq!(cell.district, "Market");
        assert_eq!(cell.point_of_interest.as_deref(), Some("Well"));
        assert_eq!(cell.danger, Some(DangerLevel::Risky));
    }

    #[test]
    fn test_assign_is_idempotent() {
        let mut once = SettlementCellMap::new(4);
        once.assign_district(Coord::new(0, 0), "Docks").unwrap();
        let mut twice = SettlementCellMap::new(4);
        twice.assign_district(Coord::new(0, 0), "Docks").unwrap();
        twice.assign_district(Coord::new(0, 0), "Docks").unwrap();

        assert_eq!(once.get(Coord::new(0, 0)), twice.get(Coord::new(0, 0)));
        assert_eq!(twice.len(), 1);
    }

    #[test]
    fn test_annotation_creates_sentinel_cell() {
        let mut map = SettlementCellMap::new(4);
        map.set_danger(Coord::new(3, 3), DangerLevel::Deadly).unwrap();
        let cell = map.get(Coord::new(3, 3)).unwrap();
        assert_eq!(cell.district, UNASSIGNED_DISTRICT);
        assert_eq!(cell.danger, Some(DangerLevel::Deadly));
    }

    #[test]
    fn test_clear_cell_removes_key() {
        let mut map = SettlementCellMap::new(4);
        let c = Coord::new(2, 2);
        map.assign_district(c, "Temple").unwrap();
        map.set_point_of_interest(c, "Shrine").unwrap();

        let removed = map.clear_cell(c).unwrap();
        assert_eq!(removed.map(|cell| cell.district), Some("Temple".to_string()));
        assert!(map.get(c).is_none());
        assert!(map.is_empty());

        map.set_point_of_interest(c, "Ruined shrine").unwrap();
        let cell = map.get(c).unwrap();
        assert_eq!(cell.district, UNASSIGNED_DISTRICT);
        assert_eq!(cell.point_of_interest.as_deref(), Some("Ruined shrine"));
    }

    #[test]
    fn test_clear_fields_keep_cell() {
        let mut map = SettlementCellMap::new(4);
        let c = Coord::new(0, 1);
        map.set_point_of_interest(c, "Gate").unwrap();
        map.set_danger(c, DangerLevel::Unsafe).unwrap();
        map.clear_point_of_interest(c).unwrap();
        map.clear_danger(c).unwrap();

        assert_eq!(map.get(c), Some(&Cell::unassigned()));
        map.clear_danger(Coord::new(3, 0)).unwrap();
        assert!(!map.contains(Coord::new(3, 0)));
    }

    #[test]
    fn test_out_of_bounds_is_rejected() {
        let mut map = SettlementCellMap::new(4);
        let outside = Coord::new(4, 0);
        let expected = MapError::OutOfBounds {
            coord: outside,
            grid_size: 4,
        };
        assert_eq!(map.assign_district(outside, "Docks"), Err(expected.clone()));
        assert_eq!(map.set_danger(outside, DangerLevel::Safe), Err(expected.clone()));
        assert_eq!(map.clear_cell(outside), Err(expected));
        assert!(map.is_empty());
    }

    #[test]
    fn test_empty_district_is_rejected() {
        let mut map = SettlementCellMap::new(4);
        assert_eq!(
            map.assign_district(Coord::new(0, 0), "  "),
            Err(MapError::EmptyDistrict)
        );
        assert!(map.is_empty());
    }

    #[test]
    fn test_district_sizes_and_lookup() {
        let mut map = SettlementCellMap::new(4);
        map.assign_district(Coord::new(1, 0), "Docks").unwrap();
        map.assign_district(Coord::new(0, 0), "Docks").unwrap();
        map.assign_district(Coord::new(0, 1), "Keep").unwrap();
        map.set_point_of_interest(Coord::new(3, 3), "Cairn").unwrap();

        let sizes = map.district_sizes();
        assert_eq!(sizes["Docks"], 2);
        assert_eq!(sizes["Keep"], 1);
        assert_eq!(sizes[UNASSIGNED_DISTRICT], 1);
        assert_eq!(
            map.cells_in_district("Docks"),
            vec![Coord::new(0, 0), Coord::new(1, 0)]
        );

        let order: Vec<Coord> = map.iter().map(|(c, _)| c).collect();
        assert_eq!(
            order,
            vec![
                Coord::new(0, 0),
                Coord::new(1, 0),
                Coord::new(0, 1),
                Coord::new(3, 3)
            ]
        );
    }
}
