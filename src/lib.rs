pub mod catalog;
pub mod cell;
pub mod generation;
pub mod logging;
pub mod map;
pub mod rng;
pub mod session;
pub mod spatial;

pub use catalog::{Catalog, CatalogLoader, SettlementKind};
pub use cell::{Cell, DangerLevel, UNASSIGNED_DISTRICT};
pub use map::SettlementCellMap;
pub use session::{GenerationReport, Session, SessionBuilder, SessionSettings};
pub use spatial::Coord;
