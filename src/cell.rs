use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// District given to cells that are created by an annotation edit before
/// anyone assigned them a district.
pub const UNASSIGNED_DISTRICT: &str = "Unassigned";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DangerLevel {
    Safe,
    Unsafe,
    Risky,
    Deadly,
}

impl DangerLevel {
    pub const ALL: [DangerLevel; 4] = [
        DangerLevel::Safe,
        DangerLevel::Unsafe,
        DangerLevel::Risky,
        DangerLevel::Deadly,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DangerLevel::Safe => "Safe",
            DangerLevel::Unsafe => "Unsafe",
            DangerLevel::Risky => "Risky",
            DangerLevel::Deadly => "Deadly",
        }
    }
}

impl fmt::Display for DangerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
#[error("unknown danger level '{0}'")]
pub struct ParseDangerError(String);

impl FromStr for DangerLevel {
    type Err = ParseDangerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DangerLevel::ALL
            .into_iter()
            .find(|level| level.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseDangerError(s.to_string()))
    }
}

/// Annotation record for one touched grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub district: String,
    pub point_of_interest: Option<String>,
    pub danger: Option<DangerLevel>,
}

impl Cell {
    pub fn new(district: impl Into<String>) -> Self {
        Self {
            district: district.into(),
            point_of_interest: None,
            danger: None,
        }
    }

    pub fn unassigned() -> Self {
        Self::new(UNASSIGNED_DISTRICT)
    }

    pub fn is_unassigned(&self) -> bool {
        self.district == UNASSIGNED_DISTRICT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_danger() {
        assert_eq!("deadly".parse::<DangerLevel>().unwrap(), DangerLevel::Deadly);
        assert_eq!(" Safe ".parse::<DangerLevel>().unwrap(), DangerLevel::Safe);
        assert!("lethal".parse::<DangerLevel>().is_err());
    }

    #[test]
    fn test_unassigned_cell() {
        let cell = Cell::unassigned();
        assert!(cell.is_unassigned());
        assert!(cell.point_of_interest.is_none());
        assert!(cell.danger.is_none());
    }
}
