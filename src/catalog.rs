//! Settlement catalog: per-kind grid sizes, districts and name pools

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cell::UNASSIGNED_DISTRICT;
use crate::generation::{DistrictSpec, GrowthParams, PartitionParams};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SettlementKind {
    Village,
    Town,
    City,
}

impl SettlementKind {
    pub const ALL: [SettlementKind; 3] = [
        SettlementKind::Village,
        SettlementKind::Town,
        SettlementKind::City,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SettlementKind::Village => "Village",
            SettlementKind::Town => "Town",
            SettlementKind::City => "City",
        }
    }
}

impl fmt::Display for SettlementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown settlement kind '{0}' (expected village, town or city)")]
pub struct ParseKindError(String);

impl FromStr for SettlementKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettlementKind::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseKindError(s.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("expansion chance {0} must lie within 0..=1")]
    ExpansionChance(f64),
    #[error("share multiplier range {min}..={max} must satisfy 0 < min <= max")]
    ShareRange { min: f64, max: f64 },
    #[error("{kind}: {message}")]
    Kind {
        kind: SettlementKind,
        message: String,
    },
}

fn default_avoid_edges() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FootprintRange {
    pub min: usize,
    pub max: usize,
}

impl Default for FootprintRange {
    fn default() -> Self {
        Self { min: 3, max: 6 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictEntry {
    pub name: String,
    /// Use the kind's small-footprint range instead of an equal share.
    #[serde(default)]
    pub small_footprint: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindProfile {
    pub grid_size: u32,
    pub target_cells: usize,
    #[serde(default = "default_avoid_edges")]
    pub avoid_edges: bool,
    #[serde(default)]
    pub small_footprint: FootprintRange,
    pub districts: Vec<DistrictEntry>,
    pub names: Vec<String>,
}

impl KindProfile {
    pub fn district_specs(&self) -> Vec<DistrictSpec> {
        self.districts
            .iter()
            .map(|entry| {
                if entry.small_footprint {
                    DistrictSpec::small_footprint(
                        entry.name.clone(),
                        self.small_footprint.min,
                        self.small_footprint.max,
                    )
                } else {
                    DistrictSpec::share(entry.name.clone())
                }
            })
            .collect()
    }

    fn validate(&self, kind: SettlementKind) -> Result<(), CatalogError> {
        let invalid = |message: String| CatalogError::Kind { kind, message };

        if self.grid_size == 0 {
            return Err(invalid("grid_size must be at least 1".into()));
        }
        if self.target_cells == 0 {
            return Err(invalid("target_cells must be at least 1".into()));
        }
        let FootprintRange { min, max } = self.small_footprint;
        if min == 0 || min > max {
            return Err(invalid(format!(
                "small_footprint range {min}..={max} must satisfy 1 <= min <= max"
            )));
        }
        if self.districts.is_empty() {
            return Err(invalid("at least one district is required".into()));
        }

        let mut seen = HashSet::new();
        for district in &self.districts {
            if district.name.trim().is_empty() {
                return Err(invalid("district names must not be empty".into()));
            }
            if district.name == UNASSIGNED_DISTRICT {
                return Err(invalid(format!(
                    "district name '{UNASSIGNED_DISTRICT}' is reserved for unassigned cells"
                )));
            }
            if !seen.insert(district.name.as_str()) {
                return Err(invalid(format!(
                    "district '{}' listed more than once",
                    district.name
                )));
            }
        }

        if self.names.is_empty() {
            return Err(invalid("name pool must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub growth: GrowthParams,
    #[serde(default)]
    pub partition: PartitionParams,
    pub village: KindProfile,
    pub town: KindProfile,
    pub city: KindProfile,
}

impl Catalog {
    pub fn from_yaml_str(text: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_yaml::from_str(text)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn to_yaml(&self) -> Result<String, CatalogError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn profile(&self, kind: SettlementKind) -> &KindProfile {
        match kind {
            SettlementKind::Village => &self.village,
            SettlementKind::Town => &self.town,
            SettlementKind::City => &self.city,
        }
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let chance = self.growth.expansion_chance;
        if !(0.0..=1.0).contains(&chance) {
            return Err(CatalogError::ExpansionChance(chance));
        }
        let PartitionParams {
            share_min,
            share_max,
        } = self.partition;
        if !(share_min > 0.0 && share_min <= share_max) {
            return Err(CatalogError::ShareRange {
                min: share_min,
                max: share_max,
            });
        }
        for kind in SettlementKind::ALL {
            self.profile(kind).validate(kind)?;
        }
        Ok(())
    }

    /// Catalog used when no file is supplied. Mirrors
    /// `settlements/default.yaml`.
    pub fn builtin() -> Self {
        Self {
            growth: GrowthParams::default(),
            partition: PartitionParams::default(),
            village: KindProfile {
                grid_size: 10,
                target_cells: 40,
                avoid_edges: true,
                small_footprint: FootprintRange { min: 1, max: 2 },
                districts: districts(&[
                    ("Village Green", false),
                    ("Farmsteads", false),
                    ("Mill Row", false),
                    ("Chapel Yard", false),
                    ("Watchtower", true),
                ]),
                names: names(&[
                    "Ashford", "Brindlecombe", "Cold Harbour", "Dunmere", "Elderbrook",
                    "Fernhollow", "Greywater", "Hobb's End", "Larkspur", "Millstead",
                ]),
            },
            town: KindProfile {
                grid_size: 16,
                target_cells: 110,
                avoid_edges: true,
                small_footprint: FootprintRange { min: 3, max: 6 },
                districts: districts(&[
                    ("Market", false),
                    ("Artisans' Quarter", false),
                    ("Temple Ward", false),
                    ("Commons", false),
                    ("Docks", false),
                    ("Keep", true),
                ]),
                names: names(&[
                    "Amberfall", "Blackmoor", "Copperhill", "Dragonford", "Eastwatch",
                    "Foxbridge", "Highgate", "Ironvale", "Kingsbarrow", "Saltmarsh",
                ]),
            },
            city: KindProfile {
                grid_size: 26,
                target_cells: 320,
                avoid_edges: true,
                small_footprint: FootprintRange { min: 3, max: 6 },
                districts: districts(&[
                    ("Grand Market", false),
                    ("Noble Quarter", false),
                    ("Temple Ward", false),
                    ("Guild Row", false),
                    ("Harbor", false),
                    ("Warrens", false),
                    ("Garrison", false),
                    ("Citadel", true),
                ]),
                names: names(&[
                    "Aldermoor", "Brightspire", "Castamere", "Duskhaven", "Everhold",
                    "Goldcrest", "Myrefall", "Stormreach", "Valcourt", "Westmarch",
                ]),
            },
        }
    }
}

fn districts(entries: &[(&str, bool)]) -> Vec<DistrictEntry> {
    entries
        .iter()
        .map(|(name, small_footprint)| DistrictEntry {
            name: name.to_string(),
            small_footprint: *small_footprint,
        })
        .collect()
}

fn names(pool: &[&str]) -> Vec<String> {
    pool.iter().map(|name| name.to_string()).collect()
}

pub struct CatalogLoader {
    base_dir: PathBuf,
}

impl CatalogLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> anyhow::Result<Catalog> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        let catalog = Catalog::from_yaml_str(&data)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        Ok(catalog)
    }
}
