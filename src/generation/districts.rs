use std::collections::{BTreeMap, BTreeSet, VecDeque};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::Blob;
use crate::spatial::Coord;

fn default_share_min() -> f64 {
    0.8
}

fn default_share_max() -> f64 {
    1.2
}

/// Spread of the random multiplier applied to each district's equal share of
/// the footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionParams {
    #[serde(default = "default_share_min")]
    pub share_min: f64,
    #[serde(default = "default_share_max")]
    pub share_max: f64,
}

impl Default for PartitionParams {
    fn default() -> Self {
        Self {
            share_min: default_share_min(),
            share_max: default_share_max(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistrictSizeRule {
    /// Roughly `footprint / district count` cells.
    Share,
    /// A small fixed range of cells, whatever the footprint size.
    SmallFootprint { min: usize, max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistrictSpec {
    pub name: String,
    pub size_rule: DistrictSizeRule,
}

impl DistrictSpec {
    pub fn share(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size_rule: DistrictSizeRule::Share,
        }
    }

    pub fn small_footprint(name: impl Into<String>, min: usize, max: usize) -> Self {
        Self {
            name: name.into(),
            size_rule: DistrictSizeRule::SmallFootprint { min, max },
        }
    }
}

/// Result of splitting a footprint into districts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub chunks: BTreeMap<String, BTreeSet<Coord>>,
    /// Districts that found no unclaimed cell left, in processing order.
    pub skipped: Vec<String>,
}

impl Partition {
    /// Cells claimed by `name`; a district without a chunk has zero cells.
    pub fn cells(&self, name: &str) -> usize {
        self.chunks.get(name).map_or(0, BTreeSet::len)
    }

    pub fn claimed(&self) -> usize {
        self.chunks.values().map(BTreeSet::len).sum()
    }
}

pub struct DistrictPartitioner {
    params: PartitionParams,
}

impl DistrictPartitioner {
    pub fn new(params: PartitionParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PartitionParams {
        &self.params
    }

    /// Split `blob` into one connected chunk per district.
    ///
    /// Districts are visited in a freshly shuffled order. Each one seeds at the
    /// first unclaimed cell in row-major order and floods outward through
    /// unclaimed footprint cells until it reaches its drawn size. A district
    /// that finds the footprint exhausted is skipped and reported in
    /// [`Partition::skipped`]. A repeated name replaces the chunk recorded
    /// under that name earlier in the same call.
    pub fn partition<R: Rng + ?Sized>(
        &self,
        blob: &Blob,
        districts: &[DistrictSpec],
        rng: &mut R,
    ) -> Partition {
        let mut order: Vec<&DistrictSpec> = districts.iter().collect();
        order.shuffle(rng);

        let mut unclaimed = blob.clone();
        let mut partition = Partition::default();

        for district in order {
            let Some(&seed) = unclaimed.iter().next() else {
                warn!(
                    district = %district.name,
                    "no unclaimed cells left, district skipped"
                );
                partition.skipped.push(district.name.clone());
                continue;
            };

            let target = self.target_size(district.size_rule, blob.len(), districts.len(), rng);
            let chunk = flood_chunk(seed, target, &mut unclaimed);
            debug!(
                district = %district.name,
                target,
                claimed = chunk.len(),
                "district chunk claimed"
            );
            partition.chunks.insert(district.name.clone(), chunk);
        }

        partition
    }

    fn target_size<R: Rng + ?Sized>(
        &self,
        rule: DistrictSizeRule,
        blob_len: usize,
        district_count: usize,
        rng: &mut R,
    ) -> usize {
        let size = match rule {
            DistrictSizeRule::SmallFootprint { min, max } => rng.gen_range(min..=max.max(min)),
            DistrictSizeRule::Share => {
                let (low, high) = (self.params.share_min, self.params.share_max);
                let factor = if high > low {
                    rng.gen_range(low..=high)
                } else {
                    low
                };
                (blob_len as f64 / district_count as f64 * factor).floor() as usize
            }
        };
        size.max(1)
    }
}

/// Breadth-first flood from `seed` through `unclaimed`, moving every visited
/// cell out of the pool and into the returned chunk.
fn flood_chunk(seed: Coord, target: usize, unclaimed: &mut Blob) -> BTreeSet<Coord> {
    let mut chunk = BTreeSet::new();
    let mut queue = VecDeque::new();
    unclaimed.remove(&seed);
    chunk.insert(seed);
    queue.push_back(seed);

    'flood: while let Some(current) = queue.pop_front() {
        for next in current.neighbors() {
            if chunk.len() >= target {
                break 'flood;
            }
            if unclaimed.remove(&next) {
                chunk.insert(next);
                queue.push_back(next);
            }
        }
    }
    chunk
}
