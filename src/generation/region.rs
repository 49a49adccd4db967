use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Blob, GenerationError};
use crate::rng::RngExt;
use crate::spatial::{Bounds, Coord};

fn default_expansion_chance() -> f64 {
    0.62
}

fn default_center_jitter() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthParams {
    /// Probability that a frontier cell spreads into one free neighbour.
    #[serde(default = "default_expansion_chance")]
    pub expansion_chance: f64,
    /// Largest per-axis offset of the seed from the grid center.
    #[serde(default = "default_center_jitter")]
    pub center_jitter: u32,
}

impl Default for GrowthParams {
    fn default() -> Self {
        Self {
            expansion_chance: default_expansion_chance(),
            center_jitter: default_center_jitter(),
        }
    }
}

/// Grows a randomized, 4-connected footprint out from the grid center.
pub struct RegionGrower {
    params: GrowthParams,
}

impl RegionGrower {
    pub fn new(params: GrowthParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &GrowthParams {
        &self.params
    }

    /// Run one randomized breadth-first expansion.
    ///
    /// The result is always connected and never larger than `target_count`,
    /// but it can be smaller when every trial on the frontier fails. There is
    /// no retry.
    pub fn grow<R: Rng + ?Sized>(
        &self,
        grid_size: u32,
        target_count: usize,
        avoid_edges: bool,
        rng: &mut R,
    ) -> Result<Blob, GenerationError> {
        let grid = Bounds::grid(grid_size).ok_or(GenerationError::InvalidGrid)?;
        if target_count == 0 {
            return Err(GenerationError::InvalidTarget);
        }
        let allowed = if avoid_edges {
            Bounds::inset(grid_size)
        } else {
            Some(grid)
        };

        let start = self.pick_start(allowed.unwrap_or(grid), grid_size, rng);
        let mut filled = Blob::from([start]);
        let mut frontier = VecDeque::from([start]);

        'grow: while let Some(current) = frontier.pop_front() {
            for next in current.neighbors() {
                if filled.len() >= target_count {
                    break 'grow;
                }
                let in_bounds = allowed.is_some_and(|bounds| bounds.contains(next));
                if !in_bounds || filled.contains(&next) {
                    continue;
                }
                if rng.chance(self.params.expansion_chance) {
                    filled.insert(next);
                    frontier.push_back(next);
                }
            }
        }

        if filled.len() < target_count {
            debug!(
                grown = filled.len(),
                target = target_count,
                "footprint frontier died out before reaching target"
            );
        }
        Ok(filled)
    }

    fn pick_start<R: Rng + ?Sized>(&self, within: Bounds, grid_size: u32, rng: &mut R) -> Coord {
        let center = grid_size / 2;
        let jitter = i64::from(self.params.center_jitter);
        if jitter == 0 {
            return Coord::new(center, center);
        }
        let mut offset = |axis: u32| {
            let shifted = i64::from(axis) + rng.gen_range(-jitter..=jitter);
            shifted.clamp(0, i64::from(u32::MAX)) as u32
        };
        let x = offset(center);
        let y = offset(center);
        within.clamp(Coord::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::is_connected;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn grower(expansion_chance: f64, center_jitter: u32) -> RegionGrower {
        RegionGrower::new(GrowthParams {
            expansion_chance,
            center_jitter,
        })
    }

    #[test]
    fn test_certain_growth_fills_diamond() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let blob = grower(1.0, 0).grow(5, 9, false, &mut rng).unwrap();

        let expected: Blob = [
            (2, 2),
            (2, 1),
            (2, 3),
            (1, 2),
            (3, 2),
            (2, 0),
            (1, 1),
            (3, 1),
            (2, 4),
        ]
        .into_iter()
        .map(|(x, y)| Coord::new(x, y))
        .collect();
        assert_eq!(blob, expected);
    }

    #[test]
    fn test_zero_chance_keeps_only_seed() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let blob = grower(0.0, 0).grow(9, 20, false, &mut rng).unwrap();
        assert_eq!(blob, Blob::from([Coord::new(4, 4)]));
    }

    #[test]
    fn test_certain_growth_fills_whole_grid() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let blob = grower(1.0, 1).grow(6, 100, false, &mut rng).unwrap();
        assert_eq!(blob.len(), 36);
    }

    #[test]
    fn test_avoid_edges_keeps_margin() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let blob = grower(1.0, 0).grow(7, 100, true, &mut rng).unwrap();
        assert_eq!(blob.len(), 25);
        assert!(blob
            .iter()
            .all(|c| (1..=5).contains(&c.x) && (1..=5).contains(&c.y)));
    }

    #[test]
    fn test_avoid_edges_on_tiny_grid_stalls() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let blob = grower(1.0, 1).grow(2, 4, true, &mut rng).unwrap();
        assert_eq!(blob.len(), 1);
    }

    #[test]
    fn test_single_cell_grid() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let blob = grower(0.6, 1).grow(1, 5, false, &mut rng).unwrap();
        assert_eq!(blob, Blob::from([Coord::new(0, 0)]));
    }

    #[test]
    fn test_rejects_invalid_input() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        assert_eq!(
            grower(0.6, 1).grow(0, 5, false, &mut rng),
            Err(GenerationError::InvalidGrid)
        );
        assert_eq!(
            grower(0.6, 1).grow(5, 0, false, &mut rng),
            Err(GenerationError::InvalidTarget)
        );
    }

    #[test]
    fn test_random_growth_is_connected_and_bounded() {
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let blob = grower(0.62, 2).grow(16, 80, seed % 2 == 0, &mut rng).unwrap();
            assert!(!blob.is_empty());
            assert!(blob.len() <= 80);
            assert!(blob.iter().all(|c| c.x < 16 && c.y < 16));
            assert!(is_connected(&blob), "seed {seed} produced a split footprint");
        }
    }

    #[test]
    fn test_seeded_growth_is_reproducible() {
        let a = grower(0.62, 1)
            .grow(20, 150, true, &mut ChaCha8Rng::seed_from_u64(99))
            .unwrap();
        let b = grower(0.62, 1)
            .grow(20, 150, true, &mut ChaCha8Rng::seed_from_u64(99))
            .unwrap();
        assert_eq!(a, b);
    }
}
