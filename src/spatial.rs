//! Grid coordinates and 4-connectivity

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell position on the square settlement grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: u32,
    pub y: u32,
}

impl Coord {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Axis neighbours in north, south, west, east order. Cells that would
    /// fall below zero are left out; the upper edge is the caller's concern.
    pub fn neighbors(self) -> impl Iterator<Item = Coord> {
        let Coord { x, y } = self;
        [
            y.checked_sub(1).map(|ny| Coord::new(x, ny)),
            y.checked_add(1).map(|ny| Coord::new(x, ny)),
            x.checked_sub(1).map(|nx| Coord::new(nx, y)),
            x.checked_add(1).map(|nx| Coord::new(nx, y)),
        ]
        .into_iter()
        .flatten()
    }

    pub fn is_adjacent(self, other: Coord) -> bool {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) == 1
    }
}

// Row-major: top row first, left to right.
impl Ord for Coord {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Inclusive rectangle of cells a generator may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    min: u32,
    max: u32,
}

impl Bounds {
    /// The whole `size` × `size` grid. `None` for a zero-sized grid.
    pub fn grid(size: u32) -> Option<Self> {
        size.checked_sub(1).map(|max| Self { min: 0, max })
    }

    /// The grid with a one-cell margin removed on every side. `None` when
    /// nothing is left.
    pub fn inset(size: u32) -> Option<Self> {
        if size < 3 {
            None
        } else {
            Some(Self {
                min: 1,
                max: size - 2,
            })
        }
    }

    pub fn contains(&self, coord: Coord) -> bool {
        (self.min..=self.max).contains(&coord.x) && (self.min..=self.max).contains(&coord.y)
    }

    pub fn clamp(&self, coord: Coord) -> Coord {
        Coord::new(
            coord.x.clamp(self.min, self.max),
            coord.y.clamp(self.min, self.max),
        )
    }
}

/// `true` when every coordinate in `cells` can reach every other one through
/// axis-adjacent members. An empty set counts as connected.
pub fn is_connected<'a, I>(cells: I) -> bool
where
    I: IntoIterator<Item = &'a Coord>,
{
    use std::collections::{HashSet, VecDeque};

    let cells: HashSet<Coord> = cells.into_iter().copied().collect();
    let Some(&start) = cells.iter().next() else {
        return true;
    };
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        for next in current.neighbors() {
            if cells.contains(&next) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen.len() == cells.len()
}
