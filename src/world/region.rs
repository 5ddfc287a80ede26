//! Region selections
//!
//! A region is an iterable set of absolute block positions. The chunk set is
//! always derived from the positions by coordinate shift, never stored twice.

use std::collections::BTreeSet;

use super::core::{BlockPos, ChunkPos};

/// Arbitrarily shaped block selection
pub trait Region: Send + Sync {
    /// Every block position in the selection
    fn positions(&self) -> Box<dyn Iterator<Item = BlockPos> + '_>;

    /// Number of positions in the selection, saturating at `u64::MAX`
    fn volume(&self) -> u64;

    /// De-duplicated chunk columns touched by the selection
    fn chunks(&self) -> BTreeSet<ChunkPos> {
        self.positions().map(|pos| pos.chunk_pos()).collect()
    }
}

/// Axis-aligned box, both corners inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CuboidRegion {
    min: BlockPos,
    max: BlockPos,
}

impl CuboidRegion {
    /// Corners may be given in any order
    pub fn new(a: BlockPos, b: BlockPos) -> Self {
        Self {
            min: BlockPos::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: BlockPos::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    pub fn min(&self) -> BlockPos {
        self.min
    }

    pub fn max(&self) -> BlockPos {
        self.max
    }
}

impl Region for CuboidRegion {
    fn positions(&self) -> Box<dyn Iterator<Item = BlockPos> + '_> {
        let (min, max) = (self.min, self.max);
        Box::new((min.y..=max.y).flat_map(move |y| {
            (min.z..=max.z)
                .flat_map(move |z| (min.x..=max.x).map(move |x| BlockPos::new(x, y, z)))
        }))
    }

    fn volume(&self) -> u64 {
        // Spans of up to 2^32 fit in i64 without wrapping
        let span = |lo: i32, hi: i32| (i64::from(hi) - i64::from(lo) + 1) as u64;
        span(self.min.x, self.max.x)
            .saturating_mul(span(self.min.y, self.max.y))
            .saturating_mul(span(self.min.z, self.max.z))
    }

    // Walks columns instead of every block
    fn chunks(&self) -> BTreeSet<ChunkPos> {
        let lo = self.min.chunk_pos();
        let hi = self.max.chunk_pos();
        (lo.x..=hi.x)
            .flat_map(|x| (lo.z..=hi.z).map(move |z| ChunkPos::new(x, z)))
            .collect()
    }
}

/// Explicit set of positions, for selections that are not boxes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointRegion {
    points: BTreeSet<BlockPos>,
}

impl PointRegion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pos: BlockPos) -> bool {
        self.points.insert(pos)
    }
}

impl FromIterator<BlockPos> for PointRegion {
    fn from_iter<I: IntoIterator<Item = BlockPos>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl Region for PointRegion {
    fn positions(&self) -> Box<dyn Iterator<Item = BlockPos> + '_> {
        Box::new(self.points.iter().copied())
    }

    fn volume(&self) -> u64 {
        self.points.len() as u64
    }
}
