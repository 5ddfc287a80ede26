//! World Module
//!
//! Engine-side world vocabulary: positions, directions, side effects,
//! region selections and destination extents. Nothing in here talks to the
//! host directly.

pub mod core;
pub mod extent;
pub mod region;

// Re-export core types for convenience
pub use core::{
    BlockPos, ChunkPos, Direction, Location, SideEffect, SideEffectSet, SUPPORTED_SIDE_EFFECTS,
};
pub use extent::{BufferedExtent, Extent};
pub use region::{CuboidRegion, PointRegion, Region};
