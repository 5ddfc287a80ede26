//! Core world data types
//!
//! Positions, directions and the side-effect vocabulary shared by every
//! other module, independent of which host is attached.

mod direction;
mod position;
mod side_effect;

pub use direction::Direction;
pub use position::{BlockPos, ChunkPos, Location};
pub use side_effect::{SideEffect, SideEffectSet, SUPPORTED_SIDE_EFFECTS};
