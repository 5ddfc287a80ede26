//! Region Regenerator
//!
//! Rebuilds a selection from a disposable copy of its world and streams the
//! result into a destination extent.

pub mod chunk_barrier;
pub mod ephemeral_world;
pub mod regen_data;
pub mod regen_operations;

pub use chunk_barrier::{await_chunks, ReadyChunks};
pub use ephemeral_world::EphemeralWorld;
pub use regen_data::{RegenOptions, RegenReport, RegenStage};
pub use regen_operations::{regenerate, RegenContext};
