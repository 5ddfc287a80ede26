//! Host boundary
//!
//! Data types and traits describing the simulation host the bridge adapts to.

pub mod chunk_future;
pub mod host_block;
pub mod host_entity;
pub mod host_tag;
pub mod host_world;
pub mod memory;

pub use chunk_future::{
    chunk_request, ChunkHandle, ChunkLoadFailure, ChunkOutcome, ChunkPoll, ChunkPromise,
};
pub use host_block::{
    BlockFlags, HostBlock, HostBlockState, HostDirection, HostProperty, HostPropertyKind, HostValue,
    PropertyHandle,
};
pub use host_entity::{
    BlockHit, EntityId, FakeActor, HostEntity, HostItem, HostItemStack, InteractionResult,
};
pub use host_tag::{HostCompound, HostList, HostTag};
pub use host_world::{
    BlockRegistry, BlockingExecutor, ChunkGenerator, ChunkSource, ChunkStatus, DimensionKind,
    HostChunk, HostServer, HostWorld, Watchdog, WorldSettings, WorldStyle, WorldToken,
};

use thiserror::Error;

/// Failures reported by the host itself
#[derive(Error, Debug)]
pub enum HostError {
    #[error("chunk source is closed")]
    ChunkSourceClosed,

    #[error("a world named '{0}' is already registered")]
    WorldExists(String),

    #[error("world creation failed: {0}")]
    WorldCreation(String),

    #[error("host I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type HostResult<T> = Result<T, HostError>;
