//! In-process reference host
//!
//! A complete, thread-backed implementation of the host traits. It drives the
//! bridge in tests and stands in for a real server when embedding.

pub mod memory_generator;
pub mod memory_server;
pub mod memory_world;
pub mod vocabulary;

pub use memory_generator::{FlatGenerator, NoiseGenerator, NoisePalette};
pub use memory_server::{MemoryBlockRegistry, MemoryServer, MemoryServerConfig, MemoryWatchdog};
pub use memory_world::{MainThreadExecutor, MemoryChunk, MemoryChunkSource, MemoryWorld};
