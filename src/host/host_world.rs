//! Host world interfaces
//!
//! The seams the bridge talks through. A concrete host implements these;
//! [`crate::host::memory`] is the in-process reference implementation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use super::chunk_future::ChunkHandle;
use super::host_block::{HostBlock, HostBlockState};
use super::host_entity::{
    BlockHit, EntityId, FakeActor, HostEntity, HostItem, HostItemStack, InteractionResult,
};
use super::host_tag::HostCompound;
use super::HostResult;
use crate::world::core::{BlockPos, ChunkPos};

/// Generation stages a chunk passes through, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChunkStatus {
    Empty,
    StructureStarts,
    Biomes,
    Noise,
    Surface,
    Carvers,
    Features,
    Light,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DimensionKind {
    Overworld,
    Nether,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorldStyle {
    Normal,
    Flat,
    Debug,
}

static NEXT_WORLD_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one loaded world instance
///
/// Ids are never reused, even across servers. References from `watch`
/// stop upgrading once the world that owns the token is dropped.
#[derive(Debug)]
pub struct WorldToken {
    id: u64,
    alive: Arc<()>,
}

impl WorldToken {
    pub fn new() -> Self {
        Self {
            id: NEXT_WORLD_ID.fetch_add(1, Ordering::Relaxed),
            alive: Arc::new(()),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn watch(&self) -> Weak<()> {
        Arc::downgrade(&self.alive)
    }
}

impl Default for WorldToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything needed to construct a world
#[derive(Clone)]
pub struct WorldSettings {
    pub name: String,
    /// Directory the world persists into
    pub storage_dir: PathBuf,
    pub dimension: DimensionKind,
    pub style: WorldStyle,
    pub seed: i64,
    pub generator: Arc<dyn ChunkGenerator>,
}

/// Deterministic terrain source
pub trait ChunkGenerator: Send + Sync {
    fn name(&self) -> &str;

    fn block_at(&self, seed: i64, pos: BlockPos) -> HostBlockState;

    /// Biome key at a position
    fn biome_at(&self, seed: i64, pos: BlockPos) -> String;

    fn block_entity_at(&self, _seed: i64, _pos: BlockPos) -> Option<HostCompound> {
        None
    }
}

/// A generated chunk, read-only from the bridge's side
pub trait HostChunk: Send + Sync {
    fn pos(&self) -> ChunkPos;

    fn status(&self) -> ChunkStatus;

    fn block_state(&self, pos: BlockPos) -> HostBlockState;

    /// Block entity data with its id included
    fn block_entity(&self, pos: BlockPos) -> Option<HostCompound>;

    /// Registered biome key, or None if the biome is not in the registry
    fn noise_biome(&self, pos: BlockPos) -> Option<String>;
}

/// Runs host tasks while the caller waits
pub trait BlockingExecutor: Send + Sync {
    /// Keeps draining pending tasks until `done` returns true, checking
    /// `done` at least once per `poll_interval`
    fn managed_block(&self, poll_interval: Duration, done: &mut dyn FnMut() -> bool);
}

/// Host liveness monitor
pub trait Watchdog: Send + Sync {
    fn tick(&self);
}

pub trait ChunkSource: Send + Sync {
    /// Schedules generation up to `stage`; never blocks
    fn request_chunk(&self, pos: ChunkPos, stage: ChunkStatus) -> ChunkHandle;

    fn executor(&self) -> &dyn BlockingExecutor;

    fn close(&self, save: bool) -> HostResult<()>;
}

/// Block registry with its numeric state id mapping
pub trait BlockRegistry: Send + Sync {
    fn block(&self, key: &str) -> Option<Arc<HostBlock>>;

    /// The fallback block, air
    fn default_block(&self) -> Arc<HostBlock>;

    /// Numeric id of a state, 0 when the state is unknown
    fn state_id(&self, state: &HostBlockState) -> u32;

    fn state_by_id(&self, id: u32) -> Option<HostBlockState>;

    fn all_states(&self) -> Vec<HostBlockState>;
}

/// The simulation host as a whole
pub trait HostServer: Send + Sync {
    /// Data version of the running host
    fn data_version(&self) -> u32;

    fn blocks(&self) -> &dyn BlockRegistry;

    fn item(&self, key: &str) -> Option<HostItem>;

    /// Fresh entity of a registered type
    fn create_entity(&self, type_key: &str) -> Option<HostEntity>;

    /// Builds and registers a world; fails if the name is taken
    fn create_world(&self, settings: WorldSettings) -> HostResult<Arc<dyn HostWorld>>;

    fn unregister_world(&self, name: &str) -> bool;

    fn is_world_registered(&self, name: &str) -> bool;

    fn world(&self, name: &str) -> Option<Arc<dyn HostWorld>>;

    fn watchdog(&self) -> Option<&dyn Watchdog>;
}

/// A live world
pub trait HostWorld: Send + Sync {
    fn name(&self) -> &str;

    /// Identity of this world instance; names can repeat across hosts
    fn token(&self) -> &WorldToken;

    fn seed(&self) -> i64;

    fn dimension(&self) -> DimensionKind;

    fn style(&self) -> WorldStyle;

    fn generator(&self) -> Arc<dyn ChunkGenerator>;

    fn chunk_source(&self) -> &dyn ChunkSource;

    fn block_state(&self, pos: BlockPos) -> HostBlockState;

    fn block_entity(&self, pos: BlockPos) -> Option<HostCompound>;

    /// Empties a container's contents; false if there is nothing to clear
    fn clear_container(&self, pos: BlockPos) -> bool;

    fn can_survive(&self, state: &HostBlockState, pos: BlockPos) -> bool;

    fn add_fresh_entity(&self, entity: HostEntity) -> EntityId;

    fn entity(&self, id: EntityId) -> Option<HostEntity>;

    fn use_item_on(
        &self,
        actor: &FakeActor,
        stack: &HostItemStack,
        hit: BlockHit,
    ) -> InteractionResult;

    fn use_block(&self, actor: &FakeActor, hit: BlockHit) -> InteractionResult;

    fn use_item(&self, actor: &FakeActor, stack: &HostItemStack) -> InteractionResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_order() {
        assert!(ChunkStatus::Features > ChunkStatus::Noise);
        assert!(ChunkStatus::Features < ChunkStatus::Full);
    }
}
