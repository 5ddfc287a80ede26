//! In-memory host server
//!
//! Owns the registries, the world registry and the chunk worker pool.

use parking_lot::{Mutex, RwLock};
use rustc_hash::{FxHashMap, FxHashSet};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::memory_world::{ChunkContext, MemoryWorld};
use super::vocabulary::{default_biomes, default_blocks, default_entity_types, default_items};
use crate::constants::DEFAULT_BLOCK_KEY;
use crate::host::host_block::{HostBlock, HostBlockState};
use crate::host::host_entity::{HostEntity, HostItem};
use crate::host::host_world::{
    BlockRegistry, ChunkGenerator, DimensionKind, HostServer, HostWorld, Watchdog, WorldSettings,
    WorldStyle,
};
use crate::host::{HostError, HostResult};
use crate::world::core::ChunkPos;

/// Block registry with dense state ids, air at id 0
pub struct MemoryBlockRegistry {
    blocks: FxHashMap<String, Arc<HostBlock>>,
    air: Arc<HostBlock>,
    states: Vec<HostBlockState>,
    ids: FxHashMap<HostBlockState, u32>,
}

impl MemoryBlockRegistry {
    pub fn new(blocks: Vec<Arc<HostBlock>>) -> Self {
        let air = blocks
            .iter()
            .find(|b| b.key() == DEFAULT_BLOCK_KEY)
            .cloned()
            .unwrap_or_else(|| HostBlock::new(DEFAULT_BLOCK_KEY).build());

        let mut ordered = vec![Arc::clone(&air)];
        ordered.extend(blocks.into_iter().filter(|b| b.key() != DEFAULT_BLOCK_KEY));

        let mut states = Vec::new();
        let mut ids = FxHashMap::default();
        let mut by_key = FxHashMap::default();
        for block in ordered {
            for state in block.all_states() {
                ids.insert(state.clone(), states.len() as u32);
                states.push(state);
            }
            by_key.insert(block.key().to_string(), block);
        }

        log::debug!(
            "[MemoryBlockRegistry::new] {} blocks, {} states",
            by_key.len(),
            states.len()
        );

        Self {
            blocks: by_key,
            air,
            states,
            ids,
        }
    }
}

impl BlockRegistry for MemoryBlockRegistry {
    fn block(&self, key: &str) -> Option<Arc<HostBlock>> {
        self.blocks.get(key).cloned()
    }

    fn default_block(&self) -> Arc<HostBlock> {
        Arc::clone(&self.air)
    }

    fn state_id(&self, state: &HostBlockState) -> u32 {
        self.ids.get(state).copied().unwrap_or(0)
    }

    fn state_by_id(&self, id: u32) -> Option<HostBlockState> {
        self.states.get(id as usize).cloned()
    }

    fn all_states(&self) -> Vec<HostBlockState> {
        self.states.clone()
    }
}

/// Counts liveness ticks
#[derive(Debug, Default)]
pub struct MemoryWatchdog {
    ticks: AtomicU64,
}

impl MemoryWatchdog {
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }
}

impl Watchdog for MemoryWatchdog {
    fn tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }
}

#[derive(Debug, Clone)]
pub struct MemoryServerConfig {
    pub data_version: u32,
    pub worker_threads: usize,
    pub watchdog: bool,
}

impl Default for MemoryServerConfig {
    fn default() -> Self {
        Self {
            data_version: 3465,
            worker_threads: 2,
            watchdog: true,
        }
    }
}

pub struct MemoryServer {
    data_version: u32,
    blocks: MemoryBlockRegistry,
    items: FxHashMap<String, HostItem>,
    entity_types: FxHashSet<String>,
    chunk_context: ChunkContext,
    worlds: RwLock<FxHashMap<String, Arc<MemoryWorld>>>,
    watchdog: Option<MemoryWatchdog>,
    last_storage_dir: Mutex<Option<PathBuf>>,
}

impl MemoryServer {
    /// Server with the default vocabulary
    pub fn new(config: MemoryServerConfig) -> HostResult<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads.max(1))
            .thread_name(|i| format!("chunk-worker-{}", i))
            .build()
            .map_err(|e| HostError::WorldCreation(e.to_string()))?;

        log::info!(
            "[MemoryServer::new] Data version {}, {} chunk workers",
            config.data_version,
            pool.current_num_threads()
        );

        Ok(Self {
            data_version: config.data_version,
            blocks: MemoryBlockRegistry::new(default_blocks()),
            items: default_items()
                .into_iter()
                .map(|item| (item.key.clone(), item))
                .collect(),
            entity_types: default_entity_types().into_iter().map(String::from).collect(),
            chunk_context: ChunkContext {
                pool: Arc::new(pool),
                failing_chunks: Arc::new(RwLock::new(FxHashSet::default())),
                biomes: Arc::new(default_biomes().into_iter().map(String::from).collect()),
            },
            worlds: RwLock::new(FxHashMap::default()),
            watchdog: config.watchdog.then(MemoryWatchdog::default),
            last_storage_dir: Mutex::new(None),
        })
    }

    /// Registers a world that lives only in memory
    pub fn create_live_world(
        &self,
        name: &str,
        generator: Arc<dyn ChunkGenerator>,
        seed: i64,
    ) -> HostResult<Arc<MemoryWorld>> {
        let settings = WorldSettings {
            name: name.to_string(),
            storage_dir: PathBuf::new(),
            dimension: DimensionKind::Overworld,
            style: WorldStyle::Normal,
            seed,
            generator,
        };
        self.register_world(settings, false)
    }

    pub fn memory_world(&self, name: &str) -> Option<Arc<MemoryWorld>> {
        self.worlds.read().get(name).cloned()
    }

    /// Every chunk requested at `pos` from now on fails
    pub fn inject_chunk_failure(&self, pos: ChunkPos) {
        self.chunk_context.failing_chunks.write().insert(pos);
    }

    pub fn clear_chunk_failures(&self) {
        self.chunk_context.failing_chunks.write().clear();
    }

    /// Storage directory of the last persistent world created
    pub fn last_storage_dir(&self) -> Option<PathBuf> {
        self.last_storage_dir.lock().clone()
    }

    pub fn watchdog_ticks(&self) -> u64 {
        self.watchdog.as_ref().map_or(0, MemoryWatchdog::ticks)
    }

    pub fn memory_blocks(&self) -> &MemoryBlockRegistry {
        &self.blocks
    }

    fn register_world(
        &self,
        settings: WorldSettings,
        persistent: bool,
    ) -> HostResult<Arc<MemoryWorld>> {
        let mut worlds = self.worlds.write();
        if worlds.contains_key(&settings.name) {
            return Err(HostError::WorldExists(settings.name));
        }

        if persistent {
            fs::create_dir_all(&settings.storage_dir)?;
            fs::write(settings.storage_dir.join("session.lock"), b"")?;
            *self.last_storage_dir.lock() = Some(settings.storage_dir.clone());
        }

        let name = settings.name.clone();
        let world = Arc::new(MemoryWorld::new(settings, self.chunk_context.clone(), persistent));
        worlds.insert(name.clone(), Arc::clone(&world));
        log::debug!("[MemoryServer::register_world] Registered world '{}'", name);
        Ok(world)
    }
}

impl HostServer for MemoryServer {
    fn data_version(&self) -> u32 {
        self.data_version
    }

    fn blocks(&self) -> &dyn BlockRegistry {
        &self.blocks
    }

    fn item(&self, key: &str) -> Option<HostItem> {
        self.items.get(key).cloned()
    }

    fn create_entity(&self, type_key: &str) -> Option<HostEntity> {
        self.entity_types
            .contains(type_key)
            .then(|| HostEntity::new(type_key))
    }

    fn create_world(&self, settings: WorldSettings) -> HostResult<Arc<dyn HostWorld>> {
        let world: Arc<dyn HostWorld> = self.register_world(settings, true)?;
        Ok(world)
    }

    fn unregister_world(&self, name: &str) -> bool {
        self.worlds.write().remove(name).is_some()
    }

    fn is_world_registered(&self, name: &str) -> bool {
        self.worlds.read().contains_key(name)
    }

    fn world(&self, name: &str) -> Option<Arc<dyn HostWorld>> {
        let world: Arc<dyn HostWorld> = self.memory_world(name)?;
        Some(world)
    }

    fn watchdog(&self) -> Option<&dyn Watchdog> {
        self.watchdog.as_ref().map(|w| w as &dyn Watchdog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::chunk_future::ChunkPoll;
    use crate::host::host_world::ChunkStatus;
    use crate::host::memory::FlatGenerator;
    use std::time::Duration;

    fn server() -> MemoryServer {
        MemoryServer::new(MemoryServerConfig::default()).unwrap()
    }

    #[test]
    fn test_air_is_state_zero() {
        let server = server();
        let air = server.blocks().default_block().default_state();
        assert_eq!(server.blocks().state_id(&air), 0);
        let stone = server.blocks().block("minecraft:stone").unwrap().default_state();
        assert_ne!(server.blocks().state_id(&stone), 0);
        assert_eq!(
            server.blocks().state_by_id(server.blocks().state_id(&stone)),
            Some(stone)
        );
    }

    #[test]
    fn test_world_names_are_unique() {
        let server = server();
        let flat = Arc::new(FlatGenerator::classic(server.blocks()).unwrap());
        server.create_live_world("overworld", flat.clone(), 1).unwrap();
        let err = server.create_live_world("overworld", flat, 1).err().unwrap();
        assert!(matches!(err, HostError::WorldExists(_)));
        assert!(server.unregister_world("overworld"));
        assert!(!server.is_world_registered("overworld"));
    }

    #[test]
    fn test_chunk_completes_only_while_blocking() {
        let server = server();
        let flat = Arc::new(FlatGenerator::classic(server.blocks()).unwrap());
        let world = server.create_live_world("overworld", flat, 1).unwrap();
        let source = world.chunk_source();
        let mut handle = source.request_chunk(ChunkPos::new(0, 0), ChunkStatus::Features);

        let mut outcome = ChunkPoll::Pending;
        source.executor().managed_block(Duration::from_millis(5), &mut || {
            outcome = handle.poll();
            outcome.is_done()
        });
        match outcome {
            ChunkPoll::Ready(chunk) => assert_eq!(chunk.pos(), ChunkPos::new(0, 0)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_injected_failure() {
        let server = server();
        server.inject_chunk_failure(ChunkPos::new(3, 3));
        let flat = Arc::new(FlatGenerator::classic(server.blocks()).unwrap());
        let world = server.create_live_world("overworld", flat, 1).unwrap();
        let source = world.chunk_source();
        let mut handle = source.request_chunk(ChunkPos::new(3, 3), ChunkStatus::Features);
        source.executor()
            .managed_block(Duration::from_millis(5), &mut || handle.poll().is_done());
        assert!(matches!(handle.poll(), ChunkPoll::Failed(_)));
    }
}
