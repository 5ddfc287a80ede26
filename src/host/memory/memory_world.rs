//! In-memory worlds and their chunk pipeline
//!
//! Chunk generation runs on the server's rayon pool. Finished chunks are not
//! handed back directly: completion is queued as a main-thread task and only
//! runs while someone drains the queue through `managed_block`.

use crossbeam_channel::{self as channel, RecvTimeoutError};
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::host::chunk_future::{chunk_request, ChunkHandle, ChunkLoadFailure};
use crate::host::host_block::HostBlockState;
use crate::host::host_entity::{
    BlockHit, EntityId, FakeActor, HostEntity, HostItemStack, InteractionResult,
};
use crate::host::host_tag::{HostCompound, HostList, HostTag};
use crate::host::host_world::{
    BlockingExecutor, ChunkGenerator, ChunkSource, ChunkStatus, DimensionKind, HostChunk, HostWorld,
    WorldSettings, WorldStyle, WorldToken,
};
use crate::host::{HostError, HostResult};
use crate::world::core::{BlockPos, ChunkPos};

type MainThreadTask = Box<dyn FnOnce() + Send>;

/// Queue of work that must run on the thread blocking on it
pub struct MainThreadExecutor {
    sender: channel::Sender<MainThreadTask>,
    receiver: channel::Receiver<MainThreadTask>,
}

impl MainThreadExecutor {
    pub fn new() -> Self {
        let (sender, receiver) = channel::unbounded();
        Self { sender, receiver }
    }

    pub fn submit(&self, task: MainThreadTask) {
        // Receiver lives as long as self
        let _ = self.sender.send(task);
    }
}

impl Default for MainThreadExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockingExecutor for MainThreadExecutor {
    fn managed_block(&self, poll_interval: Duration, done: &mut dyn FnMut() -> bool) {
        while !done() {
            match self.receiver.recv_timeout(poll_interval) {
                Ok(task) => task(),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }
    }
}

/// Snapshot of generator output for one column
pub struct MemoryChunk {
    pos: ChunkPos,
    status: ChunkStatus,
    seed: i64,
    generator: Arc<dyn ChunkGenerator>,
    biomes: Arc<FxHashSet<String>>,
}

impl HostChunk for MemoryChunk {
    fn pos(&self) -> ChunkPos {
        self.pos
    }

    fn status(&self) -> ChunkStatus {
        self.status
    }

    fn block_state(&self, pos: BlockPos) -> HostBlockState {
        self.generator.block_at(self.seed, pos)
    }

    fn block_entity(&self, pos: BlockPos) -> Option<HostCompound> {
        self.generator.block_entity_at(self.seed, pos)
    }

    fn noise_biome(&self, pos: BlockPos) -> Option<String> {
        let key = self.generator.biome_at(self.seed, pos);
        self.biomes.contains(&key).then_some(key)
    }
}

/// Context a chunk source shares with the server that owns it
#[derive(Clone)]
pub struct ChunkContext {
    pub pool: Arc<rayon::ThreadPool>,
    pub failing_chunks: Arc<RwLock<FxHashSet<ChunkPos>>>,
    pub biomes: Arc<FxHashSet<String>>,
}

pub struct MemoryChunkSource {
    seed: i64,
    generator: Arc<dyn ChunkGenerator>,
    context: ChunkContext,
    executor: Arc<MainThreadExecutor>,
    storage_dir: Option<PathBuf>,
    closed: AtomicBool,
}

impl MemoryChunkSource {
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl ChunkSource for MemoryChunkSource {
    fn request_chunk(&self, pos: ChunkPos, stage: ChunkStatus) -> ChunkHandle {
        let (promise, handle) = chunk_request(pos);
        if self.is_closed() {
            promise.fail(pos, HostError::ChunkSourceClosed.to_string());
            return handle;
        }

        let seed = self.seed;
        let generator = Arc::clone(&self.generator);
        let biomes = Arc::clone(&self.context.biomes);
        let failing = Arc::clone(&self.context.failing_chunks);
        let executor = Arc::clone(&self.executor);

        self.context.pool.spawn(move || {
            let outcome = if failing.read().contains(&pos) {
                Err(ChunkLoadFailure::new(pos, "generation aborted"))
            } else {
                let chunk: Arc<dyn HostChunk> = Arc::new(MemoryChunk {
                    pos,
                    status: stage,
                    seed,
                    generator,
                    biomes,
                });
                Ok(chunk)
            };
            executor.submit(Box::new(move || promise.complete(outcome)));
        });

        handle
    }

    fn executor(&self) -> &dyn BlockingExecutor {
        self.executor.as_ref()
    }

    fn close(&self, save: bool) -> HostResult<()> {
        self.closed.store(true, Ordering::Release);
        if save {
            if let Some(dir) = &self.storage_dir {
                fs::create_dir_all(dir.join("region"))?;
            }
        }
        Ok(())
    }
}

/// World whose terrain comes from a generator plus explicit overrides
pub struct MemoryWorld {
    name: String,
    token: WorldToken,
    seed: i64,
    dimension: DimensionKind,
    style: WorldStyle,
    generator: Arc<dyn ChunkGenerator>,
    chunk_source: MemoryChunkSource,
    blocks: RwLock<FxHashMap<BlockPos, HostBlockState>>,
    block_entities: RwLock<FxHashMap<BlockPos, HostCompound>>,
    entities: RwLock<BTreeMap<EntityId, HostEntity>>,
    next_entity_id: AtomicU64,
}

impl MemoryWorld {
    pub fn new(settings: WorldSettings, context: ChunkContext, persistent: bool) -> Self {
        let executor = Arc::new(MainThreadExecutor::new());
        let storage_dir = persistent.then(|| settings.storage_dir.clone());
        Self {
            chunk_source: MemoryChunkSource {
                seed: settings.seed,
                generator: Arc::clone(&settings.generator),
                context,
                executor,
                storage_dir,
                closed: AtomicBool::new(false),
            },
            name: settings.name,
            token: WorldToken::new(),
            seed: settings.seed,
            dimension: settings.dimension,
            style: settings.style,
            generator: settings.generator,
            blocks: RwLock::new(FxHashMap::default()),
            block_entities: RwLock::new(FxHashMap::default()),
            entities: RwLock::new(BTreeMap::new()),
            next_entity_id: AtomicU64::new(1),
        }
    }

    pub fn set_block(&self, pos: BlockPos, state: HostBlockState) {
        self.blocks.write().insert(pos, state);
    }

    pub fn set_block_entity(&self, pos: BlockPos, tag: HostCompound) {
        self.block_entities.write().insert(pos, tag);
    }

    pub fn entity_count(&self) -> usize {
        self.entities.read().len()
    }
}

impl HostWorld for MemoryWorld {
    fn name(&self) -> &str {
        &self.name
    }

    fn token(&self) -> &WorldToken {
        &self.token
    }

    fn seed(&self) -> i64 {
        self.seed
    }

    fn dimension(&self) -> DimensionKind {
        self.dimension
    }

    fn style(&self) -> WorldStyle {
        self.style
    }

    fn generator(&self) -> Arc<dyn ChunkGenerator> {
        Arc::clone(&self.generator)
    }

    fn chunk_source(&self) -> &dyn ChunkSource {
        &self.chunk_source
    }

    fn block_state(&self, pos: BlockPos) -> HostBlockState {
        if let Some(state) = self.blocks.read().get(&pos) {
            return state.clone();
        }
        self.generator.block_at(self.seed, pos)
    }

    fn block_entity(&self, pos: BlockPos) -> Option<HostCompound> {
        if let Some(tag) = self.block_entities.read().get(&pos) {
            return Some(tag.clone());
        }
        self.generator.block_entity_at(self.seed, pos)
    }

    fn clear_container(&self, pos: BlockPos) -> bool {
        if !self.block_state(pos).block().flags().container {
            return false;
        }
        let mut block_entities = self.block_entities.write();
        match block_entities.get_mut(&pos) {
            Some(tag) => {
                tag.put("Items", HostTag::List(HostList::new()));
                true
            }
            None => false,
        }
    }

    fn can_survive(&self, state: &HostBlockState, pos: BlockPos) -> bool {
        !state.block().flags().needs_support || !self.block_state(pos.below()).is_air()
    }

    fn add_fresh_entity(&self, entity: HostEntity) -> EntityId {
        let id = self.next_entity_id.fetch_add(1, Ordering::Relaxed);
        self.entities.write().insert(id, entity);
        id
    }

    fn entity(&self, id: EntityId) -> Option<HostEntity> {
        self.entities.read().get(&id).cloned()
    }

    fn use_item_on(
        &self,
        _actor: &FakeActor,
        stack: &HostItemStack,
        _hit: BlockHit,
    ) -> InteractionResult {
        if stack.count <= 0 {
            return InteractionResult::Pass;
        }
        stack.item.use_on_block
    }

    fn use_block(&self, _actor: &FakeActor, hit: BlockHit) -> InteractionResult {
        if self.block_state(hit.pos).block().flags().interactive {
            InteractionResult::Consume
        } else {
            InteractionResult::Pass
        }
    }

    fn use_item(&self, _actor: &FakeActor, stack: &HostItemStack) -> InteractionResult {
        if stack.count <= 0 {
            return InteractionResult::Pass;
        }
        stack.item.use_in_air
    }
}
