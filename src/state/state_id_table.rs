//! Numeric state id -> neutral state table
//!
//! Filled lazily as states are resolved, or up front from the whole host
//! vocabulary. Reads are concurrent; writes are insert-if-absent.

use dashmap::DashMap;

use super::block_state_data::BlockState;
use super::block_state_operations::{internal_state_id, to_neutral_state};
use super::property_cache::PropertyCache;
use crate::error::BridgeResult;
use crate::host::{BlockRegistry, HostBlockState};

#[derive(Default)]
pub struct BlockStateIdTable {
    states: DashMap<u32, BlockState>,
}

impl BlockStateIdTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: u32) -> Option<BlockState> {
        self.states.get(&id).map(|entry| entry.value().clone())
    }

    pub fn register(&self, id: u32, state: BlockState) {
        self.states.entry(id).or_insert(state);
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Resolves a live host state, through the table when it has a usable id
    pub fn resolve(
        &self,
        registry: &dyn BlockRegistry,
        cache: &PropertyCache,
        host_state: &HostBlockState,
    ) -> BridgeResult<BlockState> {
        let Some(id) = internal_state_id(registry, host_state) else {
            // No numeric mapping; adapt the live state directly
            return to_neutral_state(cache, host_state);
        };
        if let Some(state) = self.get(id) {
            return Ok(state);
        }
        let state = to_neutral_state(cache, host_state)?;
        self.register(id, state.clone());
        Ok(state)
    }

    /// Adapts every registered host state; returns how many were added
    pub fn populate(
        &self,
        registry: &dyn BlockRegistry,
        cache: &PropertyCache,
    ) -> BridgeResult<usize> {
        let before = self.len();
        for host_state in registry.all_states() {
            if let Some(id) = internal_state_id(registry, &host_state) {
                if !self.states.contains_key(&id) {
                    self.register(id, to_neutral_state(cache, &host_state)?);
                }
            }
        }
        let added = self.len() - before;
        log::info!("[BlockStateIdTable::populate] Mapped {} block states", added);
        Ok(added)
    }
}
