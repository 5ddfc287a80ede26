//! Region Regenerator Operations
//!
//! Prepare -> Dispatch -> Barrier -> Extract -> Teardown, once, no retries.
//! Teardown is owned by the ephemeral world guard and runs however the
//! earlier stages end. Writes already made to the destination are kept when
//! a later stage fails.

use std::collections::BTreeSet;

use super::chunk_barrier::{await_chunks, ReadyChunks};
use super::ephemeral_world::EphemeralWorld;
use super::regen_data::{RegenOptions, RegenReport, RegenStage};
use crate::error::{BridgeError, BridgeResult};
use crate::host::{BlockRegistry, ChunkHandle, ChunkStatus, HostServer, HostWorld};
use crate::state::{BiomeType, BlockStateIdTable, PropertyCache};
use crate::tag::compound_to_neutral;
use crate::world::core::ChunkPos;
use crate::world::{Extent, Region};
use crate::BridgeConfig;

/// Everything a regeneration reads from besides its arguments
pub struct RegenContext<'a> {
    pub server: &'a dyn HostServer,
    pub cache: &'a PropertyCache,
    pub state_ids: &'a BlockStateIdTable,
    pub config: &'a BridgeConfig,
}

/// Regenerates `region` of `source` into `extent`
pub fn regenerate(
    context: &RegenContext<'_>,
    source: &dyn HostWorld,
    region: &dyn Region,
    extent: &mut dyn Extent,
    options: &RegenOptions,
) -> BridgeResult<RegenReport> {
    let mut stage = RegenStage::Prepare;
    let result = run_stages(context, source, region, extent, options, &mut stage);
    match &result {
        Ok(report) => log::info!(
            "[Regen::regenerate] '{}': {} chunks, {} blocks, {} biomes",
            source.name(),
            report.chunks,
            report.blocks_written,
            report.biomes_written
        ),
        Err(e) => log::error!(
            "[Regen::regenerate] '{}' failed during {}: {}",
            source.name(),
            stage,
            e
        ),
    }
    result
}

fn run_stages(
    context: &RegenContext<'_>,
    source: &dyn HostWorld,
    region: &dyn Region,
    extent: &mut dyn Extent,
    options: &RegenOptions,
    stage: &mut RegenStage,
) -> BridgeResult<RegenReport> {
    let chunk_positions = region.chunks();
    log::info!(
        "[Regen::regenerate] '{}': {} blocks across {} chunks",
        source.name(),
        region.volume(),
        chunk_positions.len()
    );
    let ephemeral = EphemeralWorld::create(context.server, source, options, context.config)?;

    *stage = RegenStage::Dispatch;
    let handles = dispatch(ephemeral.world(), &chunk_positions, context.config.target_stage);

    *stage = RegenStage::Barrier;
    let chunks = await_chunks(
        ephemeral.world().chunk_source().executor(),
        context.server.watchdog(),
        handles,
        context.config.target_stage,
        context.config.barrier_poll_interval(),
    )?;

    *stage = RegenStage::Extract;
    let mut report = extract(context, &chunks, region, extent, options)?;
    report.chunks = chunks.len();

    *stage = RegenStage::Teardown;
    drop(ephemeral);
    Ok(report)
}

/// One request per distinct chunk, all in flight at once
fn dispatch(
    world: &dyn HostWorld,
    positions: &BTreeSet<ChunkPos>,
    stage: ChunkStatus,
) -> Vec<ChunkHandle> {
    let source = world.chunk_source();
    positions
        .iter()
        .map(|pos| {
            log::debug!("[Regen::dispatch] Requesting chunk {} up to {:?}", pos, stage);
            source.request_chunk(*pos, stage)
        })
        .collect()
}

fn extract(
    context: &RegenContext<'_>,
    chunks: &ReadyChunks,
    region: &dyn Region,
    extent: &mut dyn Extent,
    options: &RegenOptions,
) -> BridgeResult<RegenReport> {
    let registry: &dyn BlockRegistry = context.server.blocks();
    let mut report = RegenReport::default();

    for pos in region.positions() {
        let chunk = chunks.get(&pos.chunk_pos()).ok_or_else(|| BridgeError::RegenFailed {
            pos: Some(pos),
            reason: format!("chunk {} was never materialized", pos.chunk_pos()),
        })?;

        let host_state = chunk.block_state(pos);
        let mut state = context.state_ids.resolve(registry, context.cache, &host_state)?;
        if let Some(block_entity) = chunk.block_entity(pos) {
            state = state.with_nbt(Some(compound_to_neutral(&block_entity)?));
        }
        extent.set_block(pos, state)?;
        report.blocks_written += 1;

        if options.regen_biomes {
            if let Some(key) = chunk.noise_biome(pos) {
                extent.set_biome(pos, BiomeType::new(key));
                report.biomes_written += 1;
            }
        }
    }
    Ok(report)
}
