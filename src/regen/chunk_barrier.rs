//! Chunk barrier
//!
//! Blocks the calling thread until every requested chunk is ready, through
//! the host's own `managed_block` so queued host work keeps running while we
//! wait. The first failure ends the wait immediately.

use rustc_hash::FxHashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{BridgeError, BridgeResult};
use crate::host::{BlockingExecutor, ChunkHandle, ChunkPoll, ChunkStatus, HostChunk, Watchdog};
use crate::world::core::ChunkPos;

/// Chunks the barrier handed back, keyed by position
pub type ReadyChunks = FxHashMap<ChunkPos, Arc<dyn HostChunk>>;

/// Waits for all handles; returns the chunks keyed by position
///
/// A chunk counts as materialized only when it resolved to a chunk at the
/// position that was asked for, at or past `target`. Anything else is a
/// failure.
pub fn await_chunks(
    executor: &dyn BlockingExecutor,
    watchdog: Option<&dyn Watchdog>,
    mut pending: Vec<ChunkHandle>,
    target: ChunkStatus,
    poll_interval: Duration,
) -> BridgeResult<ReadyChunks> {
    let total = pending.len();
    let mut ready = ReadyChunks::default();
    let mut failure: Option<BridgeError> = None;
    let mut polls = 0u64;

    executor.managed_block(poll_interval, &mut || {
        polls += 1;
        if let Some(watchdog) = watchdog {
            watchdog.tick();
        }

        let mut index = 0;
        while index < pending.len() {
            match pending[index].poll() {
                ChunkPoll::Pending => index += 1,
                ChunkPoll::Ready(chunk) => {
                    let requested = pending.swap_remove(index).pos();
                    if let Err(reason) = check_chunk(chunk.as_ref(), requested, target) {
                        failure = Some(BridgeError::ChunkGenerationFailed {
                            pos: requested,
                            reason,
                        });
                        return true;
                    }
                    ready.insert(requested, chunk);
                }
                ChunkPoll::Failed(cause) => {
                    failure = Some(BridgeError::ChunkGenerationFailed {
                        pos: cause.pos,
                        reason: cause.reason,
                    });
                    return true;
                }
            }
        }
        pending.is_empty()
    });

    if let Some(err) = failure {
        log::error!("[Regen::barrier] Aborting after {} polls: {}", polls, err);
        return Err(err);
    }
    if !pending.is_empty() {
        return Err(BridgeError::Internal {
            message: format!(
                "host stopped blocking with {} of {} chunks outstanding",
                pending.len(),
                total
            ),
        });
    }

    log::debug!("[Regen::barrier] {} chunks ready after {} polls", total, polls);
    Ok(ready)
}

fn check_chunk(
    chunk: &dyn HostChunk,
    requested: ChunkPos,
    target: ChunkStatus,
) -> Result<(), String> {
    if chunk.pos() != requested {
        return Err(format!("host returned chunk {} instead", chunk.pos()));
    }
    if chunk.status() < target {
        return Err(format!(
            "chunk only reached {:?}, {:?} was requested",
            chunk.status(),
            target
        ));
    }
    Ok(())
}
