//! Pending chunk results
//!
//! A chunk request hands back a [`ChunkHandle`] immediately; the host keeps
//! the matching [`ChunkPromise`] and fulfils it when the chunk reaches the
//! requested stage. A promise dropped without being fulfilled reads as a
//! failure on the handle side.

use crossbeam_channel::{self as channel, TryRecvError};
use std::fmt;
use std::sync::Arc;

use super::host_world::HostChunk;
use crate::world::core::ChunkPos;

/// Why a chunk request did not produce a chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkLoadFailure {
    pub pos: ChunkPos,
    pub reason: String,
}

impl ChunkLoadFailure {
    pub fn new(pos: ChunkPos, reason: impl Into<String>) -> Self {
        Self {
            pos,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ChunkLoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chunk {} failed: {}", self.pos, self.reason)
    }
}

pub type ChunkOutcome = Result<Arc<dyn HostChunk>, ChunkLoadFailure>;

/// Observed state of a pending chunk
#[derive(Clone)]
pub enum ChunkPoll {
    Pending,
    Ready(Arc<dyn HostChunk>),
    Failed(ChunkLoadFailure),
}

impl ChunkPoll {
    pub fn is_done(&self) -> bool {
        !matches!(self, ChunkPoll::Pending)
    }
}

impl fmt::Debug for ChunkPoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkPoll::Pending => write!(f, "Pending"),
            ChunkPoll::Ready(chunk) => write!(f, "Ready({})", chunk.pos()),
            ChunkPoll::Failed(failure) => write!(f, "Failed({})", failure),
        }
    }
}

/// Producer half, owned by whoever generates the chunk
pub struct ChunkPromise {
    sender: channel::Sender<ChunkOutcome>,
}

impl ChunkPromise {
    pub fn complete(self, outcome: ChunkOutcome) {
        // The handle may already be gone; nobody is waiting then
        let _ = self.sender.send(outcome);
    }

    pub fn fail(self, pos: ChunkPos, reason: impl Into<String>) {
        self.complete(Err(ChunkLoadFailure::new(pos, reason)));
    }
}

/// Consumer half, polled from the thread that requested the chunk
pub struct ChunkHandle {
    pos: ChunkPos,
    receiver: channel::Receiver<ChunkOutcome>,
    outcome: Option<ChunkPoll>,
}

impl ChunkHandle {
    pub fn pos(&self) -> ChunkPos {
        self.pos
    }

    /// Non-blocking check; once resolved the outcome is cached
    pub fn poll(&mut self) -> ChunkPoll {
        if let Some(done) = &self.outcome {
            return done.clone();
        }
        let state = match self.receiver.try_recv() {
            Ok(Ok(chunk)) => ChunkPoll::Ready(chunk),
            Ok(Err(failure)) => ChunkPoll::Failed(failure),
            Err(TryRecvError::Empty) => return ChunkPoll::Pending,
            Err(TryRecvError::Disconnected) => {
                ChunkPoll::Failed(ChunkLoadFailure::new(self.pos, "chunk request was dropped"))
            }
        };
        self.outcome = Some(state.clone());
        state
    }
}

impl fmt::Debug for ChunkHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkHandle")
            .field("pos", &self.pos)
            .field("outcome", &self.outcome)
            .finish()
    }
}

/// Creates a linked promise/handle pair for one chunk
pub fn chunk_request(pos: ChunkPos) -> (ChunkPromise, ChunkHandle) {
    let (sender, receiver) = channel::bounded(1);
    (
        ChunkPromise { sender },
        ChunkHandle {
            pos,
            receiver,
            outcome: None,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_until_fulfilled() {
        let pos = ChunkPos::new(2, -1);
        let (promise, mut handle) = chunk_request(pos);
        assert!(!handle.poll().is_done());
        promise.fail(pos, "boom");
        match handle.poll() {
            ChunkPoll::Failed(failure) => assert_eq!(failure.reason, "boom"),
            other => panic!("unexpected {:?}", other),
        }
        // Cached after the first resolution
        assert!(matches!(handle.poll(), ChunkPoll::Failed(_)));
    }

    #[test]
    fn test_dropped_promise_is_failure() {
        let (promise, mut handle) = chunk_request(ChunkPos::new(0, 0));
        drop(promise);
        assert!(matches!(handle.poll(), ChunkPoll::Failed(_)));
    }
}
