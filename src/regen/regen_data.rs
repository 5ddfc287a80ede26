//! Region regeneration data - Pure Data

use std::fmt;

/// Caller choices for one regeneration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegenOptions {
    /// Seed for the ephemeral world; the source world's seed when None
    pub seed: Option<i64>,
    /// Also rewrite biomes in the destination
    pub regen_biomes: bool,
}

impl RegenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_biomes(mut self, regen_biomes: bool) -> Self {
        self.regen_biomes = regen_biomes;
        self
    }
}

/// Stages a regeneration walks through, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RegenStage {
    Prepare,
    Dispatch,
    Barrier,
    Extract,
    Teardown,
}

impl fmt::Display for RegenStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// What a successful regeneration wrote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegenReport {
    pub chunks: usize,
    pub blocks_written: usize,
    pub biomes_written: usize,
}
