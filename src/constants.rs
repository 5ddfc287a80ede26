//! Bridge-wide constants
//!
//! Values shared between the adapter, the regenerator and the reference host.

/// Chunk coordinate math
pub mod chunk {
    /// Block coordinates are shifted right by this amount to get chunk coordinates
    pub const CHUNK_SHIFT: i32 = 4;
    /// Lowest buildable y in the overworld
    pub const MIN_BUILD_HEIGHT: i32 = -64;
}

/// Regeneration defaults
pub mod regen {
    /// Singleton id of the disposable world used for regeneration
    pub const TEMP_WORLD_NAME: &str = "hearthregentempworld";
    /// Prefix of the temporary storage directory
    pub const TEMP_DIR_PREFIX: &str = "HearthBridgeWorldGen";
    /// Default sleep between barrier polls
    pub const BARRIER_POLL_INTERVAL_MS: u64 = 5;
    /// Attempts made at removing the temporary storage directory
    pub const DELETE_RETRIES: u32 = 5;
}

/// Host data versions this bridge knows how to talk to (1.20 and 1.20.1)
pub const SUPPORTED_DATA_VERSIONS: [u32; 2] = [3463, 3465];

/// Entity tag fields that must never be copied onto a freshly created entity
pub const NO_COPY_ENTITY_NBT_FIELDS: [&str; 7] = [
    "UUIDLeast",
    "UUIDMost",
    "UUID",
    "WorldUUIDLeast",
    "WorldUUIDMost",
    "PersistentIDMSB",
    "PersistentIDLSB",
];

/// Key of the nested passenger list inside an entity tag
pub const PASSENGERS_KEY: &str = "Passengers";

/// Key the host's default (air) block is registered under
pub const DEFAULT_BLOCK_KEY: &str = "minecraft:air";
