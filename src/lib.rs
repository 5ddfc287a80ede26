// Hearth Bridge - Data-Oriented Programming (DOP) Architecture
//
// Bridges a voxel editing engine to a live simulation host.
// - Data lives in *_data modules, transformations in *_operations modules
// - The host is reached only through the traits in `host`
// - `adapter::BridgeAdapter` is the single entry point for the editing engine

// Constants module
pub mod constants;

// Core bridge modules
pub mod error;
pub mod world;

// Adaptation layers
pub mod entity;
pub mod regen;
pub mod state;
pub mod tag;

// Host boundary and facade
pub mod adapter;
pub mod host;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use adapter::BridgeAdapter;
pub use entity::BaseEntity;
pub use error::{BridgeError, BridgeResult, ErrorContext, OptionExt};
pub use host::ChunkStatus;
pub use regen::{RegenOptions, RegenReport};
pub use state::{
    BaseItemStack, BiomeType, BlockState, PropertyCache, PropertyDescriptor, PropertyKind,
    PropertyValue,
};
pub use tag::{CompoundTag, Tag, TagKind};
// === Core World Types ===
pub use world::{
    BlockPos, BufferedExtent, ChunkPos, CuboidRegion, Direction, Extent, Location, PointRegion,
    Region, SideEffect, SideEffectSet,
};

/// Bridge configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Registry name of the singleton ephemeral world
    pub temp_world_name: String,
    /// Prefix of the ephemeral world's temporary directory
    pub temp_dir_prefix: String,
    /// Readiness stage requested for regenerated chunks
    pub target_stage: ChunkStatus,
    pub barrier_poll_interval_ms: u64,
    /// Attempts at deleting the temporary directory
    pub delete_retries: u32,
    /// Host data versions accepted at startup
    pub supported_data_versions: Vec<u32>,
}

impl BridgeConfig {
    /// Parse a TOML document; missing fields take their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: BridgeConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.temp_world_name.is_empty() {
            return Err(anyhow::anyhow!("BridgeConfig: temp_world_name cannot be empty"));
        }

        if self
            .temp_world_name
            .chars()
            .any(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'))
        {
            return Err(anyhow::anyhow!(
                "BridgeConfig: temp_world_name '{}' may only contain [a-z0-9_]",
                self.temp_world_name
            ));
        }

        if self.barrier_poll_interval_ms == 0 || self.barrier_poll_interval_ms > 1000 {
            return Err(anyhow::anyhow!(
                "BridgeConfig: barrier_poll_interval_ms {} outside 1..=1000. {}",
                self.barrier_poll_interval_ms,
                self.suggest_safe_config()
            ));
        }

        if self.delete_retries == 0 {
            return Err(anyhow::anyhow!("BridgeConfig: delete_retries cannot be 0"));
        }

        if self.supported_data_versions.is_empty() {
            return Err(anyhow::anyhow!(
                "BridgeConfig: supported_data_versions cannot be empty"
            ));
        }

        if self.target_stage < ChunkStatus::Noise {
            log::warn!(
                "[BridgeConfig] target_stage {:?} produces chunks without terrain",
                self.target_stage
            );
        }

        log::debug!("[BridgeConfig] Configuration validated successfully");
        Ok(())
    }

    pub fn suggest_safe_config(&self) -> String {
        let defaults = Self::default();
        let mut suggestions = vec!["Safe configuration:".to_string()];
        suggestions.push(format!("  - temp_world_name = \"{}\"", defaults.temp_world_name));
        suggestions.push(format!(
            "  - barrier_poll_interval_ms = {}",
            defaults.barrier_poll_interval_ms
        ));
        suggestions.push(format!("  - delete_retries = {}", defaults.delete_retries));
        suggestions.push(format!(
            "  - supported_data_versions = {:?}",
            defaults.supported_data_versions
        ));
        suggestions.join("\n")
    }

    pub fn barrier_poll_interval(&self) -> Duration {
        Duration::from_millis(self.barrier_poll_interval_ms)
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            temp_world_name: constants::regen::TEMP_WORLD_NAME.to_string(),
            temp_dir_prefix: constants::regen::TEMP_DIR_PREFIX.to_string(),
            target_stage: ChunkStatus::Features,
            barrier_poll_interval_ms: constants::regen::BARRIER_POLL_INTERVAL_MS,
            delete_retries: constants::regen::DELETE_RETRIES,
            supported_data_versions: constants::SUPPORTED_DATA_VERSIONS.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(BridgeConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = BridgeConfig::from_toml_str(
            r#"
            barrier_poll_interval_ms = 20
            target_stage = "Full"
            "#,
        )
        .unwrap();
        assert_eq!(config.barrier_poll_interval_ms, 20);
        assert_eq!(config.target_stage, ChunkStatus::Full);
        assert_eq!(config.temp_world_name, "hearthregentempworld");
        assert_eq!(config.supported_data_versions, vec![3463, 3465]);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = BridgeConfig::default();
        config.barrier_poll_interval_ms = 0;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("barrier_poll_interval_ms"));
        assert!(err.contains("Safe configuration"));

        let mut config = BridgeConfig::default();
        config.supported_data_versions.clear();
        assert!(config.validate().is_err());

        let mut config = BridgeConfig::default();
        config.temp_world_name = "Temp World".to_string();
        assert!(config.validate().is_err());

        assert!(BridgeConfig::from_toml_str("delete_retries = 0").is_err());
    }
}
