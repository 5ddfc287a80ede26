//! Ephemeral world guard
//!
//! Owns the disposable world used by one regeneration. Dropping the guard
//! closes the chunk pipeline without saving, removes the world from the host
//! registry and deletes its storage directory, on every exit path.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

use super::regen_data::RegenOptions;
use crate::error::{BridgeError, BridgeResult};
use crate::host::{HostServer, HostWorld, WorldSettings};
use crate::BridgeConfig;

pub struct EphemeralWorld<'a> {
    server: &'a dyn HostServer,
    world: Arc<dyn HostWorld>,
    storage: Option<TempDir>,
    delete_retries: u32,
}

impl<'a> EphemeralWorld<'a> {
    /// Creates a disposable copy of `source`'s dimension, generator and style
    pub fn create(
        server: &'a dyn HostServer,
        source: &dyn HostWorld,
        options: &RegenOptions,
        config: &BridgeConfig,
    ) -> BridgeResult<Self> {
        let name = config.temp_world_name.as_str();
        if server.is_world_registered(name) {
            return Err(BridgeError::RegenInProgress {
                world: name.to_string(),
            });
        }

        let storage = tempfile::Builder::new()
            .prefix(&config.temp_dir_prefix)
            .tempdir()
            .map_err(|e| BridgeError::IoError {
                path: format!("{}*", config.temp_dir_prefix),
                error: e.to_string(),
            })?;

        let settings = WorldSettings {
            name: name.to_string(),
            storage_dir: storage.path().join(name),
            dimension: source.dimension(),
            style: source.style(),
            seed: options.seed.unwrap_or_else(|| source.seed()),
            generator: source.generator(),
        };
        log::debug!(
            "[EphemeralWorld::create] '{}' in {} (seed {}, {:?})",
            name,
            storage.path().display(),
            settings.seed,
            settings.dimension
        );

        // On failure `storage` drops here and removes the directory
        let world = server.create_world(settings)?;

        Ok(Self {
            server,
            world,
            storage: Some(storage),
            delete_retries: config.delete_retries,
        })
    }

    pub fn world(&self) -> &dyn HostWorld {
        self.world.as_ref()
    }
}

impl Drop for EphemeralWorld<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.world.chunk_source().close(false) {
            log::warn!("[EphemeralWorld::drop] Closing chunk source failed: {}", e);
        }
        let name = self.world.name().to_string();
        if !self.server.unregister_world(&name) {
            log::warn!("[EphemeralWorld::drop] World '{}' was not registered", name);
        }
        if let Some(storage) = self.storage.take() {
            delete_with_retries(storage, self.delete_retries);
        }
        log::info!("[EphemeralWorld::drop] Tore down '{}'", name);
    }
}

fn delete_with_retries(storage: TempDir, retries: u32) {
    let path: PathBuf = storage.path().to_path_buf();
    let mut last_error = match storage.close() {
        Ok(()) => return,
        Err(e) => e,
    };

    for attempt in 1..retries.max(1) {
        log::warn!(
            "[EphemeralWorld::drop] Deleting {} failed (attempt {}): {}",
            path.display(),
            attempt,
            last_error
        );
        thread::sleep(Duration::from_millis(50 * attempt as u64));
        match fs::remove_dir_all(&path) {
            Ok(()) => return,
            Err(e) if !path.exists() => {
                log::debug!("[EphemeralWorld::drop] {} already gone: {}", path.display(), e);
                return;
            }
            Err(e) => last_error = e,
        }
    }
    log::error!(
        "[EphemeralWorld::drop] Giving up on {}: {}",
        path.display(),
        last_error
    );
}
