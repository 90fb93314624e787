//! Widget config persistence in localStorage.

use gloo_storage::errors::StorageError;
use gloo_storage::{LocalStorage, Storage};
use tracing::warn;

use promptdock_core::config::{ConfigStore, StoredConfig, WidgetConfig};
use promptdock_core::error::WidgetError;

/// [`ConfigStore`] backed by the page's localStorage.
///
/// A missing key is a normal first visit. A corrupt entry is dropped so the
/// widget starts over from defaults instead of refusing to mount.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalConfigStore;

impl ConfigStore for LocalConfigStore {
    fn load(&self, key: &str) -> Option<StoredConfig> {
        match LocalStorage::get(key) {
            Ok(config) => Some(config),
            Err(StorageError::KeyNotFound(_)) => None,
            Err(err) => {
                let err = WidgetError::ConfigLoadCorrupt(err.to_string());
                warn!(key, %err, "using default widget config");
                None
            }
        }
    }

    fn store(&self, key: &str, config: &WidgetConfig) {
        if let Err(err) = LocalStorage::set(key, config) {
            warn!(key, %err, "widget config not persisted");
        }
    }
}
