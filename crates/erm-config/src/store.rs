//! Scale configuration stores.
//!
//! A store maps an organisation id to that organisation's [`ScaleConfig`].
//! Stores are handed to callers explicitly as `&dyn ScaleConfigStore`; there
//! is no process-wide instance.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use erm_core::types::{MatrixSize, ScaleConfig};
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult, Validate};
use crate::scale::{validate_org_id, StoredScaleConfig};

/// Persistence of scale configurations keyed by organisation id.
pub trait ScaleConfigStore: Send + Sync {
    /// Returns the stored configuration, if any.
    fn get(&self, org_id: &str) -> ConfigResult<Option<StoredScaleConfig>>;

    /// Validates and stores a configuration, replacing any previous one.
    fn put(&self, org_id: &str, config: &ScaleConfig) -> ConfigResult<StoredScaleConfig>;

    /// Removes a configuration. Returns false if none was stored.
    fn delete(&self, org_id: &str) -> ConfigResult<bool>;

    /// Organisation ids with a stored configuration, sorted.
    fn list(&self) -> ConfigResult<Vec<String>>;
}

/// The stored configuration, or the standard one for `matrix_size`.
pub fn get_or_default(
    store: &dyn ScaleConfigStore,
    org_id: &str,
    matrix_size: MatrixSize,
) -> ConfigResult<ScaleConfig> {
    match store.get(org_id)? {
        Some(stored) => Ok(stored.config),
        None => {
            debug!(org_id, %matrix_size, "no stored scale; using standard thresholds");
            Ok(ScaleConfig::standard(matrix_size))
        }
    }
}

fn check_key(org_id: &str) -> ConfigResult<()> {
    validate_org_id(org_id).map_err(|e| ConfigError::Validation {
        field: e.field,
        message: e.message,
    })
}

fn check_put(org_id: &str, config: &ScaleConfig) -> ConfigResult<()> {
    check_key(org_id)?;
    Validate::validate_or_error(config)
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

/// Store backed by a map, for tests and single-process use.
#[derive(Debug, Default)]
pub struct InMemoryScaleConfigStore {
    configs: RwLock<HashMap<String, StoredScaleConfig>>,
}

impl InMemoryScaleConfigStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScaleConfigStore for InMemoryScaleConfigStore {
    fn get(&self, org_id: &str) -> ConfigResult<Option<StoredScaleConfig>> {
        check_key(org_id)?;
        let configs = self
            .configs
            .read()
            .map_err(|e| ConfigError::Conflict(format!("Lock error: {}", e)))?;
        Ok(configs.get(org_id).cloned())
    }

    fn put(&self, org_id: &str, config: &ScaleConfig) -> ConfigResult<StoredScaleConfig> {
        check_put(org_id, config)?;
        let stored = StoredScaleConfig::new(org_id, config.clone());
        let mut configs = self
            .configs
            .write()
            .map_err(|e| ConfigError::Conflict(format!("Lock error: {}", e)))?;
        configs.insert(org_id.to_string(), stored.clone());
        info!(org_id, matrix_size = %config.matrix_size, "scale configuration stored");
        Ok(stored)
    }

    fn delete(&self, org_id: &str) -> ConfigResult<bool> {
        check_key(org_id)?;
        let mut configs = self
            .configs
            .write()
            .map_err(|e| ConfigError::Conflict(format!("Lock error: {}", e)))?;
        Ok(configs.remove(org_id).is_some())
    }

    fn list(&self) -> ConfigResult<Vec<String>> {
        let configs = self
            .configs
            .read()
            .map_err(|e| ConfigError::Conflict(format!("Lock error: {}", e)))?;
        let mut ids: Vec<String> = configs.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

// =============================================================================
// JSON FILE STORE
// =============================================================================

/// Store keeping one pretty-printed JSON document per organisation,
/// `<dir>/<org_id>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileScaleConfigStore {
    dir: PathBuf,
}

impl JsonFileScaleConfigStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> ConfigResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| ConfigError::io(&dir, &e))?;
        Ok(Self { dir })
    }

    /// Opens a store rooted at `dir` without touching the filesystem.
    ///
    /// A missing directory reads as an empty store; writes fail until it exists.
    pub fn open_read_only(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Store directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, org_id: &str) -> PathBuf {
        self.dir.join(format!("{org_id}.json"))
    }
}

impl ScaleConfigStore for JsonFileScaleConfigStore {
    fn get(&self, org_id: &str) -> ConfigResult<Option<StoredScaleConfig>> {
        check_key(org_id)?;
        let path = self.path(org_id);
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path).map_err(|e| ConfigError::io(&path, &e))?;
        let stored: StoredScaleConfig = serde_json::from_str(&text)?;
        // Hand-edited files are validated on read.
        Validate::validate_or_error(&stored.config)?;
        Ok(Some(stored))
    }

    fn put(&self, org_id: &str, config: &ScaleConfig) -> ConfigResult<StoredScaleConfig> {
        check_put(org_id, config)?;
        let stored = StoredScaleConfig::new(org_id, config.clone());
        let json = serde_json::to_string_pretty(&stored)?;

        let path = self.path(org_id);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| ConfigError::io(&tmp, &e))?;
        fs::rename(&tmp, &path).map_err(|e| ConfigError::io(&path, &e))?;

        info!(org_id, path = %path.display(), "scale configuration written");
        Ok(stored)
    }

    fn delete(&self, org_id: &str) -> ConfigResult<bool> {
        check_key(org_id)?;
        let path = self.path(org_id);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).map_err(|e| ConfigError::io(&path, &e))?;
        info!(org_id, "scale configuration deleted");
        Ok(true)
    }

    fn list(&self) -> ConfigResult<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.dir).map_err(|e| ConfigError::io(&self.dir, &e))?;
        let mut ids = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| ConfigError::io(&self.dir, &e))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if validate_org_id(stem).is_ok() {
                    ids.push(stem.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}
