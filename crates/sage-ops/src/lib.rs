//! Operational helpers: logging setup and dataset persistence.

use std::{
    fs,
    path::{Path, PathBuf},
};

use sage_types::{config::OpsConfig, dataset::StoredDataset, Result, SageError};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_tracing(config: &OpsConfig) -> Result<()> {
    let filter = EnvFilter::try_new(config.log_level.clone())
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|err| SageError::Ops(format!("failed to create log filter: {err}")))?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| SageError::Ops(format!("tracing init error: {err}")))?;
    Ok(())
}

/// Load/save boundary for the last normalized dataset.
///
/// Loading returns the stored snapshot verbatim; nothing is re-validated.
pub trait DatasetStore {
    fn load(&self) -> Result<Option<StoredDataset>>;
    fn save(&mut self, snapshot: StoredDataset) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

/// Keeps the snapshot in memory for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    current: Option<StoredDataset>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DatasetStore for MemoryStore {
    fn load(&self) -> Result<Option<StoredDataset>> {
        Ok(self.current.clone())
    }

    fn save(&mut self, snapshot: StoredDataset) -> Result<()> {
        self.current = Some(snapshot);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.current = None;
        Ok(())
    }
}

/// Persists the snapshot as a JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetStore for JsonFileStore {
    fn load(&self) -> Result<Option<StoredDataset>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path).map_err(|err| {
            SageError::Store(format!("unable to read {}: {err}", self.path.display()))
        })?;
        let snapshot = serde_json::from_str(&contents).map_err(|err| {
            SageError::Store(format!("corrupt dataset {}: {err}", self.path.display()))
        })?;
        Ok(Some(snapshot))
    }

    fn save(&mut self, snapshot: StoredDataset) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|err| {
                SageError::Store(format!("failed to create store dir {:?}: {err}", dir))
            })?;
        }
        let doc = serde_json::to_string(&snapshot)
            .map_err(|err| SageError::Store(format!("failed to encode dataset: {err}")))?;
        fs::write(&self.path, doc).map_err(|err| {
            SageError::Store(format!("unable to write {}: {err}", self.path.display()))
        })?;
        info!(
            "Stored {} {} records at {:?}",
            snapshot.dataset.len(),
            snapshot.dataset.schema(),
            self.path
        );
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|err| {
                SageError::Store(format!("unable to remove {}: {err}", self.path.display()))
            })?;
        }
        Ok(())
    }
}
