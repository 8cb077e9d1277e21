//! File-backed settings blob.
//!
//! Each extension gets a single JSON file in its data directory. A missing
//! or empty file reads as "nothing persisted"; anything else that fails is
//! reported to the caller.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;

use super::{DataStore, HostResult};

/// [`DataStore`] persisting the blob as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location for `extension_id`.
    pub fn for_extension(extension_id: &str) -> Self {
        Self::new(default_data_path(extension_id))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `<data dir>/habitude/<extension id>/data.json`
pub fn default_data_path(extension_id: &str) -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| {
            dirs::home_dir()
                .map(|h| h.join(".local").join("share"))
                .unwrap_or_else(|| PathBuf::from("/tmp"))
        })
        .join("habitude")
        .join(extension_id)
        .join("data.json")
}

#[async_trait]
impl DataStore for JsonFileStore {
    async fn load_data(&self) -> HostResult<Option<Value>> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&contents)?))
    }

    async fn save_data(&self, data: &Value) -> HostResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write next to the target then rename so readers never see a partial blob
        let tmp_path = self.path.with_extension("json.tmp");
        let contents = serde_json::to_string_pretty(data)?;
        fs::write(&tmp_path, contents).await?;
        fs::rename(&tmp_path, &self.path).await?;

        tracing::debug!(path = %self.path.display(), "settings blob written");
        Ok(())
    }
}
