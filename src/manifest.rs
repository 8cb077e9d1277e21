//! Extension manifest parsing.
//!
//! The extension ships a `habitude.toml` manifest that identifies it to the
//! host. The manifest `name` doubles as the extension id: it keys the
//! settings tab and the persisted blob location.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HabitudeError, HabitudeResult};

/// File name of the manifest inside an extension directory.
pub const MANIFEST_FILE: &str = "habitude.toml";

const BUILTIN_MANIFEST: &str = include_str!("../habitude.toml");

/// Complete manifest parsed from `habitude.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionManifest {
    pub extension: ExtensionMeta,
}

impl ExtensionManifest {
    /// Manifest bundled with this crate.
    pub fn builtin() -> HabitudeResult<Self> {
        Self::parse(BUILTIN_MANIFEST, Path::new(MANIFEST_FILE))
    }

    /// Load manifest from a directory containing `habitude.toml`.
    pub fn load(extension_dir: &Path) -> HabitudeResult<Self> {
        let manifest_path = extension_dir.join(MANIFEST_FILE);

        if !manifest_path.exists() {
            return Err(HabitudeError::ManifestNotFound(extension_dir.to_path_buf()));
        }

        let content = std::fs::read_to_string(&manifest_path)?;
        Self::parse(&content, &manifest_path)
    }

    fn parse(content: &str, path: &Path) -> HabitudeResult<Self> {
        let manifest: Self = toml::from_str(content).map_err(|e| HabitudeError::ManifestInvalid {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate the manifest for required fields and constraints.
    pub fn validate(&self) -> HabitudeResult<()> {
        let invalid = |message: String| HabitudeError::ManifestInvalid {
            path: PathBuf::from(MANIFEST_FILE),
            message,
        };
        let meta = &self.extension;

        if meta.name.is_empty() {
            return Err(invalid("extension.name is required".to_string()));
        }
        if !is_valid_id(&meta.name) {
            return Err(invalid(format!(
                "extension.name '{}' must be lowercase letters, digits and hyphens",
                meta.name
            )));
        }
        if meta.title.is_empty() {
            return Err(invalid("extension.title is required".to_string()));
        }
        if meta.version.is_empty() {
            return Err(invalid("extension.version is required".to_string()));
        }

        Ok(())
    }

    /// Extension id.
    pub fn id(&self) -> &str {
        &self.extension.name
    }
}

fn is_valid_id(name: &str) -> bool {
    !name.starts_with('-')
        && !name.ends_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Extension metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionMeta {
    /// Unique identifier (lowercase, alphanumeric, hyphens).
    pub name: String,

    /// Human-readable display name.
    pub title: String,

    /// Semantic version (e.g., "1.0.0").
    pub version: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub author: Option<String>,

    /// Minimum host version required.
    #[serde(default)]
    pub min_host_version: Option<String>,
}
