//! Error types for Habitude
//!
//! Host implementations report failures as [`HostError`]; the extension
//! wraps them into [`HabitudeError`] so callers can tell a failed settings
//! read apart from a failed activation.

use std::path::PathBuf;

use thiserror::Error;

use crate::extension::LifecycleState;
use crate::host::LeafId;

/// Errors reported by the host application.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Workspace cannot provide a leaf: {0}")]
    LeafUnavailable(String),

    #[error("Leaf {0} does not exist")]
    LeafNotFound(LeafId),

    #[error("Host rejected the request: {0}")]
    Rejected(String),
}

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Errors that can occur in the extension.
#[derive(Debug, Error)]
pub enum HabitudeError {
    /// The persisted settings blob could not be read
    #[error("Failed to read settings: {0}")]
    SettingsRead(#[source] HostError),

    /// The settings blob could not be written
    #[error("Failed to write settings: {0}")]
    SettingsWrite(#[source] HostError),

    /// A view type was registered twice
    #[error("View type '{0}' is already registered")]
    DuplicateViewType(String),

    #[error("View type '{0}' is not registered")]
    UnknownViewType(String),

    /// The workspace could not resolve or reveal a leaf
    #[error("Failed to activate view '{view_type}': {source}")]
    Activation {
        view_type: String,
        #[source]
        source: HostError,
    },

    #[error("Failed to register settings tab: {0}")]
    SettingsTab(#[source] HostError),

    #[error("Extension is {actual}, expected {expected}")]
    InvalidState {
        expected: LifecycleState,
        actual: LifecycleState,
    },

    #[error("Invalid value for setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    #[error("Unknown setting '{0}'")]
    UnknownSetting(String),

    #[error("Manifest not found in: {0}")]
    ManifestNotFound(PathBuf),

    #[error("Invalid manifest in {path}: {message}")]
    ManifestInvalid { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Habitude operations
pub type HabitudeResult<T> = Result<T, HabitudeError>;
