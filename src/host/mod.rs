//! Host abstraction layer.
//!
//! The extension never reaches for an ambient application object. Everything
//! it needs from the host (the persisted settings blob, the workspace layout
//! and the settings tab list) is expressed by the traits here and passed in
//! explicitly.
//!
//! - [`DataStore`] - schema-less persisted blob, one per extension
//! - [`Workspace`] - leaf query, creation, view assignment and reveal
//! - [`SettingsTabHost`] - settings tab registration
//!
//! [`MemoryHost`] implements all three in memory and [`JsonFileStore`]
//! provides a file-backed [`DataStore`].

mod file_store;
mod memory;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use crate::error::{HostError, HostResult};
pub use file_store::JsonFileStore;
pub use memory::{LeafRegion, MemoryHost};

/// Handle to a host-managed slot in the panel layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LeafId(pub u64);

impl fmt::Display for LeafId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "leaf#{}", self.0)
    }
}

/// Where a requested leaf should be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeafPlacement {
    /// Reuse the active leaf position without splitting
    #[default]
    Reuse,
    /// Open a new tab next to the active leaf
    NewTab,
}

/// View assignment for a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// View type the leaf should host
    pub view_type: String,
    /// Whether the leaf becomes the active one
    pub active: bool,
}

/// Settings tab registered by an extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsTabInfo {
    /// Extension identifier owning the tab
    pub id: String,
    /// Name shown in the host's settings list
    pub name: String,
}

/// Persisted blob storage for a single extension.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Read the blob. `None` means nothing has been persisted yet.
    async fn load_data(&self) -> HostResult<Option<Value>>;

    /// Replace the blob.
    async fn save_data(&self, data: &Value) -> HostResult<()>;
}

/// Leaf layout of the host workspace.
#[async_trait]
pub trait Workspace: Send + Sync {
    /// Leaves currently hosting `view_type`, oldest first.
    fn leaves_of_type(&self, view_type: &str) -> Vec<LeafId>;

    /// Obtain a leaf to show a view in.
    async fn get_leaf(&self, placement: LeafPlacement) -> HostResult<LeafId>;

    /// Assign a view type to a leaf.
    async fn set_view_state(&self, leaf: LeafId, state: ViewState) -> HostResult<()>;

    /// Focus a leaf, expanding a collapsed sidebar if it lives in one.
    async fn reveal_leaf(&self, leaf: LeafId) -> HostResult<()>;
}

/// Settings tab registration.
pub trait SettingsTabHost: Send + Sync {
    fn add_settings_tab(&self, tab: SettingsTabInfo) -> HostResult<()>;

    fn remove_settings_tab(&self, id: &str);
}

/// Everything the extension consumes from its host.
pub trait Host: DataStore + Workspace + SettingsTabHost {}

impl<T: DataStore + Workspace + SettingsTabHost> Host for T {}
