//! In-memory host.
//!
//! Keeps a small model of the host application (a main area flanked by two
//! collapsible sidebars, an active leaf, the persisted blob and the settings
//! tab list) and lets callers inject failures. Used by the test suite and by
//! embedders that drive the extension without a real application.

use std::io;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use super::{
    DataStore, HostError, HostResult, LeafId, LeafPlacement, SettingsTabHost, SettingsTabInfo,
    ViewState, Workspace,
};

/// Area of the layout a leaf lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafRegion {
    Main,
    LeftSidebar,
    RightSidebar,
}

#[derive(Debug, Clone)]
struct Leaf {
    id: LeafId,
    region: LeafRegion,
    view_type: Option<String>,
}

#[derive(Debug, Default)]
struct HostState {
    next_leaf: u64,
    leaves: Vec<Leaf>,
    active: Option<LeafId>,
    left_collapsed: bool,
    right_collapsed: bool,
    data: Option<Value>,
    save_count: usize,
    leaves_created: usize,
    revealed: Vec<LeafId>,
    settings_tabs: Vec<SettingsTabInfo>,
    fail_next_get_leaf: Option<String>,
    fail_next_view_state: Option<String>,
    fail_next_reveal: Option<String>,
    fail_reads: Option<String>,
    fail_writes: Option<String>,
}

impl HostState {
    fn push_leaf(&mut self, region: LeafRegion, view_type: Option<String>) -> LeafId {
        self.next_leaf += 1;
        let id = LeafId(self.next_leaf);
        self.leaves.push(Leaf {
            id,
            region,
            view_type,
        });
        self.leaves_created += 1;
        id
    }

    fn leaf_mut(&mut self, id: LeafId) -> HostResult<&mut Leaf> {
        self.leaves
            .iter_mut()
            .find(|leaf| leaf.id == id)
            .ok_or(HostError::LeafNotFound(id))
    }
}

/// Host application kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryHost {
    state: Mutex<HostState>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a persisted blob already present.
    pub fn with_data(data: Value) -> Self {
        let host = Self::default();
        host.state().data = Some(data);
        host
    }

    fn state(&self) -> MutexGuard<'_, HostState> {
        // Nothing panics while holding the lock, but don't cascade if it ever does
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add a leaf as if the host had restored it from a saved layout.
    pub fn add_leaf(&self, region: LeafRegion, view_type: Option<&str>) -> LeafId {
        self.state()
            .push_leaf(region, view_type.map(str::to_string))
    }

    /// Remove a leaf from the layout.
    pub fn detach_leaf(&self, leaf: LeafId) {
        let mut state = self.state();
        state.leaves.retain(|l| l.id != leaf);
        if state.active == Some(leaf) {
            state.active = None;
        }
    }

    pub fn set_collapsed(&self, region: LeafRegion, collapsed: bool) {
        let mut state = self.state();
        match region {
            LeafRegion::LeftSidebar => state.left_collapsed = collapsed,
            LeafRegion::RightSidebar => state.right_collapsed = collapsed,
            LeafRegion::Main => {}
        }
    }

    pub fn is_collapsed(&self, region: LeafRegion) -> bool {
        let state = self.state();
        match region {
            LeafRegion::LeftSidebar => state.left_collapsed,
            LeafRegion::RightSidebar => state.right_collapsed,
            LeafRegion::Main => false,
        }
    }

    pub fn active_leaf(&self) -> Option<LeafId> {
        self.state().active
    }

    pub fn leaf_count(&self) -> usize {
        self.state().leaves.len()
    }

    /// Total number of leaves ever created, restored ones included.
    pub fn leaves_created(&self) -> usize {
        self.state().leaves_created
    }

    pub fn view_type_of(&self, leaf: LeafId) -> Option<String> {
        self.state()
            .leaves
            .iter()
            .find(|l| l.id == leaf)
            .and_then(|l| l.view_type.clone())
    }

    /// Leaves passed to `reveal_leaf`, in call order.
    pub fn revealed(&self) -> Vec<LeafId> {
        self.state().revealed.clone()
    }

    /// Current persisted blob.
    pub fn data(&self) -> Option<Value> {
        self.state().data.clone()
    }

    pub fn save_count(&self) -> usize {
        self.state().save_count
    }

    pub fn settings_tabs(&self) -> Vec<SettingsTabInfo> {
        self.state().settings_tabs.clone()
    }

    /// Make the next `get_leaf` call fail.
    pub fn fail_next_get_leaf(&self, message: &str) {
        self.state().fail_next_get_leaf = Some(message.to_string());
    }

    /// Make the next `set_view_state` call fail.
    pub fn fail_next_view_state(&self, message: &str) {
        self.state().fail_next_view_state = Some(message.to_string());
    }

    /// Make the next `reveal_leaf` call fail.
    pub fn fail_next_reveal(&self, message: &str) {
        self.state().fail_next_reveal = Some(message.to_string());
    }

    /// Fail every blob read until cleared with `None`.
    pub fn fail_reads(&self, message: Option<&str>) {
        self.state().fail_reads = message.map(str::to_string);
    }

    /// Fail every blob write until cleared with `None`.
    pub fn fail_writes(&self, message: Option<&str>) {
        self.state().fail_writes = message.map(str::to_string);
    }
}

#[async_trait]
impl DataStore for MemoryHost {
    async fn load_data(&self) -> HostResult<Option<Value>> {
        let state = self.state();
        if let Some(message) = &state.fail_reads {
            return Err(io::Error::new(io::ErrorKind::Other, message.clone()).into());
        }
        Ok(state.data.clone())
    }

    async fn save_data(&self, data: &Value) -> HostResult<()> {
        let mut state = self.state();
        if let Some(message) = &state.fail_writes {
            return Err(io::Error::new(io::ErrorKind::Other, message.clone()).into());
        }
        state.data = Some(data.clone());
        state.save_count += 1;
        Ok(())
    }
}

#[async_trait]
impl Workspace for MemoryHost {
    fn leaves_of_type(&self, view_type: &str) -> Vec<LeafId> {
        self.state()
            .leaves
            .iter()
            .filter(|leaf| leaf.view_type.as_deref() == Some(view_type))
            .map(|leaf| leaf.id)
            .collect()
    }

    async fn get_leaf(&self, placement: LeafPlacement) -> HostResult<LeafId> {
        let mut state = self.state();
        if let Some(message) = state.fail_next_get_leaf.take() {
            return Err(HostError::LeafUnavailable(message));
        }

        if placement == LeafPlacement::Reuse {
            let reusable = state.active.filter(|active| {
                state
                    .leaves
                    .iter()
                    .any(|leaf| leaf.id == *active && leaf.region == LeafRegion::Main)
            });
            if let Some(leaf) = reusable {
                return Ok(leaf);
            }
        }

        let leaf = state.push_leaf(LeafRegion::Main, None);
        state.active = Some(leaf);
        Ok(leaf)
    }

    async fn set_view_state(&self, leaf: LeafId, view_state: ViewState) -> HostResult<()> {
        let mut state = self.state();
        if let Some(message) = state.fail_next_view_state.take() {
            return Err(HostError::Rejected(message));
        }
        state.leaf_mut(leaf)?.view_type = Some(view_state.view_type);
        if view_state.active {
            state.active = Some(leaf);
        }
        Ok(())
    }

    async fn reveal_leaf(&self, leaf: LeafId) -> HostResult<()> {
        let mut state = self.state();
        if let Some(message) = state.fail_next_reveal.take() {
            return Err(HostError::Rejected(message));
        }

        let region = state.leaf_mut(leaf)?.region;
        match region {
            LeafRegion::LeftSidebar => state.left_collapsed = false,
            LeafRegion::RightSidebar => state.right_collapsed = false,
            LeafRegion::Main => {}
        }
        state.active = Some(leaf);
        state.revealed.push(leaf);
        Ok(())
    }
}

impl SettingsTabHost for MemoryHost {
    fn add_settings_tab(&self, tab: SettingsTabInfo) -> HostResult<()> {
        let mut state = self.state();
        if state.settings_tabs.iter().any(|t| t.id == tab.id) {
            return Err(HostError::Rejected(format!(
                "settings tab '{}' is already registered",
                tab.id
            )));
        }
        state.settings_tabs.push(tab);
        Ok(())
    }

    fn remove_settings_tab(&self, id: &str) {
        self.state().settings_tabs.retain(|t| t.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_leaf_reuses_active_main_leaf() {
        let host = MemoryHost::new();

        let first = host.get_leaf(LeafPlacement::Reuse).await.unwrap();
        let second = host.get_leaf(LeafPlacement::Reuse).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(host.leaf_count(), 1);

        let tab = host.get_leaf(LeafPlacement::NewTab).await.unwrap();
        assert_ne!(tab, first);
        assert_eq!(host.leaf_count(), 2);
        assert_eq!(host.active_leaf(), Some(tab));
    }

    #[tokio::test]
    async fn test_get_leaf_does_not_reuse_sidebar_leaf() {
        let host = MemoryHost::new();
        let sidebar = host.add_leaf(LeafRegion::RightSidebar, Some("outline"));
        host.reveal_leaf(sidebar).await.unwrap();

        let leaf = host.get_leaf(LeafPlacement::Reuse).await.unwrap();
        assert_ne!(leaf, sidebar);
    }

    #[tokio::test]
    async fn test_reveal_expands_collapsed_sidebar() {
        let host = MemoryHost::new();
        let leaf = host.add_leaf(LeafRegion::LeftSidebar, Some("habitude-view-home"));
        host.set_collapsed(LeafRegion::LeftSidebar, true);

        host.reveal_leaf(leaf).await.unwrap();

        assert!(!host.is_collapsed(LeafRegion::LeftSidebar));
        assert_eq!(host.active_leaf(), Some(leaf));
        assert_eq!(host.revealed(), vec![leaf]);
    }

    #[tokio::test]
    async fn test_set_view_state_unknown_leaf() {
        let host = MemoryHost::new();
        let err = host
            .set_view_state(
                LeafId(42),
                ViewState {
                    view_type: "x".to_string(),
                    active: true,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::LeafNotFound(LeafId(42))));
    }

    #[tokio::test]
    async fn test_detach_leaf_clears_active() {
        let host = MemoryHost::new();
        let leaf = host.get_leaf(LeafPlacement::Reuse).await.unwrap();
        assert_eq!(host.active_leaf(), Some(leaf));

        host.detach_leaf(leaf);

        assert_eq!(host.leaf_count(), 0);
        assert_eq!(host.active_leaf(), None);
        assert_eq!(host.leaves_created(), 1);
    }

    #[tokio::test]
    async fn test_leaves_of_type_in_creation_order() {
        let host = MemoryHost::new();
        let a = host.add_leaf(LeafRegion::Main, Some("t"));
        host.add_leaf(LeafRegion::Main, Some("other"));
        let c = host.add_leaf(LeafRegion::RightSidebar, Some("t"));

        assert_eq!(host.leaves_of_type("t"), vec![a, c]);
        assert!(host.leaves_of_type("missing").is_empty());
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let host = MemoryHost::with_data(json!({"username": "Alex"}));

        host.fail_next_get_leaf("locked");
        assert!(host.get_leaf(LeafPlacement::Reuse).await.is_err());
        let leaf = host.get_leaf(LeafPlacement::Reuse).await.unwrap();

        let home = ViewState {
            view_type: "habitude-view-home".to_string(),
            active: true,
        };
        host.fail_next_view_state("layout locked");
        assert!(host.set_view_state(leaf, home.clone()).await.is_err());
        assert_eq!(host.view_type_of(leaf), None);
        host.set_view_state(leaf, home).await.unwrap();
        assert_eq!(host.view_type_of(leaf).as_deref(), Some("habitude-view-home"));

        host.fail_reads(Some("disk gone"));
        assert!(host.load_data().await.is_err());
        host.fail_reads(None);
        assert_eq!(
            host.load_data().await.unwrap(),
            Some(json!({"username": "Alex"}))
        );

        host.fail_writes(Some("read-only"));
        assert!(host.save_data(&json!({})).await.is_err());
        assert_eq!(host.save_count(), 0);
    }

    #[test]
    fn test_settings_tab_registration_is_unique() {
        let host = MemoryHost::new();
        let tab = SettingsTabInfo {
            id: "habitude".to_string(),
            name: "Habitude".to_string(),
        };

        host.add_settings_tab(tab.clone()).unwrap();
        assert!(host.add_settings_tab(tab).is_err());

        host.remove_settings_tab("habitude");
        assert!(host.settings_tabs().is_empty());
    }
}
