//! Extension lifecycle.
//!
//! The host drives the extension through
//! `Unloaded -> Loading -> Ready -> Unloading -> Unloaded`:
//!
//! - [`Habitude::load`] merges persisted settings onto the defaults, then
//!   registers the settings tab and the view factories. Any failure undoes
//!   what was registered and returns the extension to `Unloaded`.
//! - [`Habitude::unload`] closes live views and persists the settings one
//!   last time.
//!
//! The host serializes calls into the extension, so every mutating
//! operation takes `&mut self` and no locking is needed.

use std::fmt;
use std::sync::Arc;

use crate::components::{Element, UiEvent};
use crate::error::{HabitudeError, HabitudeResult};
use crate::host::{Host, LeafId};
use crate::manifest::ExtensionManifest;
use crate::settings::{SettingEdit, Settings, SettingsStore, SettingsTab};
use crate::views::home::{self, VIEW_TYPE_HOME};
use crate::views::{ViewContext, ViewRegistry};

/// Where the extension is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Unloaded,
    Loading,
    Ready,
    Unloading,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Unloaded => "unloaded",
            LifecycleState::Loading => "loading",
            LifecycleState::Ready => "ready",
            LifecycleState::Unloading => "unloading",
        };
        f.write_str(name)
    }
}

/// The Habitude extension.
pub struct Habitude<H: Host> {
    manifest: ExtensionManifest,
    host: Arc<H>,
    store: SettingsStore,
    settings: Settings,
    settings_tab: SettingsTab,
    views: ViewRegistry,
    state: LifecycleState,
}

impl<H: Host + 'static> Habitude<H> {
    /// Create the extension with its bundled manifest.
    pub fn new(host: Arc<H>) -> HabitudeResult<Self> {
        Ok(Self::with_manifest(ExtensionManifest::builtin()?, host))
    }

    pub fn with_manifest(manifest: ExtensionManifest, host: Arc<H>) -> Self {
        let store = SettingsStore::new(host.clone());
        let settings_tab = SettingsTab::new(manifest.id(), &manifest.extension.title);
        Self {
            manifest,
            host,
            store,
            settings: Settings::default(),
            settings_tab,
            views: ViewRegistry::new(),
            state: LifecycleState::Unloaded,
        }
    }
}

impl<H: Host> Habitude<H> {
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn manifest(&self) -> &ExtensionManifest {
        &self.manifest
    }

    pub fn views(&self) -> &ViewRegistry {
        &self.views
    }

    fn expect_state(&self, expected: LifecycleState) -> HabitudeResult<()> {
        if self.state != expected {
            return Err(HabitudeError::InvalidState {
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }

    /// Start the extension.
    pub async fn load(&mut self) -> HabitudeResult<()> {
        self.expect_state(LifecycleState::Unloaded)?;
        self.state = LifecycleState::Loading;
        tracing::info!(
            extension = self.manifest.id(),
            version = %self.manifest.extension.version,
            "loading extension"
        );

        let mut tab_registered = false;
        match self.register_all(&mut tab_registered).await {
            Ok(()) => {
                self.state = LifecycleState::Ready;
                tracing::info!(extension = self.manifest.id(), "extension ready");
                Ok(())
            }
            Err(e) => {
                if tab_registered {
                    self.host.remove_settings_tab(self.manifest.id());
                }
                self.views = ViewRegistry::new();
                self.settings = Settings::default();
                self.state = LifecycleState::Unloaded;
                tracing::error!(
                    extension = self.manifest.id(),
                    error = %e,
                    "extension failed to load"
                );
                Err(e)
            }
        }
    }

    async fn register_all(&mut self, tab_registered: &mut bool) -> HabitudeResult<()> {
        self.settings = self.store.load().await?;

        self.host
            .add_settings_tab(self.settings_tab.info().clone())
            .map_err(HabitudeError::SettingsTab)?;
        *tab_registered = true;

        self.views.register(VIEW_TYPE_HOME, home::factory())?;
        Ok(())
    }

    /// Stop the extension, persisting the current settings.
    ///
    /// The extension ends up `Unloaded` even when the final save fails; the
    /// error is still returned.
    pub async fn unload(&mut self) -> HabitudeResult<()> {
        self.expect_state(LifecycleState::Ready)?;
        self.state = LifecycleState::Unloading;
        tracing::info!(extension = self.manifest.id(), "unloading extension");

        self.views.close_all();
        let saved = self.store.save(&self.settings).await;

        self.host.remove_settings_tab(self.manifest.id());
        self.views = ViewRegistry::new();
        self.state = LifecycleState::Unloaded;

        if let Err(e) = &saved {
            tracing::error!(
                extension = self.manifest.id(),
                error = %e,
                "failed to persist settings on unload"
            );
        }
        saved
    }

    /// Create or reveal the view of `view_type`.
    pub async fn activate_view(&mut self, view_type: &str) -> HabitudeResult<LeafId> {
        self.expect_state(LifecycleState::Ready)?;

        let ctx = ViewContext {
            settings: &self.settings,
        };
        let result = self.views.activate(&*self.host, view_type, &ctx).await;
        if let Err(e) = &result {
            tracing::warn!(view_type, error = %e, "view activation failed");
        }
        result
    }

    /// Create or reveal the home view.
    pub async fn open_home(&mut self) -> HabitudeResult<LeafId> {
        self.activate_view(VIEW_TYPE_HOME).await
    }

    /// The host closed `leaf`.
    pub fn close_leaf(&mut self, leaf: LeafId) -> bool {
        self.views.close(leaf)
    }

    /// Render the settings tab into `container`.
    pub fn display_settings(&self, container: &mut Element) {
        self.settings_tab.display(container, &self.settings);
    }

    /// Handle an event raised by the settings tab.
    ///
    /// Returns `false` for events that are not setting edits.
    pub async fn handle_ui_event(&mut self, event: &UiEvent) -> HabitudeResult<bool> {
        match SettingEdit::from_event(event) {
            Some(edit) => {
                self.apply_setting(edit).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Apply an edit, persist it, then re-render live views.
    ///
    /// Views are re-rendered even when the save fails, so they always match
    /// the in-memory settings; the save error is still returned.
    pub async fn apply_setting(&mut self, edit: SettingEdit) -> HabitudeResult<()> {
        self.expect_state(LifecycleState::Ready)?;

        self.settings.set(&edit.key, edit.value)?;
        let saved = self.store.save(&self.settings).await;

        let ctx = ViewContext {
            settings: &self.settings,
        };
        self.views.refresh(&*self.host, &ctx);

        saved?;
        tracing::debug!(key = %edit.key, "setting updated");
        Ok(())
    }
}

impl<H: Host> fmt::Debug for Habitude<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Habitude")
            .field("extension", &self.manifest.id())
            .field("state", &self.state)
            .field("settings", &self.settings)
            .field("views", &self.views)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{LeafRegion, MemoryHost, SettingsTabHost, SettingsTabInfo, Workspace};
    use crate::settings::DEFAULT_USERNAME;
    use serde_json::json;

    fn extension(host: &Arc<MemoryHost>) -> Habitude<MemoryHost> {
        Habitude::new(host.clone()).unwrap()
    }

    #[tokio::test]
    async fn test_load_reaches_ready() {
        let host = Arc::new(MemoryHost::with_data(json!({"username": "Alex"})));
        let mut ext = extension(&host);
        assert_eq!(ext.state(), LifecycleState::Unloaded);

        ext.load().await.unwrap();

        assert_eq!(ext.state(), LifecycleState::Ready);
        assert_eq!(ext.settings().username(), "Alex");
        assert!(ext.views().is_registered(VIEW_TYPE_HOME));
        assert_eq!(
            host.settings_tabs(),
            vec![SettingsTabInfo {
                id: "habitude".to_string(),
                name: "Habitude".to_string(),
            }]
        );
        // Nothing is opened automatically
        assert_eq!(host.leaf_count(), 0);
    }

    #[tokio::test]
    async fn test_settings_read_failure_aborts_startup() {
        let host = Arc::new(MemoryHost::new());
        host.fail_reads(Some("disk gone"));
        let mut ext = extension(&host);

        let err = ext.load().await.unwrap_err();

        assert!(matches!(err, HabitudeError::SettingsRead(_)));
        assert_eq!(ext.state(), LifecycleState::Unloaded);
        assert!(host.settings_tabs().is_empty());
        assert!(!ext.views().is_registered(VIEW_TYPE_HOME));
    }

    #[tokio::test]
    async fn test_tab_conflict_rolls_back() {
        let host = Arc::new(MemoryHost::new());
        host.add_settings_tab(SettingsTabInfo {
            id: "habitude".to_string(),
            name: "Someone else".to_string(),
        })
        .unwrap();
        let mut ext = extension(&host);

        let err = ext.load().await.unwrap_err();

        assert!(matches!(err, HabitudeError::SettingsTab(_)));
        assert_eq!(ext.state(), LifecycleState::Unloaded);
        assert_eq!(host.settings_tabs()[0].name, "Someone else");
    }

    #[tokio::test]
    async fn test_load_twice_is_rejected() {
        let host = Arc::new(MemoryHost::new());
        let mut ext = extension(&host);
        ext.load().await.unwrap();

        let err = ext.load().await.unwrap_err();
        assert!(matches!(
            err,
            HabitudeError::InvalidState {
                expected: LifecycleState::Unloaded,
                actual: LifecycleState::Ready,
            }
        ));
        assert_eq!(ext.state(), LifecycleState::Ready);
    }

    #[tokio::test]
    async fn test_activation_requires_ready() {
        let host = Arc::new(MemoryHost::new());
        let mut ext = extension(&host);

        let err = ext.open_home().await.unwrap_err();
        assert!(matches!(err, HabitudeError::InvalidState { .. }));
        assert_eq!(host.leaf_count(), 0);
    }

    #[tokio::test]
    async fn test_open_home_is_singleton() {
        let host = Arc::new(MemoryHost::new());
        let mut ext = extension(&host);
        ext.load().await.unwrap();

        let first = ext.open_home().await.unwrap();
        let second = ext.open_home().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(host.leaves_of_type(VIEW_TYPE_HOME), vec![first]);
        assert_eq!(host.leaves_created(), 1);
    }

    #[tokio::test]
    async fn test_activation_failure_keeps_extension_ready() {
        let host = Arc::new(MemoryHost::new());
        let mut ext = extension(&host);
        ext.load().await.unwrap();

        host.fail_next_reveal("window minimised");
        assert!(ext.open_home().await.is_err());
        assert_eq!(ext.state(), LifecycleState::Ready);

        let leaf = ext.open_home().await.unwrap();
        assert_eq!(host.active_leaf(), Some(leaf));
        assert_eq!(host.leaves_created(), 1);
    }

    #[tokio::test]
    async fn test_edit_saves_immediately_and_refreshes_view() {
        let host = Arc::new(MemoryHost::new());
        let mut ext = extension(&host);
        ext.load().await.unwrap();
        let leaf = ext.open_home().await.unwrap();
        assert_eq!(
            ext.views().view(leaf).unwrap().container().text_content(),
            "Hello!"
        );

        let handled = ext
            .handle_ui_event(&UiEvent::changed("setting:username", "Alex"))
            .await
            .unwrap();

        assert!(handled);
        assert_eq!(host.data(), Some(json!({"username": "Alex"})));
        assert_eq!(
            ext.views().view(leaf).unwrap().container().text_content(),
            "Hello, Alex!"
        );
    }

    #[tokio::test]
    async fn test_unrelated_events_are_ignored() {
        let host = Arc::new(MemoryHost::new());
        let mut ext = extension(&host);
        ext.load().await.unwrap();

        let handled = ext
            .handle_ui_event(&UiEvent::changed("habit:new", "Read"))
            .await
            .unwrap();
        assert!(!handled);
        assert_eq!(host.save_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_save_surfaces_from_edit() {
        let host = Arc::new(MemoryHost::new());
        let mut ext = extension(&host);
        ext.load().await.unwrap();
        let leaf = ext.open_home().await.unwrap();
        host.fail_writes(Some("read-only vault"));

        let err = ext
            .handle_ui_event(&UiEvent::changed("setting:username", "Alex"))
            .await
            .unwrap_err();
        assert!(matches!(err, HabitudeError::SettingsWrite(_)));

        // The edit stays in memory and the view follows it
        assert_eq!(ext.settings().username(), "Alex");
        assert_eq!(
            ext.views().view(leaf).unwrap().container().text_content(),
            "Hello, Alex!"
        );
        assert_eq!(host.data(), None);
    }

    #[tokio::test]
    async fn test_unload_persists_last_settings() {
        let host = Arc::new(MemoryHost::with_data(
            json!({"username": "Alex", "streakGoal": 30}),
        ));
        let mut ext = extension(&host);
        ext.load().await.unwrap();
        ext.open_home().await.unwrap();

        ext.unload().await.unwrap();

        assert_eq!(ext.state(), LifecycleState::Unloaded);
        assert_eq!(host.save_count(), 1);
        assert_eq!(
            host.data(),
            Some(json!({"username": "Alex", "streakGoal": 30}))
        );
        assert!(host.settings_tabs().is_empty());
        assert_eq!(ext.views().views().count(), 0);
    }

    #[tokio::test]
    async fn test_wrong_typed_username_survives_reload() {
        let host = Arc::new(MemoryHost::with_data(json!({"username": 42})));
        let mut ext = extension(&host);
        ext.load().await.unwrap();

        let leaf = ext.open_home().await.unwrap();
        assert_eq!(
            ext.views().view(leaf).unwrap().container().text_content(),
            "Hello!"
        );

        ext.unload().await.unwrap();
        assert_eq!(host.data(), Some(json!({"username": 42})));
    }

    #[tokio::test]
    async fn test_reopen_after_host_drops_leaf_keeps_one_view() {
        let host = Arc::new(MemoryHost::new());
        let mut ext = extension(&host);
        ext.load().await.unwrap();

        let first = ext.open_home().await.unwrap();
        host.detach_leaf(first);
        let second = ext.open_home().await.unwrap();

        assert_ne!(first, second);
        assert_eq!(host.leaves_of_type(VIEW_TYPE_HOME), vec![second]);
        assert_eq!(ext.views().views().count(), 1);
        assert!(!ext.close_leaf(first));
    }

    #[tokio::test]
    async fn test_unload_without_blob_writes_defaults() {
        let host = Arc::new(MemoryHost::new());
        let mut ext = extension(&host);
        ext.load().await.unwrap();
        ext.unload().await.unwrap();

        assert_eq!(host.data(), Some(json!({"username": DEFAULT_USERNAME})));
    }

    #[tokio::test]
    async fn test_unload_save_failure_still_unloads() {
        let host = Arc::new(MemoryHost::new());
        let mut ext = extension(&host);
        ext.load().await.unwrap();
        host.fail_writes(Some("disk full"));

        assert!(ext.unload().await.is_err());
        assert_eq!(ext.state(), LifecycleState::Unloaded);
    }

    #[tokio::test]
    async fn test_reload_after_unload() {
        let host = Arc::new(MemoryHost::new());
        let mut ext = extension(&host);
        ext.load().await.unwrap();
        ext.apply_setting(SettingEdit {
            key: "username".to_string(),
            value: json!("Sam"),
        })
        .await
        .unwrap();
        ext.unload().await.unwrap();

        ext.load().await.unwrap();
        assert_eq!(ext.settings().username(), "Sam");
    }

    #[tokio::test]
    async fn test_restored_sidebar_leaf_is_reused() {
        let host = Arc::new(MemoryHost::new());
        let restored = host.add_leaf(LeafRegion::LeftSidebar, Some(VIEW_TYPE_HOME));
        host.set_collapsed(LeafRegion::LeftSidebar, true);
        let mut ext = extension(&host);
        ext.load().await.unwrap();

        let leaf = ext.open_home().await.unwrap();

        assert_eq!(leaf, restored);
        assert!(!host.is_collapsed(LeafRegion::LeftSidebar));
        assert!(ext.views().view(restored).is_some());
        assert!(ext.close_leaf(restored));
    }

    #[tokio::test]
    async fn test_display_settings_reflects_current_value() {
        let host = Arc::new(MemoryHost::with_data(json!({"username": "Alex"})));
        let mut ext = extension(&host);
        ext.load().await.unwrap();

        let mut container = Element::container(&[]);
        ext.display_settings(&mut container);

        assert!(container.find_control("username").is_some());
        assert!(container.find_by_class("setting-item").is_some());
    }
}
