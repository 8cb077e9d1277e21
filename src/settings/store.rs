//! Settings persistence.

use std::sync::Arc;

use crate::error::{HabitudeError, HabitudeResult};
use crate::host::DataStore;

use super::Settings;

/// Loads and saves [`Settings`] through the host's persisted blob.
#[derive(Clone)]
pub struct SettingsStore {
    data: Arc<dyn DataStore>,
}

impl SettingsStore {
    pub fn new(data: Arc<dyn DataStore>) -> Self {
        Self { data }
    }

    /// Read the blob and merge it onto the defaults.
    ///
    /// A missing blob is not an error; a failed read is.
    pub async fn load(&self) -> HabitudeResult<Settings> {
        let persisted = self
            .data
            .load_data()
            .await
            .map_err(HabitudeError::SettingsRead)?;

        if persisted.is_none() {
            tracing::debug!("no persisted settings, using defaults");
        }
        Ok(Settings::merged(persisted))
    }

    /// Replace the blob with the full settings object.
    pub async fn save(&self, settings: &Settings) -> HabitudeResult<()> {
        self.data
            .save_data(&settings.to_value())
            .await
            .map_err(HabitudeError::SettingsWrite)?;

        tracing::debug!("settings saved");
        Ok(())
    }
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore").finish_non_exhaustive()
    }
}
