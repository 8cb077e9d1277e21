//! Settings tab shown in the host's settings dialog.

use serde_json::Value;

use crate::components::{
    create_container, create_input, create_text, create_title, Element, UiEvent,
};
use crate::host::SettingsTabInfo;

use super::{Settings, DEFAULT_USERNAME, USERNAME_KEY};

/// Callback prefix for setting inputs; the rest of the id is the setting key.
pub const SETTING_CALLBACK_PREFIX: &str = "setting:";

/// A user edit to one setting.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingEdit {
    pub key: String,
    pub value: Value,
}

impl SettingEdit {
    /// Map a UI event from the settings tab to an edit.
    ///
    /// Returns `None` for events that did not come from a setting input.
    pub fn from_event(event: &UiEvent) -> Option<Self> {
        let key = event.callback.strip_prefix(SETTING_CALLBACK_PREFIX)?;
        let value = event.value.clone()?;
        Some(Self {
            key: key.to_string(),
            value: Value::String(value),
        })
    }
}

/// The extension's page in the host settings dialog.
#[derive(Debug, Clone)]
pub struct SettingsTab {
    info: SettingsTabInfo,
}

impl SettingsTab {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            info: SettingsTabInfo {
                id: id.to_string(),
                name: name.to_string(),
            },
        }
    }

    pub fn info(&self) -> &SettingsTabInfo {
        &self.info
    }

    /// Render the tab into `container`, replacing previous content.
    pub fn display(&self, container: &mut Element, settings: &Settings) {
        container.empty();

        let row = setting_row(
            container,
            "Username",
            "The username that will be used in some contextual message.",
        );
        create_input(row, USERNAME_KEY, &[])
            .set_placeholder(DEFAULT_USERNAME)
            .set_value(settings.username())
            .on_change(&format!("{}{}", SETTING_CALLBACK_PREFIX, USERNAME_KEY));
    }
}

fn setting_row<'a>(container: &'a mut Element, name: &str, description: &str) -> &'a mut Element {
    let row = create_container(container, &["setting-item"]);
    let info = create_container(row, &["setting-item-info"]);
    create_title(info, 4, name, &["setting-item-name"]);
    create_text(info, description, &["setting-item-description"]);
    create_container(row, &["setting-item-control"])
}
