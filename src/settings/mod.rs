//! Extension settings.
//!
//! Settings are a flat key-value object. Loading overlays whatever the host
//! persisted onto the defaults: every default key is always present,
//! persisted values win, and keys this version does not know about are kept
//! as-is so a newer version's data survives a round trip through an older one.

mod store;
mod tab;

pub use store::SettingsStore;
pub use tab::{SettingEdit, SettingsTab, SETTING_CALLBACK_PREFIX};

use serde_json::{Map, Value};

use crate::error::{HabitudeError, HabitudeResult};

pub const USERNAME_KEY: &str = "username";

/// Placeholder meaning "no username configured".
pub const DEFAULT_USERNAME: &str = "Username";

/// In-memory settings for the extension.
///
/// Values are held exactly as persisted. Typed accessors interpret them and
/// fall back to the default when a stored value has an unexpected type, but
/// the stored value itself is written back untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    values: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        let mut values = Map::new();
        values.insert(
            USERNAME_KEY.to_string(),
            Value::String(DEFAULT_USERNAME.to_string()),
        );
        Self { values }
    }
}

impl Settings {
    /// Overlay a persisted blob onto the defaults.
    ///
    /// Absence (`None` or `null`) yields pure defaults. Every persisted key
    /// wins over its default, whatever its type. A blob that is not an
    /// object cannot be merged and yields the defaults.
    pub fn merged(persisted: Option<Value>) -> Self {
        let mut settings = Self::default();

        match persisted {
            None | Some(Value::Null) => {}
            Some(Value::Object(map)) => {
                if let Some(value) = map.get(USERNAME_KEY).filter(|v| !v.is_string()) {
                    tracing::warn!(
                        key = USERNAME_KEY,
                        value = %value,
                        "persisted setting has unexpected type, keeping it as-is"
                    );
                }
                settings.values.extend(map);
            }
            Some(other) => {
                tracing::warn!(
                    blob = %other,
                    "persisted settings are not an object, using defaults"
                );
            }
        }

        settings
    }

    /// Name used in contextual messages.
    ///
    /// Reads as [`DEFAULT_USERNAME`] when the stored value is not a string.
    pub fn username(&self) -> &str {
        self.values
            .get(USERNAME_KEY)
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_USERNAME)
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.values
            .insert(USERNAME_KEY.to_string(), Value::String(username.into()));
    }

    /// Apply an edit to a known setting.
    pub fn set(&mut self, key: &str, value: Value) -> HabitudeResult<()> {
        match key {
            USERNAME_KEY => match value {
                Value::String(username) => {
                    self.set_username(username);
                    Ok(())
                }
                other => Err(HabitudeError::InvalidSetting {
                    key: key.to_string(),
                    reason: format!("expected a string, got {}", other),
                }),
            },
            _ => Err(HabitudeError::UnknownSetting(key.to_string())),
        }
    }

    /// Stored value for `key`, as persisted.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// All keys, defaults first.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = vec![USERNAME_KEY.to_string()];
        keys.extend(
            self.values
                .keys()
                .filter(|key| key.as_str() != USERNAME_KEY)
                .cloned(),
        );
        keys
    }

    /// Whether a real username has been configured.
    pub fn has_username(&self) -> bool {
        let name = self.username().trim();
        !name.is_empty() && name != DEFAULT_USERNAME
    }

    /// The full object as persisted.
    pub fn to_value(&self) -> Value {
        Value::Object(self.values.clone())
    }
}
