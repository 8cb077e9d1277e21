//! Interactive controls and their handles.
//!
//! Controls report interaction through callback ids. The host delivers a
//! [`UiEvent`](super::UiEvent) carrying that id whenever the user changes a
//! value or clicks a button.

use serde::{Deserialize, Serialize};

use super::Element;

/// Single-line text input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextInput {
    /// Unique identifier
    pub id: String,

    /// Placeholder text
    #[serde(default)]
    pub placeholder: Option<String>,

    /// Current value
    #[serde(default)]
    pub value: String,

    /// Callback ID for value changes
    #[serde(default)]
    pub on_change: Option<String>,
}

/// Clickable button.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    pub id: String,

    pub label: String,

    /// Rendered as the primary call to action
    #[serde(default)]
    pub cta: bool,

    /// Callback ID for clicks
    #[serde(default)]
    pub on_click: Option<String>,
}

/// Option in a dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownOption {
    /// Value reported on selection
    pub value: String,
    /// Label shown to the user
    pub title: String,
}

/// Select-one dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dropdown {
    pub id: String,

    #[serde(default)]
    pub options: Vec<DropdownOption>,

    /// Selected option value
    #[serde(default)]
    pub value: Option<String>,

    #[serde(default)]
    pub on_change: Option<String>,
}

impl Dropdown {
    /// Whether `value` is one of the options.
    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }
}

/// Handle returned by `create_input`.
///
/// Handles wrap the element that was just appended; setters are no-ops if
/// the element is not the matching control.
pub struct InputHandle<'a> {
    element: &'a mut Element,
}

impl<'a> InputHandle<'a> {
    pub(super) fn new(element: &'a mut Element) -> Self {
        Self { element }
    }

    fn with(self, apply: impl FnOnce(&mut TextInput)) -> Self {
        if let Some(input) = self.element.kind.as_input_mut() {
            apply(input);
        }
        self
    }

    pub fn set_placeholder(self, placeholder: &str) -> Self {
        self.with(|input| input.placeholder = Some(placeholder.to_string()))
    }

    pub fn set_value(self, value: &str) -> Self {
        self.with(|input| input.value = value.to_string())
    }

    /// Subscribe to value changes under `callback`.
    pub fn on_change(self, callback: &str) -> Self {
        self.with(|input| input.on_change = Some(callback.to_string()))
    }

    pub fn get(&self) -> Option<&TextInput> {
        self.element.kind.as_input()
    }
}

/// Handle returned by `create_button`.
pub struct ButtonHandle<'a> {
    element: &'a mut Element,
}

impl<'a> ButtonHandle<'a> {
    pub(super) fn new(element: &'a mut Element) -> Self {
        Self { element }
    }

    fn with(self, apply: impl FnOnce(&mut Button)) -> Self {
        if let Some(button) = self.element.kind.as_button_mut() {
            apply(button);
        }
        self
    }

    pub fn set_cta(self) -> Self {
        self.with(|button| button.cta = true)
    }

    pub fn on_click(self, callback: &str) -> Self {
        self.with(|button| button.on_click = Some(callback.to_string()))
    }

    pub fn get(&self) -> Option<&Button> {
        self.element.kind.as_button()
    }
}

/// Handle returned by `create_dropdown`.
pub struct DropdownHandle<'a> {
    element: &'a mut Element,
}

impl<'a> DropdownHandle<'a> {
    pub(super) fn new(element: &'a mut Element) -> Self {
        Self { element }
    }

    fn with(self, apply: impl FnOnce(&mut Dropdown)) -> Self {
        if let Some(dropdown) = self.element.kind.as_dropdown_mut() {
            apply(dropdown);
        }
        self
    }

    /// Append an option. The first option becomes the default selection.
    pub fn add_option(self, value: &str, title: &str) -> Self {
        self.with(|dropdown| {
            dropdown.options.push(DropdownOption {
                value: value.to_string(),
                title: title.to_string(),
            });
            if dropdown.value.is_none() {
                dropdown.value = Some(value.to_string());
            }
        })
    }

    /// Seed the selection. Values that are not options are ignored.
    pub fn set_value(self, value: &str) -> Self {
        self.with(|dropdown| {
            if dropdown.has_option(value) {
                dropdown.value = Some(value.to_string());
            }
        })
    }

    pub fn on_change(self, callback: &str) -> Self {
        self.with(|dropdown| dropdown.on_change = Some(callback.to_string()))
    }

    pub fn get(&self) -> Option<&Dropdown> {
        self.element.kind.as_dropdown()
    }
}
