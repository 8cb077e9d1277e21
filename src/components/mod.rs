//! Element tree for extension panels.
//!
//! Views and the settings tab describe their content as a tree of
//! serializable [`Element`]s. The host turns the tree into its native widgets
//! and reports interaction back as [`UiEvent`]s.
//!
//! Trees are built through the composition functions re-exported here
//! (`create_container`, `create_title`, ...), which attach consistent styling
//! classes.
//!
//! # Example
//!
//! ```
//! use habitude::components::{create_container, create_title, Element};
//!
//! let mut root = Element::container(&["habitude-view"]);
//! let header = create_container(&mut root, &["habitude-header"]);
//! create_title(header, 2, "Hello!", &[]);
//!
//! assert_eq!(root.text_content(), "Hello!");
//! ```

mod compose;
mod controls;

pub use compose::{
    create_button, create_container, create_dropdown, create_input, create_text, create_title,
    CLASS_PREFIX,
};
pub use controls::{
    Button, ButtonHandle, Dropdown, DropdownHandle, DropdownOption, InputHandle, TextInput,
};

use serde::{Deserialize, Serialize};

/// What an element is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ElementKind {
    /// Structural grouping
    Container,
    /// Heading
    Title { level: u8, text: String },
    /// Paragraph text
    Text { text: String },
    /// Text input field
    Input(TextInput),
    /// Button
    Button(Button),
    /// Dropdown/select field
    Dropdown(Dropdown),
}

impl ElementKind {
    pub fn as_input(&self) -> Option<&TextInput> {
        match self {
            ElementKind::Input(input) => Some(input),
            _ => None,
        }
    }

    pub fn as_button(&self) -> Option<&Button> {
        match self {
            ElementKind::Button(button) => Some(button),
            _ => None,
        }
    }

    pub fn as_dropdown(&self) -> Option<&Dropdown> {
        match self {
            ElementKind::Dropdown(dropdown) => Some(dropdown),
            _ => None,
        }
    }

    fn as_input_mut(&mut self) -> Option<&mut TextInput> {
        match self {
            ElementKind::Input(input) => Some(input),
            _ => None,
        }
    }

    fn as_button_mut(&mut self) -> Option<&mut Button> {
        match self {
            ElementKind::Button(button) => Some(button),
            _ => None,
        }
    }

    fn as_dropdown_mut(&mut self) -> Option<&mut Dropdown> {
        match self {
            ElementKind::Dropdown(dropdown) => Some(dropdown),
            _ => None,
        }
    }
}

/// Node in a panel's element tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    #[serde(flatten)]
    pub kind: ElementKind,

    /// Styling classes
    #[serde(default)]
    pub classes: Vec<String>,

    #[serde(default)]
    pub children: Vec<Element>,
}

impl Element {
    /// Bare element of `kind` with the given classes.
    pub fn new(kind: ElementKind, classes: &[&str]) -> Self {
        Self {
            kind,
            classes: classes.iter().map(|c| c.to_string()).collect(),
            children: Vec::new(),
        }
    }

    /// Top-level container, e.g. the content area of a leaf.
    pub fn container(classes: &[&str]) -> Self {
        Self::new(ElementKind::Container, classes)
    }

    /// Remove all children.
    pub fn empty(&mut self) {
        self.children.clear();
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Depth-first search for the first element carrying `class`.
    pub fn find_by_class(&self, class: &str) -> Option<&Element> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_class(class))
    }

    /// Depth-first search for the control with id `id`.
    pub fn find_control(&self, id: &str) -> Option<&Element> {
        let matches = match &self.kind {
            ElementKind::Input(input) => input.id == id,
            ElementKind::Button(button) => button.id == id,
            ElementKind::Dropdown(dropdown) => dropdown.id == id,
            _ => false,
        };
        if matches {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_control(id))
    }

    /// Visible text of this element and its descendants, space separated.
    pub fn text_content(&self) -> String {
        let mut parts = Vec::new();
        self.collect_text(&mut parts);
        parts.join(" ")
    }

    fn collect_text<'a>(&'a self, parts: &mut Vec<&'a str>) {
        match &self.kind {
            ElementKind::Title { text, .. } | ElementKind::Text { text } => parts.push(text),
            ElementKind::Button(button) => parts.push(&button.label),
            _ => {}
        }
        for child in &self.children {
            child.collect_text(parts);
        }
    }
}

/// User interaction reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiEvent {
    /// Callback ID the control subscribed with
    pub callback: String,
    /// New value for inputs and dropdowns
    #[serde(default)]
    pub value: Option<String>,
}

impl UiEvent {
    pub fn changed(callback: &str, value: &str) -> Self {
        Self {
            callback: callback.to_string(),
            value: Some(value.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Element {
        let mut root = Element::container(&["root"]);
        let header = create_container(&mut root, &["header"]);
        create_title(header, 2, "Hello!", &[]);
        let main = create_container(&mut root, &["main"]);
        create_text(main, "Nothing yet", &[]);
        create_input(main, "username", &[]).set_value("Alex");
        root
    }

    #[test]
    fn test_element_serialize() {
        let root = sample_tree();
        let json = serde_json::to_string(&root).unwrap();
        assert!(json.contains("\"type\":\"Container\""));
        assert!(json.contains("\"type\":\"Title\""));
        assert!(json.contains("\"type\":\"Input\""));

        let parsed: Element = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, root);
    }

    #[test]
    fn test_find_helpers() {
        let root = sample_tree();

        let header = root.find_by_class("header").unwrap();
        assert_eq!(header.text_content(), "Hello!");
        assert!(root.find_by_class("footer").is_none());

        let input = root.find_control("username").unwrap().kind.as_input();
        assert_eq!(input.map(|i| i.value.as_str()), Some("Alex"));
        assert!(header.kind.as_button().is_none());
        assert_eq!(root.text_content(), "Hello! Nothing yet");
    }

    #[test]
    fn test_empty_clears_children() {
        let mut root = sample_tree();
        root.empty();
        assert!(root.children.is_empty());
        assert!(root.has_class("root"));
    }

    #[test]
    fn test_ui_event_deserialize() {
        let json = r#"{"callback": "setting:username", "value": "Alex"}"#;
        let event: UiEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, UiEvent::changed("setting:username", "Alex"));
    }
}
