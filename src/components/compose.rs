//! Element composition.
//!
//! Each constructor appends a new element to `parent` and returns it (or a
//! handle for controls). Every element gets a `habitude-<kind>` base class
//! ahead of the caller's classes so panels style consistently.

use super::controls::{Button, ButtonHandle, Dropdown, DropdownHandle, InputHandle, TextInput};
use super::{Element, ElementKind};

/// Prefix for generated base classes.
pub const CLASS_PREFIX: &str = "habitude";

fn append<'a>(
    parent: &'a mut Element,
    kind: ElementKind,
    base: &str,
    classes: &[&str],
) -> &'a mut Element {
    let mut all = Vec::with_capacity(classes.len() + 1);
    all.push(format!("{}-{}", CLASS_PREFIX, base));
    all.extend(classes.iter().map(|c| c.to_string()));

    parent.children.push(Element {
        kind,
        classes: all,
        children: Vec::new(),
    });
    let last = parent.children.len() - 1;
    &mut parent.children[last]
}

pub fn create_container<'a>(parent: &'a mut Element, classes: &[&str]) -> &'a mut Element {
    append(parent, ElementKind::Container, "container", classes)
}

/// Heading of `level` (1-6, clamped).
pub fn create_title<'a>(
    parent: &'a mut Element,
    level: u8,
    text: &str,
    classes: &[&str],
) -> &'a mut Element {
    let kind = ElementKind::Title {
        level: level.clamp(1, 6),
        text: text.to_string(),
    };
    append(parent, kind, "title", classes)
}

pub fn create_text<'a>(parent: &'a mut Element, text: &str, classes: &[&str]) -> &'a mut Element {
    let kind = ElementKind::Text {
        text: text.to_string(),
    };
    append(parent, kind, "text", classes)
}

pub fn create_input<'a>(parent: &'a mut Element, id: &str, classes: &[&str]) -> InputHandle<'a> {
    let kind = ElementKind::Input(TextInput {
        id: id.to_string(),
        ..Default::default()
    });
    InputHandle::new(append(parent, kind, "input", classes))
}

pub fn create_button<'a>(
    parent: &'a mut Element,
    id: &str,
    label: &str,
    classes: &[&str],
) -> ButtonHandle<'a> {
    let kind = ElementKind::Button(Button {
        id: id.to_string(),
        label: label.to_string(),
        ..Default::default()
    });
    ButtonHandle::new(append(parent, kind, "button", classes))
}

pub fn create_dropdown<'a>(
    parent: &'a mut Element,
    id: &str,
    classes: &[&str],
) -> DropdownHandle<'a> {
    let kind = ElementKind::Dropdown(Dropdown {
        id: id.to_string(),
        ..Default::default()
    });
    DropdownHandle::new(append(parent, kind, "dropdown", classes))
}
