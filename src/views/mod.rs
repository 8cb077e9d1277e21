//! Panel views.
//!
//! A view type is an opaque string. Each registered type maps to a
//! [`ViewFactory`] that builds a [`View`] bound to one workspace leaf. A
//! view's behaviour is a plain [`ViewBehavior`] record of functions rather
//! than a trait object per type, so adding a panel means adding a factory.
//!
//! ```text
//! ViewRegistry
//! ├── factories: HashMap<view type, ViewFactory>
//! └── views: BTreeMap<LeafId, View>
//! ```

pub mod home;
mod registry;

pub use registry::ViewRegistry;

use crate::components::Element;
use crate::host::LeafId;
use crate::settings::Settings;

/// What a view can see of the extension when it opens.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub settings: &'a Settings,
}

/// Builds a view for a freshly assigned leaf.
pub type ViewFactory = Box<dyn Fn(LeafId, &ViewContext<'_>) -> View + Send + Sync>;

/// Per-type view behaviour.
#[derive(Clone, Copy)]
pub struct ViewBehavior {
    /// Title shown on the leaf's tab
    pub display_text: fn(&ViewContext<'_>) -> String,
    /// Fill an empty container
    pub render: fn(&mut Element, &ViewContext<'_>),
    /// Release anything acquired while open
    pub close: fn(&mut Element),
}

impl std::fmt::Debug for ViewBehavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewBehavior").finish_non_exhaustive()
    }
}

/// A live view bound to one leaf.
#[derive(Debug, Clone)]
pub struct View {
    view_type: String,
    leaf: LeafId,
    container: Element,
    display_text: String,
    behavior: ViewBehavior,
}

impl View {
    pub fn new(view_type: &str, leaf: LeafId, behavior: ViewBehavior) -> Self {
        Self {
            view_type: view_type.to_string(),
            leaf,
            container: Element::container(&["view-content"]),
            display_text: String::new(),
            behavior,
        }
    }

    /// Rebuild the content from scratch.
    pub fn open(&mut self, ctx: &ViewContext<'_>) {
        self.container.empty();
        (self.behavior.render)(&mut self.container, ctx);
        self.display_text = (self.behavior.display_text)(ctx);
    }

    pub fn close(&mut self) {
        (self.behavior.close)(&mut self.container);
    }

    pub fn view_type(&self) -> &str {
        &self.view_type
    }

    pub fn leaf(&self) -> LeafId {
        self.leaf
    }

    pub fn container(&self) -> &Element {
        &self.container
    }

    pub fn display_text(&self) -> &str {
        &self.display_text
    }
}
