//! Home view: the panel showing everything about the user's habits.
//!
//! Today it greets the user. The main and footer regions are laid out but
//! left empty for habit content.

use crate::components::{create_container, create_title, Element};
use crate::host::LeafId;
use crate::settings::Settings;

use super::{View, ViewBehavior, ViewContext, ViewFactory};

pub const VIEW_TYPE_HOME: &str = "habitude-view-home";

const GREETING: &str = "Hello";

/// Greeting for the header, personalised once a username is set.
pub fn greeting(settings: &Settings) -> String {
    if settings.has_username() {
        format!("{}, {}!", GREETING, settings.username())
    } else {
        format!("{}!", GREETING)
    }
}

pub fn behavior() -> ViewBehavior {
    ViewBehavior {
        display_text,
        render,
        close,
    }
}

pub fn factory() -> ViewFactory {
    Box::new(|leaf: LeafId, _ctx: &ViewContext<'_>| View::new(VIEW_TYPE_HOME, leaf, behavior()))
}

fn display_text(_ctx: &ViewContext<'_>) -> String {
    String::new()
}

fn render(container: &mut Element, ctx: &ViewContext<'_>) {
    let header = create_container(container, &["habitude-header"]);
    create_title(header, 2, &greeting(ctx.settings), &["habitude-greeting"]);

    create_container(container, &["habitude-main"]);
    create_container(container, &["habitude-footer"]);
}

fn close(_container: &mut Element) {}
