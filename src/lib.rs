//! Habitude - habit tracking panel for workspace hosts.
//!
//! Habitude runs inside a host application's workspace. It keeps a small
//! settings object persisted by the host and presents a single home panel
//! that is created on first use and refocused afterwards.
//!
//! # Architecture
//!
//! - [`extension`] - Lifecycle: load settings, register tab and views, unload
//! - [`settings`] - Settings model, load/merge/save and the settings tab
//! - [`views`] - View registry, singleton activation and the home view
//! - [`components`] - Element tree and composition helpers for panels
//! - [`host`] - Traits the host implements, plus in-memory and file backends
//! - [`manifest`] - `habitude.toml` parsing
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use habitude::{Habitude, host::MemoryHost};
//!
//! let host = Arc::new(MemoryHost::new());
//! let mut extension = Habitude::new(host)?;
//! extension.load().await?;
//! let leaf = extension.open_home().await?;
//! extension.unload().await?;
//! ```

pub mod components;
pub mod extension;
pub mod host;
pub mod logging;
pub mod manifest;
pub mod settings;
pub mod views;

mod error;

pub use error::{HabitudeError, HabitudeResult, HostError, HostResult};
pub use extension::{Habitude, LifecycleState};
pub use manifest::ExtensionManifest;
pub use settings::Settings;
