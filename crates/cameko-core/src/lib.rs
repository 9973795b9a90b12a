//! cameko-core library.
//!
//! Builds the text of a live-photography post from a small form: date, title,
//! venue, group, selected members, honorific and extra hashtags.
//!
//! - [`directory`]: the group/member roster.
//! - [`state`]: the form snapshot and the pure reducer over [`state::Action`]s.
//! - [`generate`]: the deterministic text generator.
//! - [`controller`]: owns the snapshot; persists and reports after each edit.
//! - [`store`], [`analytics`], [`export`]: side-effect capabilities.
//!
//! # Conventions
//!
//! - **Errors**: library functions return [`error::CamekoError`].
//! - **Logging**: use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod analytics;
pub mod config;
pub mod controller;
pub mod date;
pub mod directory;
pub mod error;
pub mod export;
pub mod generate;
pub mod state;
pub mod store;

pub use controller::FormController;
pub use directory::Directory;
pub use generate::generate;
pub use state::{Action, Flag, FormState, TextField};
