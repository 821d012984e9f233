//! Script composition — export command building, phase ordering, atomic
//! script writes, and the preference synchronizer that keeps provider
//! configuration and the form selection set in step across sessions.

pub mod composer;
pub mod controller;
pub mod error;
pub mod export;

#[cfg(test)]
pub(crate) mod fakes;

pub use composer::{compose, script_file_name, write_script};
pub use controller::{AutomationController, RefreshEvent, RefreshListener};
pub use error::ComposeError;
pub use export::{export_command, AutomationConfig, DEFAULT_EXPORT_DIR};
