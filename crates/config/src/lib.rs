//! Settings for the rename engine.
//!
//! Settings are written in TOML. Top-level keys set the defaults, and a
//! `[scopes."<grammar scope>"]` table overrides them for files of that
//! grammar:
//!
//! ```toml
//! save_after_edit_in_open_buffers = false
//! offer_undo_notification = true
//! enable_debug_logging = false
//!
//! [scopes."source.js"]
//! save_after_edit_in_open_buffers = true
//! ```
//!
//! Unknown keys are rejected so typos surface at load time.

pub mod error;
mod settings;


pub use error::{ConfigError, Result};
pub use settings::{ScopedSettings, Settings};
