use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Engine settings with per-grammar overrides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
	/// Save files that were open and clean before a rename touched them.
	pub save_after_edit_in_open_buffers: bool,
	/// Keep a completed rename's ledger so it can be undone. When off, the
	/// ledger is released as soon as the rename lands.
	pub offer_undo_notification: bool,
	/// Log at debug level by default.
	pub enable_debug_logging: bool,
	/// Overrides keyed by grammar scope name, e.g. `source.js`.
	pub scopes: BTreeMap<String, ScopedSettings>,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			save_after_edit_in_open_buffers: false,
			offer_undo_notification: true,
			enable_debug_logging: false,
			scopes: BTreeMap::new(),
		}
	}
}

/// Overrides for one grammar scope. Unset fields fall back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScopedSettings {
	pub save_after_edit_in_open_buffers: Option<bool>,
	pub offer_undo_notification: Option<bool>,
	pub enable_debug_logging: Option<bool>,
}

impl Settings {
	/// Parse settings from a TOML string.
	pub fn parse(input: &str) -> Result<Self> {
		Ok(toml::from_str(input)?)
	}

	/// Load settings from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::parse(&content)
	}

	pub fn save_after_edit_for(&self, scope: Option<&str>) -> bool {
		self.scoped(scope, |s| s.save_after_edit_in_open_buffers)
			.unwrap_or(self.save_after_edit_in_open_buffers)
	}

	pub fn offer_undo_notification_for(&self, scope: Option<&str>) -> bool {
		self.scoped(scope, |s| s.offer_undo_notification)
			.unwrap_or(self.offer_undo_notification)
	}

	pub fn debug_logging_for(&self, scope: Option<&str>) -> bool {
		self.scoped(scope, |s| s.enable_debug_logging)
			.unwrap_or(self.enable_debug_logging)
	}

	fn scoped(&self, scope: Option<&str>, field: impl FnOnce(&ScopedSettings) -> Option<bool>) -> Option<bool> {
		scope.and_then(|name| self.scopes.get(name)).and_then(field)
	}
}
