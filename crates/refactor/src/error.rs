//! Error types for rename application.

use std::path::PathBuf;

use relabel_buffer::{EditError, LoadError, SaveError};
use thiserror::Error;

/// A tracked range could not be resolved before its edit was written.
///
/// Raised when an earlier write in the same edit set swallowed the range,
/// which happens only for overlapping edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no live range for edit {index}")]
pub struct MissingMarkerError {
	/// Position of the edit within its edit set.
	pub index: usize,
}

/// A single file's edit set failed. The file was restored before this was
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
	#[error("failed to apply edits to {}: {source}", .path.display())]
	MissingMarker {
		path: PathBuf,
		#[source]
		source: MissingMarkerError,
	},
	#[error("failed to apply edits to {}: {source}", .path.display())]
	Edit {
		path: PathBuf,
		#[source]
		source: EditError,
	},
}

impl ApplyError {
	pub fn path(&self) -> &std::path::Path {
		match self {
			Self::MissingMarker { path, .. } | Self::Edit { path, .. } => path,
		}
	}
}

/// A rename batch failed. Every file it touched was rolled back first.
#[derive(Debug, Error)]
pub enum RenameError {
	#[error(transparent)]
	Apply(#[from] ApplyError),
	#[error(transparent)]
	Load(#[from] LoadError),
	#[error(transparent)]
	Save(#[from] SaveError),
	#[error(transparent)]
	Provider(#[from] ProviderError),
}

/// Some stores could not be re-saved after reverting.
///
/// Every store was still reverted in memory.
#[derive(Debug, Error)]
#[error("failed to save {} reverted file(s)", .failures.len())]
pub struct RevertError {
	pub failures: Vec<SaveError>,
}

/// No rename provider produced a usable answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
	#[error("no rename provider for scope {0:?}")]
	NoProviders(Option<String>),
	#[error("rename rejected at this position")]
	Rejected,
}
