//! Error types for buffer writes and persistence.

use std::path::PathBuf;

use thiserror::Error;

/// A write was refused by the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
	/// The buffer does not accept modifications.
	#[error("buffer is read-only")]
	ReadOnly,
	/// The buffer was destroyed and holds no content.
	#[error("buffer was destroyed")]
	Destroyed,
}

/// A file could not be read into a buffer.
#[derive(Debug, Error)]
#[error("failed to load {}: {source}", .path.display())]
pub struct LoadError {
	/// Path that was being loaded.
	pub path: PathBuf,
	/// The underlying I/O error.
	#[source]
	pub source: std::io::Error,
}

/// A buffer could not be written to disk.
#[derive(Debug, Error)]
pub enum SaveError {
	/// The buffer has no associated file.
	#[error("buffer has no path")]
	NoPath,
	/// The buffer was destroyed before it could be saved.
	#[error("buffer was destroyed")]
	Destroyed,
	/// Writing the file failed.
	#[error("failed to write {}: {source}", .path.display())]
	Io {
		/// Destination path.
		path: PathBuf,
		/// The underlying I/O error.
		#[source]
		source: std::io::Error,
	},
}

impl SaveError {
	/// Returns the destination path, when the failure got that far.
	pub fn path(&self) -> Option<&std::path::Path> {
		match self {
			Self::Io { path, .. } => Some(path),
			Self::NoPath | Self::Destroyed => None,
		}
	}
}
