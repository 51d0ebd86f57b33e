use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::range::TextRange;

/// A single range replacement proposed by a rename provider.
///
/// `old_range` is expressed against the text as it was before any edit of the
/// same batch was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
	pub old_range: TextRange,
	pub new_text: String,
}

impl Edit {
	pub fn new(old_range: TextRange, new_text: impl Into<String>) -> Self {
		Self {
			old_range,
			new_text: new_text.into(),
		}
	}
}

/// Ordered edits for one file.
pub type EditSet = Vec<Edit>;

/// A complete rename job: absolute file path to that file's edits.
///
/// Insertion order is preserved so application and reporting are
/// deterministic.
pub type EditsByPath = IndexMap<PathBuf, EditSet>;

/// Returns `(edit_count, file_count)` for a rename job.
pub fn count_edits(edits: &EditsByPath) -> (usize, usize) {
	let instances = edits.values().map(Vec::len).sum();
	(instances, edits.len())
}
