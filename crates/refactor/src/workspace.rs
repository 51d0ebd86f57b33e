//! Lookup of open editors by path.

use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use relabel_buffer::TextEditor;

/// Read access to the views a workspace currently shows.
pub trait WorkspaceLookup: Send + Sync {
	/// Returns the editor showing `path`, if any.
	fn editor_for_path(&self, path: &Path) -> Option<TextEditor>;

	/// Renders `path` relative to the project root that contains it.
	fn relativize_path(&self, path: &Path) -> PathBuf {
		path.to_path_buf()
	}
}

/// In-memory workspace: a set of project roots plus the open editors.
#[derive(Debug, Default)]
pub struct Workspace {
	roots: Vec<PathBuf>,
	editors: RwLock<Vec<TextEditor>>,
}

impl Workspace {
	pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
		Self {
			roots: roots.into_iter().collect(),
			editors: RwLock::new(Vec::new()),
		}
	}

	/// Adds an editor to the workspace.
	pub fn open(&self, editor: TextEditor) {
		self.editors.write().push(editor);
	}

	/// Removes the editor with `path`, returning it.
	pub fn close(&self, path: &Path) -> Option<TextEditor> {
		let mut editors = self.editors.write();
		let index = editors.iter().position(|e| e.path().as_deref() == Some(path))?;
		Some(editors.remove(index))
	}
}

impl WorkspaceLookup for Workspace {
	fn editor_for_path(&self, path: &Path) -> Option<TextEditor> {
		self.editors
			.read()
			.iter()
			.find(|e| e.path().as_deref() == Some(path))
			.cloned()
	}

	fn relativize_path(&self, path: &Path) -> PathBuf {
		self.roots
			.iter()
			.filter_map(|root| path.strip_prefix(root).ok())
			.min_by_key(|rel| rel.components().count())
			.map_or_else(|| path.to_path_buf(), Path::to_path_buf)
	}
}
