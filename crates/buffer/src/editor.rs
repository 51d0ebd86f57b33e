//! Interactive views onto buffers.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{LoadError, SaveError};
use crate::shared::SharedBuffer;

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an editor view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

impl ViewId {
	pub fn next() -> Self {
		Self(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed))
	}
}

/// A buffer shown in the workspace.
///
/// Cloning yields another handle to the same view. The workspace owns the
/// view; rename jobs only borrow it for the duration of an edit.
#[derive(Debug, Clone)]
pub struct TextEditor {
	id: ViewId,
	buffer: SharedBuffer,
	grammar_scope: Option<String>,
}

impl TextEditor {
	pub fn new(buffer: SharedBuffer) -> Self {
		Self {
			id: ViewId::next(),
			buffer,
			grammar_scope: None,
		}
	}

	/// Opens `path` from disk in a new view.
	pub async fn open(path: impl Into<PathBuf>) -> Result<Self, LoadError> {
		SharedBuffer::load(path).await.map(Self::new)
	}

	/// Sets the grammar scope name, e.g. `source.js`.
	pub fn with_grammar_scope(mut self, scope: impl Into<String>) -> Self {
		self.grammar_scope = Some(scope.into());
		self
	}

	pub fn id(&self) -> ViewId {
		self.id
	}

	pub fn buffer(&self) -> &SharedBuffer {
		&self.buffer
	}

	pub fn grammar_scope(&self) -> Option<&str> {
		self.grammar_scope.as_deref()
	}

	pub fn path(&self) -> Option<PathBuf> {
		self.buffer.path()
	}

	pub fn text(&self) -> String {
		self.buffer.text()
	}

	/// Returns true if the buffer has unsaved changes.
	pub fn is_modified(&self) -> bool {
		self.buffer.is_modified()
	}

	pub async fn save(&self) -> Result<(), SaveError> {
		self.buffer.save().await
	}
}
