//! The undo and cleanup ledger of one rename job.

use std::path::PathBuf;
use std::sync::Arc;

use futures::future::join_all;
use indexmap::IndexMap;
use relabel_buffer::{BufferId, Checkpoint, SharedBuffer, TextEditor};
use serde::Serialize;

use crate::error::RevertError;
use crate::workspace::WorkspaceLookup;

#[derive(Debug)]
struct EditorEntry {
	editor: TextEditor,
	checkpoint: Checkpoint,
	saved: bool,
}

#[derive(Debug)]
struct BufferEntry {
	buffer: SharedBuffer,
	checkpoint: Checkpoint,
}

/// Files touched by a rename, relative to their project roots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameSummary {
	/// Files that are open in an editor.
	pub editor_files: Vec<PathBuf>,
	/// Files that were edited on disk without being opened.
	pub buffer_files: Vec<PathBuf>,
	/// Open files left with unsaved changes.
	pub unsaved_editors: usize,
}

/// Record of every store a rename job edited and how to undo it.
///
/// Editors stay owned by the workspace; the ledger only keeps a handle.
/// Headless buffers are owned by the ledger and destroyed by
/// [`dispose`](Self::dispose), which also runs on drop.
pub struct RenameResponse {
	workspace: Arc<dyn WorkspaceLookup>,
	editors: IndexMap<BufferId, EditorEntry>,
	buffers: IndexMap<BufferId, BufferEntry>,
	disposed: bool,
}

impl std::fmt::Debug for RenameResponse {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RenameResponse")
			.field("editors", &self.editors)
			.field("buffers", &self.buffers)
			.field("disposed", &self.disposed)
			.finish_non_exhaustive()
	}
}

impl RenameResponse {
	pub fn new(workspace: Arc<dyn WorkspaceLookup>) -> Self {
		Self {
			workspace,
			editors: IndexMap::new(),
			buffers: IndexMap::new(),
			disposed: false,
		}
	}

	/// Records an edited editor. Re-recording the same store replaces its entry.
	pub fn record_editor(&mut self, editor: TextEditor, checkpoint: Checkpoint, saved: bool) {
		let id = editor.buffer().id();
		tracing::debug!(path = ?editor.path(), saved, "recorded editor");
		self.editors.insert(id, EditorEntry { editor, checkpoint, saved });
	}

	/// Records an edited headless buffer, taking ownership of it.
	pub fn record_buffer(&mut self, buffer: SharedBuffer, checkpoint: Checkpoint) {
		tracing::debug!(path = ?buffer.path(), "recorded buffer");
		self.buffers.insert(buffer.id(), BufferEntry { buffer, checkpoint });
	}

	/// Number of recorded editors that were not saved after editing.
	pub fn unsaved_editors(&self) -> usize {
		self.editors.values().filter(|e| !e.saved).count()
	}

	pub fn is_empty(&self) -> bool {
		self.editors.is_empty() && self.buffers.is_empty()
	}

	/// Returns the headless buffers this ledger owns.
	pub fn buffers(&self) -> impl Iterator<Item = &SharedBuffer> {
		self.buffers.values().map(|e| &e.buffer)
	}

	pub fn editors(&self) -> impl Iterator<Item = &TextEditor> {
		self.editors.values().map(|e| &e.editor)
	}

	pub fn is_disposed(&self) -> bool {
		self.disposed
	}

	/// Lists the touched files in recording order.
	pub fn describe(&self) -> RenameSummary {
		let relative = |path: Option<PathBuf>| path.map(|p| self.workspace.relativize_path(&p));
		RenameSummary {
			editor_files: self.editors.values().filter_map(|e| relative(e.editor.path())).collect(),
			buffer_files: self.buffers.values().filter_map(|e| relative(e.buffer.path())).collect(),
			unsaved_editors: self.unsaved_editors(),
		}
	}

	/// Undoes every recorded store.
	///
	/// Each store is reverted to its checkpoint. Editors that were saved by the
	/// job and all headless buffers are then saved again so the files on disk
	/// match. Stores whose checkpoint is already gone (a second revert) are
	/// left alone.
	///
	/// # Errors
	///
	/// Returns [`RevertError`] listing the saves that failed. Every store is
	/// still reverted in memory.
	pub async fn revert(&self) -> Result<(), RevertError> {
		let mut to_save = Vec::new();
		for entry in self.editors.values() {
			let reverted = entry.editor.buffer().revert_to_checkpoint(entry.checkpoint);
			tracing::debug!(path = ?entry.editor.path(), reverted, "reverted editor");
			if reverted && entry.saved {
				to_save.push(entry.editor.buffer().clone());
			}
		}
		for entry in self.buffers.values() {
			let reverted = entry.buffer.revert_to_checkpoint(entry.checkpoint);
			tracing::debug!(path = ?entry.buffer.path(), reverted, "reverted buffer");
			if reverted {
				to_save.push(entry.buffer.clone());
			}
		}

		let failures: Vec<_> = join_all(to_save.iter().map(|buffer| buffer.save()))
			.await
			.into_iter()
			.filter_map(Result::err)
			.collect();
		if failures.is_empty() {
			Ok(())
		} else {
			for failure in &failures {
				tracing::warn!(error = %failure, "failed to save reverted file");
			}
			Err(RevertError { failures })
		}
	}

	/// Destroys the headless buffers and forgets every entry.
	///
	/// Safe to call more than once.
	pub fn dispose(&mut self) {
		for (_, entry) in self.buffers.drain(..) {
			entry.buffer.destroy();
		}
		self.editors.clear();
		if !self.disposed {
			tracing::trace!("rename response disposed");
		}
		self.disposed = true;
	}
}

impl Drop for RenameResponse {
	fn drop(&mut self) {
		self.dispose();
	}
}

#[cfg(test)]
mod tests;
