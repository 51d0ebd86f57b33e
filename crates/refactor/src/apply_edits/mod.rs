//! Multi-file rename application.
//!
//! [`ApplyEdits::execute`] splits a rename job into files that are open in an
//! editor and files that are not. Open files are edited in place, one at a
//! time, before anything is awaited. Other files are loaded headlessly,
//! edited, and saved concurrently. Every store that was edited is recorded in
//! the returned [`RenameResponse`].
//!
//! A batch is all or nothing: if any file fails, every file already edited is
//! reverted (and re-saved where the job had saved it), the headless buffers
//! are destroyed, and the first failure in path order is returned.

use std::path::Path;
use std::sync::Arc;

use futures::future::join_all;
use parking_lot::Mutex;
use relabel_buffer::{Checkpoint, SharedBuffer, TextEditor};
use relabel_config::Settings;
use relabel_primitives::{Edit, EditsByPath};

use crate::apply::apply_edit_set;
use crate::error::{ApplyError, RenameError};
use crate::loader::{BufferLoader, FsLoader};
use crate::response::RenameResponse;
use crate::tracker::RangeTracker;
use crate::workspace::WorkspaceLookup;

/// Long-lived context for applying rename jobs to a workspace.
///
/// Owns the range tracking layers, which are reused across jobs on the same
/// buffer and pruned once their buffers are gone.
pub struct ApplyEdits {
	workspace: Arc<dyn WorkspaceLookup>,
	loader: Arc<dyn BufferLoader>,
	settings: Arc<Settings>,
	tracker: Mutex<RangeTracker>,
}

impl ApplyEdits {
	/// Creates a context that loads unopened files from disk.
	pub fn new(workspace: Arc<dyn WorkspaceLookup>, settings: Arc<Settings>) -> Self {
		Self {
			workspace,
			loader: Arc::new(FsLoader),
			settings,
			tracker: Mutex::new(RangeTracker::new()),
		}
	}

	/// Replaces the loader used for unopened files.
	pub fn with_loader(mut self, loader: Arc<dyn BufferLoader>) -> Self {
		self.loader = loader;
		self
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	/// Number of buffers that currently have a tracking layer.
	pub fn tracked_buffers(&self) -> usize {
		self.tracker.lock().len()
	}

	/// Applies one file's edits to a buffer shown in an editor.
	pub fn apply_edits_to_open_editor(&self, editor: &TextEditor, edits: &[Edit]) -> Result<Checkpoint, ApplyError> {
		apply_edit_set(&mut self.tracker.lock(), editor.buffer(), edits)
	}

	/// Applies one file's edits to a headless buffer.
	pub fn apply_edits_to_unopen_buffer(&self, buffer: &SharedBuffer, edits: &[Edit]) -> Result<Checkpoint, ApplyError> {
		apply_edit_set(&mut self.tracker.lock(), buffer, edits)
	}

	/// Applies a rename job across the workspace.
	///
	/// Open files that had no unsaved changes are saved afterwards when
	/// `save_after_edit_in_open_buffers` is enabled for their grammar scope.
	/// Paths with no edits are skipped.
	///
	/// # Errors
	///
	/// Returns the first failure in path order after rolling back every file
	/// the job touched.
	pub async fn execute(&self, edits_by_path: &EditsByPath) -> Result<RenameResponse, RenameError> {
		let pruned = self.tracker.lock().prune();
		if pruned > 0 {
			tracing::trace!(pruned, "pruned range tracking layers");
		}

		let mut open = Vec::new();
		let mut other = Vec::new();
		for (path, edits) in edits_by_path {
			if edits.is_empty() {
				tracing::debug!(path = %path.display(), "skipping empty edit set");
				continue;
			}
			match self.workspace.editor_for_path(path) {
				Some(editor) => open.push((editor, edits)),
				None => other.push((path.as_path(), edits)),
			}
		}
		tracing::debug!(open = open.len(), other = other.len(), "classified rename targets");

		let mut response = RenameResponse::new(Arc::clone(&self.workspace));
		let mut pending_saves = Vec::new();
		for (editor, edits) in open {
			let was_modified = editor.is_modified();
			let checkpoint = match self.apply_edits_to_open_editor(&editor, edits) {
				Ok(checkpoint) => checkpoint,
				Err(err) => return Err(self.roll_back(response, err.into()).await),
			};
			let save = !was_modified && self.settings.save_after_edit_for(editor.grammar_scope());
			tracing::debug!(path = ?editor.path(), edits = edits.len(), save, "applied edits to open editor");
			// Counted as saved only once the save has landed on disk.
			response.record_editor(editor.clone(), checkpoint, false);
			if save {
				pending_saves.push((editor, checkpoint));
			}
		}

		let saves = join_all(pending_saves.iter().map(|(editor, _)| editor.save()));
		let jobs = join_all(other.iter().map(|(path, edits)| self.edit_unopened(path, edits)));
		let (saves, jobs) = futures::join!(saves, jobs);

		let mut first_error: Option<RenameError> = None;
		for ((editor, checkpoint), saved) in pending_saves.into_iter().zip(saves) {
			match saved {
				Ok(()) => response.record_editor(editor, checkpoint, true),
				Err(err) => {
					first_error.get_or_insert(err.into());
				}
			}
		}
		for job in jobs {
			match job {
				Ok((buffer, checkpoint)) => response.record_buffer(buffer, checkpoint),
				Err(err) => {
					first_error.get_or_insert(err);
				}
			}
		}

		match first_error {
			Some(err) => Err(self.roll_back(response, err).await),
			None => Ok(response),
		}
	}

	/// Loads, edits, and saves one file that no editor shows.
	///
	/// A buffer whose edits or save failed is destroyed before returning.
	async fn edit_unopened(&self, path: &Path, edits: &[Edit]) -> Result<(SharedBuffer, Checkpoint), RenameError> {
		let buffer = self.loader.load(path).await?;
		let checkpoint = match self.apply_edits_to_unopen_buffer(&buffer, edits) {
			Ok(checkpoint) => checkpoint,
			Err(err) => {
				buffer.destroy();
				return Err(err.into());
			}
		};
		if let Err(err) = buffer.save().await {
			buffer.destroy();
			return Err(err.into());
		}
		tracing::debug!(path = %path.display(), edits = edits.len(), "applied edits to unopened file");
		Ok((buffer, checkpoint))
	}

	async fn roll_back(&self, mut response: RenameResponse, err: RenameError) -> RenameError {
		tracing::error!(error = %err, "rename failed, rolling back");
		if let Err(revert) = response.revert().await {
			tracing::warn!(error = %revert, "rollback could not restore every file on disk");
		}
		response.dispose();
		self.tracker.lock().prune();
		err
	}
}
