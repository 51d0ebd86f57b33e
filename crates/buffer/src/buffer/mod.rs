//! The rope-backed text store.


use std::ops::Range;
use std::path::{Path, PathBuf};

use relabel_primitives::{CharIdx, Rope, Splice, TextRange, range_to_chars};
use slab::Slab;

use crate::error::EditError;
use crate::history::{Checkpoint, History};
use crate::marker::{LayerId, MarkerId, MarkerLayer};
use crate::shared::BufferId;

/// A mutable text container with checkpointed history and marker layers.
///
/// # Modified state
///
/// A buffer remembers the content it last loaded or saved. It reports itself
/// modified whenever the current content differs from that snapshot, so
/// reverting to a checkpoint taken while clean makes it clean again.
///
/// # Markers and history jumps
///
/// Writes keep markers in step with the text. Reverting, undoing, or redoing
/// replaces the content wholesale; markers cannot follow that and are cleared
/// (their layers survive).
#[derive(Debug)]
pub struct Buffer {
	id: BufferId,
	content: Rope,
	path: Option<PathBuf>,
	saved: Rope,
	readonly: bool,
	destroyed: bool,
	/// Incremented on every content change.
	version: u64,
	history: History,
	layers: Slab<MarkerLayer>,
}

impl Buffer {
	/// Creates a clean buffer holding `text`.
	pub fn new(text: &str, path: Option<PathBuf>) -> Self {
		let content = Rope::from(text);
		Self {
			id: BufferId::next(),
			saved: content.clone(),
			content,
			path,
			readonly: false,
			destroyed: false,
			version: 0,
			history: History::new(),
			layers: Slab::new(),
		}
	}

	/// Creates an empty buffer with no file.
	pub fn scratch() -> Self {
		Self::new("", None)
	}

	pub fn id(&self) -> BufferId {
		self.id
	}

	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}

	pub fn set_path(&mut self, path: Option<PathBuf>) {
		self.path = path;
	}

	pub fn content(&self) -> &Rope {
		&self.content
	}

	pub fn text(&self) -> String {
		self.content.to_string()
	}

	/// Returns the text covered by a point range, clipping it to the document.
	pub fn text_in_range(&self, range: TextRange) -> String {
		let chars = range_to_chars(self.content.slice(..), range);
		self.content.slice(chars).to_string()
	}

	pub fn version(&self) -> u64 {
		self.version
	}

	pub fn history(&self) -> &History {
		&self.history
	}

	pub fn is_modified(&self) -> bool {
		self.content != self.saved
	}

	/// Records `snapshot` as the content now on disk.
	pub fn mark_saved(&mut self, snapshot: Rope) {
		self.saved = snapshot;
	}

	pub fn is_readonly(&self) -> bool {
		self.readonly
	}

	pub fn set_readonly(&mut self, readonly: bool) {
		self.readonly = readonly;
	}

	pub fn is_destroyed(&self) -> bool {
		self.destroyed
	}

	/// Releases content, history, and markers. Further writes fail.
	pub fn destroy(&mut self) {
		if self.destroyed {
			return;
		}
		self.destroyed = true;
		self.content = Rope::new();
		self.saved = Rope::new();
		self.history.clear();
		self.layers.clear();
		tracing::trace!(buffer = ?self.id, "buffer destroyed");
	}

	pub fn create_checkpoint(&mut self) -> Checkpoint {
		self.history.create_checkpoint(&self.content)
	}

	/// Restores the content captured by `checkpoint` and forgets every change
	/// since. Returns false if the checkpoint is no longer in history.
	pub fn revert_to_checkpoint(&mut self, checkpoint: Checkpoint) -> bool {
		match self.history.revert_to_checkpoint(checkpoint) {
			Some(rope) => {
				self.replace_content(rope);
				true
			}
			None => false,
		}
	}

	/// Coalesces all changes since `checkpoint` into one undo step.
	pub fn group_changes_since_checkpoint(&mut self, checkpoint: Checkpoint) -> bool {
		self.history.group_changes_since_checkpoint(checkpoint, &self.content)
	}

	pub fn undo(&mut self) -> bool {
		match self.history.undo() {
			Some(rope) => {
				self.replace_content(rope);
				true
			}
			None => false,
		}
	}

	pub fn redo(&mut self) -> bool {
		match self.history.redo() {
			Some(rope) => {
				self.replace_content(rope);
				true
			}
			None => false,
		}
	}

	/// Replaces the characters in `range` with `text`.
	///
	/// The range is clamped to the document. Every marker layer is updated and
	/// the write is recorded as one undo step.
	///
	/// # Errors
	///
	/// Returns [`EditError`] if the buffer is read-only or destroyed.
	pub fn set_text_in_range(&mut self, range: Range<CharIdx>, text: &str) -> Result<(), EditError> {
		if self.destroyed {
			return Err(EditError::Destroyed);
		}
		if self.readonly {
			return Err(EditError::ReadOnly);
		}

		let len = self.content.len_chars();
		let start = range.start.min(len);
		let end = range.end.clamp(start, len);

		let before = self.content.clone();
		self.content.remove(start..end);
		self.content.insert(start, text);

		let splice = Splice::new(start, end, text.chars().count());
		for (_, layer) in self.layers.iter_mut() {
			let lost = layer.apply_splice(&splice);
			if lost > 0 {
				tracing::trace!(buffer = ?self.id, lost, "markers invalidated by write");
			}
		}

		self.history.record_change(before, self.content.clone());
		self.version = self.version.wrapping_add(1);
		Ok(())
	}

	/// Point-range flavor of [`Self::set_text_in_range`].
	pub fn set_text_in_point_range(&mut self, range: TextRange, text: &str) -> Result<(), EditError> {
		let chars = range_to_chars(self.content.slice(..), range);
		self.set_text_in_range(chars, text)
	}

	/// Creates a new, empty marker layer.
	pub fn add_marker_layer(&mut self) -> LayerId {
		LayerId(self.layers.insert(MarkerLayer::new()))
	}

	pub fn has_marker_layer(&self, layer: LayerId) -> bool {
		self.layers.contains(layer.0)
	}

	pub fn marker_layer(&self, layer: LayerId) -> Option<&MarkerLayer> {
		self.layers.get(layer.0)
	}

	/// Tracks a point range on `layer`. Returns `None` if the layer is gone.
	pub fn mark_range(&mut self, layer: LayerId, range: TextRange) -> Option<MarkerId> {
		let chars = range_to_chars(self.content.slice(..), range);
		self.layers.get_mut(layer.0).map(|l| l.mark(chars))
	}

	/// Returns the live character range of a marker.
	pub fn marker_range(&self, layer: LayerId, marker: MarkerId) -> Option<Range<CharIdx>> {
		self.layers.get(layer.0)?.range(marker)
	}

	pub fn destroy_marker(&mut self, layer: LayerId, marker: MarkerId) -> bool {
		self.layers.get_mut(layer.0).is_some_and(|l| l.destroy(marker))
	}

	fn replace_content(&mut self, rope: Rope) {
		self.content = rope;
		self.version = self.version.wrapping_add(1);
		for (_, layer) in self.layers.iter_mut() {
			layer.clear();
		}
	}
}
