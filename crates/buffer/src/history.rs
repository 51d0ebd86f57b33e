//! Checkpointed undo history.
//!
//! History stores full rope snapshots; ropes share structure, so a snapshot
//! costs little more than the nodes an edit touched. Checkpoints are barriers
//! in the undo stack that remember the content at the moment they were
//! created, which lets a caller throw away everything written after them or
//! collapse it into one undo step.
//!
//! A checkpoint is open from its creation until it is grouped or reverted.
//! While any checkpoint is open the undo stack is allowed to grow past
//! [`MAX_UNDO`], so reverting always restores the exact stack it was created
//! on. Trimming catches up when the checkpoint is grouped.

use std::sync::atomic::{AtomicU64, Ordering};

use relabel_primitives::Rope;

/// Maximum number of undo entries kept per buffer.
pub const MAX_UNDO: usize = 100;

static NEXT_CHECKPOINT: AtomicU64 = AtomicU64::new(1);

/// Opaque marker of a position in a buffer's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Checkpoint(u64);

impl Checkpoint {
	fn next() -> Self {
		Self(NEXT_CHECKPOINT.fetch_add(1, Ordering::Relaxed))
	}
}

#[derive(Debug, Clone, PartialEq)]
enum HistoryEntry {
	Checkpoint {
		id: Checkpoint,
		rope: Rope,
		redo: Vec<(Rope, Rope)>,
	},
	Change { before: Rope, after: Rope },
}

/// Undo and redo stacks for one buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
	undo_stack: Vec<HistoryEntry>,
	redo_stack: Vec<(Rope, Rope)>,
	open: Vec<Checkpoint>,
}

impl History {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns whether an undoable change exists.
	pub fn can_undo(&self) -> bool {
		self.undo_stack.iter().any(|e| matches!(e, HistoryEntry::Change { .. }))
	}

	/// Returns whether redo is available.
	pub fn can_redo(&self) -> bool {
		!self.redo_stack.is_empty()
	}

	/// Returns the undo stack length, checkpoints included.
	pub fn undo_len(&self) -> usize {
		self.undo_stack.len()
	}

	/// Returns true if `checkpoint` is still present in the undo stack.
	pub fn has_checkpoint(&self, checkpoint: Checkpoint) -> bool {
		self.position_of(checkpoint).is_some()
	}

	/// Pushes a checkpoint barrier capturing `current`.
	pub fn create_checkpoint(&mut self, current: &Rope) -> Checkpoint {
		let id = Checkpoint::next();
		self.undo_stack.push(HistoryEntry::Checkpoint {
			id,
			rope: current.clone(),
			redo: self.redo_stack.clone(),
		});
		self.open.push(id);
		id
	}

	/// Returns true while some checkpoint is neither grouped nor reverted.
	pub fn has_open_checkpoint(&self) -> bool {
		self.open.iter().any(|cp| self.has_checkpoint(*cp))
	}

	/// Records a completed edit and clears the redo stack.
	///
	/// Enforces [`MAX_UNDO`] by dropping the oldest change, unless a
	/// checkpoint is open.
	pub fn record_change(&mut self, before: Rope, after: Rope) {
		self.undo_stack.push(HistoryEntry::Change { before, after });
		self.redo_stack.clear();
		if !self.has_open_checkpoint() {
			self.trim();
		}
	}

	/// Drops `checkpoint` and everything recorded after it, restoring the redo
	/// stack as it was when the checkpoint was created.
	///
	/// Returns the content to restore, or `None` if the checkpoint is no longer
	/// in history (already reverted, undone past, or trimmed).
	pub fn revert_to_checkpoint(&mut self, checkpoint: Checkpoint) -> Option<Rope> {
		let index = self.position_of(checkpoint)?;
		let HistoryEntry::Checkpoint { rope, redo, .. } = self.undo_stack.swap_remove(index) else {
			return None;
		};
		self.undo_stack.truncate(index);
		self.redo_stack = redo;
		self.close(checkpoint);
		Some(rope)
	}

	/// Collapses every change after `checkpoint` into a single undo step.
	///
	/// The checkpoint itself stays in place. Returns false if it is gone.
	pub fn group_changes_since_checkpoint(&mut self, checkpoint: Checkpoint, current: &Rope) -> bool {
		let Some(index) = self.position_of(checkpoint) else {
			return false;
		};
		let HistoryEntry::Checkpoint { rope, .. } = &self.undo_stack[index] else {
			return false;
		};
		let before = rope.clone();
		self.undo_stack.truncate(index + 1);
		if before != *current {
			self.undo_stack.push(HistoryEntry::Change {
				before,
				after: current.clone(),
			});
		}
		self.close(checkpoint);
		if !self.has_open_checkpoint() {
			self.trim();
		}
		true
	}

	/// Pops the most recent change and returns the content to restore.
	///
	/// Checkpoints sitting above that change describe a state undo is leaving
	/// and are discarded with it.
	pub fn undo(&mut self) -> Option<Rope> {
		let index = self.undo_stack.iter().rposition(|e| matches!(e, HistoryEntry::Change { .. }))?;
		let HistoryEntry::Change { before, after } = self.undo_stack.remove(index) else {
			return None;
		};
		self.undo_stack.truncate(index);
		self.redo_stack.push((before.clone(), after));
		Some(before)
	}

	/// Re-applies the last undone change and returns the content to restore.
	pub fn redo(&mut self) -> Option<Rope> {
		let (before, after) = self.redo_stack.pop()?;
		self.undo_stack.push(HistoryEntry::Change {
			before,
			after: after.clone(),
		});
		Some(after)
	}

	/// Forgets all history.
	pub fn clear(&mut self) {
		self.undo_stack.clear();
		self.redo_stack.clear();
		self.open.clear();
	}

	fn close(&mut self, checkpoint: Checkpoint) {
		self.open.retain(|cp| *cp != checkpoint);
	}

	/// Drops the oldest changes until the stack fits. Checkpoints are kept so
	/// a later revert can still find them.
	fn trim(&mut self) {
		self.open.retain(|cp| {
			self.undo_stack
				.iter()
				.any(|e| matches!(e, HistoryEntry::Checkpoint { id, .. } if id == cp))
		});
		while self.undo_stack.len() > MAX_UNDO {
			let Some(oldest) = self.undo_stack.iter().position(|e| matches!(e, HistoryEntry::Change { .. })) else {
				break;
			};
			self.undo_stack.remove(oldest);
		}
	}

	fn position_of(&self, checkpoint: Checkpoint) -> Option<usize> {
		self.undo_stack
			.iter()
			.rposition(|e| matches!(e, HistoryEntry::Checkpoint { id, .. } if *id == checkpoint))
	}
}
