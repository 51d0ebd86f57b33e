//! Shared handles to buffers.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::buffer::Buffer;
use crate::error::{LoadError, SaveError};
use crate::history::Checkpoint;
use crate::io;

/// Counter for generating unique buffer IDs.
static NEXT_BUFFER_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a buffer, stable for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u64);

impl BufferId {
	/// Generates a new unique buffer ID.
	pub fn next() -> Self {
		Self(NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed))
	}
}

/// Reference-counted handle to a [`Buffer`].
///
/// Access goes through [`with`](Self::with) and [`with_mut`](Self::with_mut)
/// closures so the lock can never be held across an await point.
#[derive(Clone)]
pub struct SharedBuffer {
	id: BufferId,
	inner: Arc<Mutex<Buffer>>,
}

impl fmt::Debug for SharedBuffer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SharedBuffer").field("id", &self.id).finish_non_exhaustive()
	}
}

impl SharedBuffer {
	pub fn new(buffer: Buffer) -> Self {
		Self {
			id: buffer.id(),
			inner: Arc::new(Mutex::new(buffer)),
		}
	}

	/// Creates a clean buffer from in-memory text.
	pub fn from_text(text: &str, path: Option<PathBuf>) -> Self {
		Self::new(Buffer::new(text, path))
	}

	/// Reads `path` into a fresh, clean buffer.
	pub async fn load(path: impl Into<PathBuf>) -> Result<Self, LoadError> {
		let path = path.into();
		let text = io::read_text(&path).await?;
		tracing::debug!(path = %path.display(), "buffer loaded");
		Ok(Self::from_text(&text, Some(path)))
	}

	pub fn id(&self) -> BufferId {
		self.id
	}

	pub fn with<R>(&self, f: impl FnOnce(&Buffer) -> R) -> R {
		f(&self.inner.lock())
	}

	pub fn with_mut<R>(&self, f: impl FnOnce(&mut Buffer) -> R) -> R {
		f(&mut self.inner.lock())
	}

	pub fn path(&self) -> Option<PathBuf> {
		self.with(|b| b.path().map(Path::to_path_buf))
	}

	pub fn text(&self) -> String {
		self.with(Buffer::text)
	}

	pub fn is_modified(&self) -> bool {
		self.with(Buffer::is_modified)
	}

	pub fn is_destroyed(&self) -> bool {
		self.with(Buffer::is_destroyed)
	}

	pub fn create_checkpoint(&self) -> Checkpoint {
		self.with_mut(Buffer::create_checkpoint)
	}

	pub fn revert_to_checkpoint(&self, checkpoint: Checkpoint) -> bool {
		self.with_mut(|b| b.revert_to_checkpoint(checkpoint))
	}

	pub fn group_changes_since_checkpoint(&self, checkpoint: Checkpoint) -> bool {
		self.with_mut(|b| b.group_changes_since_checkpoint(checkpoint))
	}

	pub fn destroy(&self) {
		self.with_mut(Buffer::destroy);
	}

	/// Writes the current content to the buffer's path.
	///
	/// The content is snapshotted before the write starts; edits made while
	/// the write is in flight leave the buffer modified afterwards.
	pub async fn save(&self) -> Result<(), SaveError> {
		let (path, snapshot) = self.with(|b| {
			if b.is_destroyed() {
				return Err(SaveError::Destroyed);
			}
			let path = b.path().ok_or(SaveError::NoPath)?.to_path_buf();
			Ok((path, b.content().clone()))
		})?;

		let bytes = io::serialize_rope(&snapshot);
		if let Err(source) = io::write_atomic_async(path.clone(), bytes).await {
			tracing::error!(path = %path.display(), error = %source, "failed to save buffer");
			return Err(SaveError::Io { path, source });
		}

		self.with_mut(|b| b.mark_saved(snapshot));
		tracing::debug!(path = %path.display(), "buffer saved");
		Ok(())
	}

	pub fn downgrade(&self) -> WeakBuffer {
		WeakBuffer {
			id: self.id,
			inner: Arc::downgrade(&self.inner),
		}
	}

	/// Returns true if both handles point at the same buffer.
	pub fn ptr_eq(&self, other: &SharedBuffer) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}
}

/// Non-owning handle to a [`SharedBuffer`].
#[derive(Clone)]
pub struct WeakBuffer {
	id: BufferId,
	inner: Weak<Mutex<Buffer>>,
}

impl fmt::Debug for WeakBuffer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WeakBuffer").field("id", &self.id).finish_non_exhaustive()
	}
}

impl WeakBuffer {
	pub fn id(&self) -> BufferId {
		self.id
	}

	pub fn upgrade(&self) -> Option<SharedBuffer> {
		self.inner.upgrade().map(|inner| SharedBuffer { id: self.id, inner })
	}

	/// Returns true once every strong handle is gone or the buffer was
	/// destroyed.
	pub fn is_released(&self) -> bool {
		self.upgrade().is_none_or(|b| b.is_destroyed())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn save_writes_content_and_clears_modified() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("a.js");
		std::fs::write(&path, "let a;").unwrap();

		let buffer = SharedBuffer::load(&path).await.unwrap();
		buffer.with_mut(|b| b.set_text_in_range(4..5, "b")).unwrap();
		assert!(buffer.is_modified());

		buffer.save().await.unwrap();
		assert!(!buffer.is_modified());
		assert_eq!(std::fs::read_to_string(&path).unwrap(), "let b;");
	}

	#[tokio::test]
	async fn save_without_path_fails() {
		let buffer = SharedBuffer::from_text("x", None);
		assert!(matches!(buffer.save().await, Err(SaveError::NoPath)));
	}

	#[tokio::test]
	async fn failed_save_leaves_buffer_modified() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("missing").join("a.js");
		let buffer = SharedBuffer::from_text("x", Some(path.clone()));
		buffer.with_mut(|b| b.set_text_in_range(0..1, "y")).unwrap();

		let err = buffer.save().await.unwrap_err();
		assert_eq!(err.path(), Some(path.as_path()));
		assert!(buffer.is_modified());
	}

	#[test]
	fn weak_handles_report_release() {
		let buffer = SharedBuffer::from_text("x", None);
		let weak = buffer.downgrade();
		assert!(!weak.is_released());
		assert!(weak.upgrade().is_some_and(|b| b.ptr_eq(&buffer)));

		buffer.destroy();
		assert!(weak.is_released());
		drop(buffer);
		assert!(weak.upgrade().is_none());
	}
}
