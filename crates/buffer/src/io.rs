//! File persistence for buffers.
//!
//! Writes go through a temporary file in the destination directory followed
//! by a rename, so a crash mid-save never leaves a truncated file behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use relabel_primitives::Rope;

use crate::error::LoadError;

/// Reads `path` as UTF-8 text.
pub async fn read_text(path: &Path) -> Result<String, LoadError> {
	tokio::fs::read_to_string(path).await.map_err(|source| LoadError {
		path: path.to_path_buf(),
		source,
	})
}

/// Flattens a rope into the bytes that go to disk.
pub fn serialize_rope(rope: &Rope) -> Vec<u8> {
	let mut bytes = Vec::with_capacity(rope.len_bytes());
	for chunk in rope.chunks() {
		bytes.extend_from_slice(chunk.as_bytes());
	}
	bytes
}

/// Atomically replaces `path` with `bytes`.
///
/// Existing file permissions are carried over to the new file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
	let dir = match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};
	let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
	tmp.write_all(bytes)?;
	tmp.as_file().sync_all()?;
	if let Ok(meta) = std::fs::metadata(path) {
		tmp.as_file().set_permissions(meta.permissions())?;
	}
	tmp.persist(path).map_err(|e| e.error)?;
	Ok(())
}

/// Runs [`write_atomic`] on the blocking pool.
pub async fn write_atomic_async(path: PathBuf, bytes: Vec<u8>) -> std::io::Result<()> {
	tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
		.await
		.map_err(|e| std::io::Error::other(e.to_string()))?
}
