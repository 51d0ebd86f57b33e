//! Loading of files that no editor shows.

use std::path::Path;

use async_trait::async_trait;
use relabel_buffer::{LoadError, SharedBuffer};

/// Source of headless buffers.
#[async_trait]
pub trait BufferLoader: Send + Sync {
	/// Loads `path` into a fresh buffer owned by the caller.
	async fn load(&self, path: &Path) -> Result<SharedBuffer, LoadError>;
}

/// Loads buffers straight from the filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLoader;

#[async_trait]
impl BufferLoader for FsLoader {
	async fn load(&self, path: &Path) -> Result<SharedBuffer, LoadError> {
		SharedBuffer::load(path).await
	}
}
