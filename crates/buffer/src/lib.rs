//! Text stores for the rename engine.
//!
//! A [`Buffer`] is a rope with checkpointed history and marker layers. It is
//! shared through [`SharedBuffer`] handles, which come in two flavors of
//! ownership:
//!
//! - bound to a [`TextEditor`] that lives in the workspace and outlives any
//!   single rename job
//! - headless, loaded from disk for one job and destroyed when that job's
//!   ledger is disposed

mod buffer;
pub mod editor;
pub mod error;
pub mod history;
pub mod io;
pub mod marker;
pub mod shared;

pub use buffer::Buffer;
pub use editor::{TextEditor, ViewId};
pub use error::{EditError, LoadError, SaveError};
pub use history::Checkpoint;
pub use marker::{LayerId, MarkerId};
pub use shared::{BufferId, SharedBuffer, WeakBuffer};
