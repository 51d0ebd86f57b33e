//! Transactional multi-file rename application.
//!
//! A rename job maps file paths to edit sets computed by a
//! [`RenameProvider`]. [`ApplyEdits::execute`] writes the job across open
//! editors and unopened files and returns a [`RenameResponse`], the ledger
//! that can undo the whole job or release the buffers it loaded. A batch
//! either lands everywhere or is rolled back everywhere.

mod apply;
pub mod apply_edits;
pub mod error;
pub mod loader;
pub mod provider;
pub mod response;
pub mod summary;
pub mod tracker;
pub mod workspace;

pub use apply::apply_edit_set;
pub use apply_edits::ApplyEdits;
pub use error::{ApplyError, MissingMarkerError, ProviderError, RenameError, RevertError};
pub use loader::{BufferLoader, FsLoader};
pub use provider::{PrepareRename, ProviderRegistry, RenameOutcome, RenameProvider, RenameSession, SharedProvider, first_valid_response};
pub use response::{RenameResponse, RenameSummary};
pub use summary::{describe_edits, describe_response, pluralize};
pub use tracker::RangeTracker;
pub use workspace::{Workspace, WorkspaceLookup};
