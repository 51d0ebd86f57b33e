//! Core types for rename edits: points, ranges, splices, and edit sets.

/// Proposed text edits grouped per file.
pub mod edit;
/// Row/column points and half-open ranges between them.
pub mod range;
/// Conversions between points and character offsets in a rope.
pub mod rope;
/// Position mapping through a single text replacement.
pub mod splice;

pub use edit::{Edit, EditSet, EditsByPath, count_edits};
pub use range::{CharIdx, CharLen, Point, TextRange};
pub use rope::{clip_point, line_content_len, point_to_char, range_to_chars};
pub use ropey::{Rope, RopeSlice};
pub use splice::{Bias, Splice};
