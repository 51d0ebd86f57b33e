use crate::range::{CharIdx, CharLen};

/// Bias determines how positions at replacement boundaries are mapped.
///
/// When mapping a position through a replacement, bias determines whether a
/// position sitting exactly on a pure insertion moves with it or stays before
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
	/// Position stays before insertions at the same location.
	Left,
	/// Position moves after insertions at the same location.
	Right,
}

/// A single replacement of `[start, old_end)` with `new_len` characters.
///
/// Used to carry positions captured before a write over to the text that
/// exists after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Splice {
	/// First replaced character.
	pub start: CharIdx,
	/// End of the replaced span (exclusive) in pre-write coordinates.
	pub old_end: CharIdx,
	/// Character length of the inserted text.
	pub new_len: CharLen,
}

impl Splice {
	pub fn new(start: CharIdx, old_end: CharIdx, new_len: CharLen) -> Self {
		debug_assert!(start <= old_end);
		Self { start, old_end, new_len }
	}

	/// End of the inserted text in post-write coordinates.
	#[inline]
	pub fn new_end(&self) -> CharIdx {
		self.start + self.new_len
	}

	/// Returns true if nothing was removed.
	#[inline]
	pub fn is_insertion(&self) -> bool {
		self.start == self.old_end
	}

	/// Maps a pre-write position to its post-write location.
	///
	/// Positions on the boundaries of a non-empty replaced span stick to the
	/// outside of the replacement. Returns `None` for positions strictly inside
	/// the replaced span, since the text they pointed into no longer exists.
	pub fn map_pos(&self, pos: CharIdx, bias: Bias) -> Option<CharIdx> {
		if pos < self.start {
			return Some(pos);
		}
		if pos > self.old_end {
			return Some(pos - (self.old_end - self.start) + self.new_len);
		}
		if self.is_insertion() {
			return Some(match bias {
				Bias::Left => self.start,
				Bias::Right => self.new_end(),
			});
		}
		if pos == self.start {
			Some(self.start)
		} else if pos == self.old_end {
			Some(self.new_end())
		} else {
			None
		}
	}
}
