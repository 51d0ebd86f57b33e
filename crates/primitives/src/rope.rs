//! Conversions between row/column points and character offsets.
//!
//! Points that fall outside the text are clipped rather than rejected: a row
//! past the last line lands at the end of the document and a column past the
//! end of its line lands before that line's terminator.

use std::ops::Range;

use ropey::RopeSlice;

use crate::range::{CharIdx, CharLen, Point, TextRange};

/// Returns the number of characters on `row`, excluding its line terminator.
///
/// Recognizes the same terminators ropey counts as line breaks, treating
/// `\r\n` as a single terminator.
pub fn line_content_len(text: RopeSlice, row: usize) -> CharLen {
	let line = text.line(row);
	let len = line.len_chars();
	if len == 0 {
		return 0;
	}
	match line.char(len - 1) {
		'\n' if len >= 2 && line.char(len - 2) == '\r' => len - 2,
		'\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}' => len - 1,
		_ => len,
	}
}

/// Clamps `point` to the nearest position that exists in `text`.
pub fn clip_point(text: RopeSlice, point: Point) -> Point {
	let last_row = text.len_lines().saturating_sub(1);
	if point.row > last_row {
		return Point::new(last_row, line_content_len(text, last_row));
	}
	Point::new(point.row, point.column.min(line_content_len(text, point.row)))
}

/// Converts a point to a character offset, clipping it first.
pub fn point_to_char(text: RopeSlice, point: Point) -> CharIdx {
	let point = clip_point(text, point);
	text.line_to_char(point.row) + point.column
}

/// Converts a point range to a character range.
pub fn range_to_chars(text: RopeSlice, range: TextRange) -> Range<CharIdx> {
	point_to_char(text, range.start)..point_to_char(text, range.end)
}
