use serde::{Deserialize, Serialize};

/// A position in the text, measured in characters (not bytes).
pub type CharIdx = usize;

/// A length or count in the text, measured in characters (not bytes).
///
/// This is distinct from CharIdx to avoid accidentally passing an index
/// where a length is expected or vice versa.
pub type CharLen = usize;

/// A row/column position. Columns count Unicode scalar values.
///
/// Serializes as a `[row, column]` pair, which is the shape rename providers
/// emit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Point {
	/// Zero-based line index.
	pub row: usize,
	/// Zero-based character offset within the line.
	pub column: usize,
}

impl Point {
	pub const fn new(row: usize, column: usize) -> Self {
		Self { row, column }
	}
}

impl From<(usize, usize)> for Point {
	fn from((row, column): (usize, usize)) -> Self {
		Self { row, column }
	}
}

impl From<Point> for (usize, usize) {
	fn from(point: Point) -> Self {
		(point.row, point.column)
	}
}

/// A half-open `[start, end)` range between two points.
///
/// Construction normalizes the endpoints so `start <= end` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(Point, Point)", into = "(Point, Point)")]
pub struct TextRange {
	pub start: Point,
	pub end: Point,
}

impl TextRange {
	/// Creates a range, swapping the endpoints if they arrive reversed.
	pub fn new(a: impl Into<Point>, b: impl Into<Point>) -> Self {
		let (a, b) = (a.into(), b.into());
		if b < a { Self { start: b, end: a } } else { Self { start: a, end: b } }
	}

	/// Creates an empty range at `point`.
	pub fn point(point: impl Into<Point>) -> Self {
		let point = point.into();
		Self { start: point, end: point }
	}

	/// Returns true if the range covers no text.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}

	/// Returns true if both endpoints lie on the same row.
	#[inline]
	pub fn is_single_line(&self) -> bool {
		self.start.row == self.end.row
	}
}

impl From<(Point, Point)> for TextRange {
	fn from((start, end): (Point, Point)) -> Self {
		Self::new(start, end)
	}
}

impl From<TextRange> for (Point, Point) {
	fn from(range: TextRange) -> Self {
		(range.start, range.end)
	}
}
