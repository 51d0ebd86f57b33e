//! Marker layers: ranges that follow the text as it is edited.
//!
//! Every write to a buffer is reported to each of its layers as a
//! [`Splice`]. Marker starts map with [`Bias::Right`] and ends with
//! [`Bias::Left`], so a marker never grows to swallow text inserted at its
//! edges. A marker whose endpoint falls strictly inside replaced text is
//! invalidated and removed from its layer.

use std::ops::Range;

use relabel_primitives::{Bias, CharIdx, Splice};
use slab::Slab;

/// Identifies a marker layer within one buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub usize);

/// Identifies a marker within one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(pub usize);

/// A set of tracked ranges belonging to one buffer.
#[derive(Debug, Default)]
pub struct MarkerLayer {
	markers: Slab<Range<CharIdx>>,
}

impl MarkerLayer {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.markers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.markers.is_empty()
	}

	/// Starts tracking `range`.
	pub fn mark(&mut self, range: Range<CharIdx>) -> MarkerId {
		MarkerId(self.markers.insert(range))
	}

	/// Returns the live range of `marker`, or `None` once it was invalidated
	/// or destroyed.
	pub fn range(&self, marker: MarkerId) -> Option<Range<CharIdx>> {
		self.markers.get(marker.0).cloned()
	}

	/// Stops tracking `marker`. Returns false if it was already gone.
	pub fn destroy(&mut self, marker: MarkerId) -> bool {
		self.markers.try_remove(marker.0).is_some()
	}

	/// Drops every marker in the layer.
	pub fn clear(&mut self) {
		self.markers.clear();
	}

	/// Moves every marker across `splice`, returning how many were invalidated.
	pub(crate) fn apply_splice(&mut self, splice: &Splice) -> usize {
		let mut lost = Vec::new();
		for (key, range) in self.markers.iter_mut() {
			let mapped = if range.is_empty() {
				splice.map_pos(range.start, Bias::Right).map(|pos| pos..pos)
			} else {
				splice
					.map_pos(range.start, Bias::Right)
					.zip(splice.map_pos(range.end, Bias::Left))
					.map(|(start, end)| start..end.max(start))
			};
			match mapped {
				Some(next) => *range = next,
				None => lost.push(key),
			}
		}
		for key in &lost {
			self.markers.remove(*key);
		}
		lost.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn markers_after_a_growing_write_shift_right() {
		let mut layer = MarkerLayer::new();
		let first = layer.mark(0..3);
		let second = layer.mark(10..13);

		assert_eq!(layer.apply_splice(&Splice::new(0, 3, 8)), 0);
		assert_eq!(layer.range(first), Some(0..8));
		assert_eq!(layer.range(second), Some(15..18));
	}

	#[test]
	fn adjacent_marker_keeps_its_own_text() {
		let mut layer = MarkerLayer::new();
		let right = layer.mark(3..6);
		layer.apply_splice(&Splice::new(0, 3, 1));
		assert_eq!(layer.range(right), Some(1..4));
	}

	#[test]
	fn empty_markers_at_an_insertion_follow_it() {
		let mut layer = MarkerLayer::new();
		let cursor = layer.mark(4..4);
		layer.apply_splice(&Splice::new(4, 4, 2));
		assert_eq!(layer.range(cursor), Some(6..6));
	}

	#[test]
	fn insertion_at_marker_edges_does_not_grow_it() {
		let mut layer = MarkerLayer::new();
		let word = layer.mark(2..5);
		layer.apply_splice(&Splice::new(5, 5, 3));
		assert_eq!(layer.range(word), Some(2..5));
		layer.apply_splice(&Splice::new(2, 2, 1));
		assert_eq!(layer.range(word), Some(3..6));
	}

	#[test]
	fn swallowed_markers_are_invalidated() {
		let mut layer = MarkerLayer::new();
		let inner = layer.mark(3..4);
		let outer = layer.mark(20..22);
		assert_eq!(layer.apply_splice(&Splice::new(0, 10, 1)), 1);
		assert_eq!(layer.range(inner), None);
		assert_eq!(layer.range(outer), Some(11..13));
	}

	#[test]
	fn destroy_is_idempotent() {
		let mut layer = MarkerLayer::new();
		let marker = layer.mark(0..1);
		assert!(layer.destroy(marker));
		assert!(!layer.destroy(marker));
		assert!(layer.is_empty());
	}
}
