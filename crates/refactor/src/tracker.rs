//! Live tracking of edit ranges across writes.
//!
//! Each buffer gets one marker layer, created on first use and reused by every
//! later job on that buffer. Markers placed on it at original coordinates are
//! moved by each write, so resolving one right before its own write yields
//! the range in current coordinates.

use std::collections::HashMap;
use std::ops::Range;

use relabel_buffer::{Buffer, BufferId, LayerId, MarkerId, SharedBuffer, WeakBuffer};
use relabel_primitives::{CharIdx, TextRange};

#[derive(Debug)]
struct TrackedLayer {
	buffer: WeakBuffer,
	layer: LayerId,
}

/// Marker layers keyed by buffer.
#[derive(Debug, Default)]
pub struct RangeTracker {
	layers: HashMap<BufferId, TrackedLayer>,
}

impl RangeTracker {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the tracking layer for `shared`, creating it if needed.
	///
	/// `buffer` must be the locked contents of `shared`.
	pub fn layer_for(&mut self, shared: &SharedBuffer, buffer: &mut Buffer) -> LayerId {
		if let Some(tracked) = self.layers.get(&shared.id())
			&& buffer.has_marker_layer(tracked.layer)
		{
			return tracked.layer;
		}
		let layer = buffer.add_marker_layer();
		tracing::trace!(buffer = ?shared.id(), ?layer, "created range tracking layer");
		self.layers.insert(
			shared.id(),
			TrackedLayer {
				buffer: shared.downgrade(),
				layer,
			},
		);
		layer
	}

	/// Places one marker per range, in order.
	///
	/// An entry is `None` when the layer has gone away, which surfaces as a
	/// missing marker when that edit is resolved.
	pub fn track(
		&self,
		buffer: &mut Buffer,
		layer: LayerId,
		ranges: impl IntoIterator<Item = TextRange>,
	) -> Vec<Option<MarkerId>> {
		ranges.into_iter().map(|range| buffer.mark_range(layer, range)).collect()
	}

	/// Current character range of a tracked marker.
	pub fn resolve(&self, buffer: &Buffer, layer: LayerId, marker: Option<MarkerId>) -> Option<Range<CharIdx>> {
		buffer.marker_range(layer, marker?)
	}

	/// Drops layers whose buffers were released or destroyed.
	pub fn prune(&mut self) -> usize {
		let before = self.layers.len();
		self.layers.retain(|_, tracked| !tracked.buffer.is_released());
		before - self.layers.len()
	}

	/// Forgets the layer for `id`.
	pub fn forget(&mut self, id: BufferId) -> bool {
		self.layers.remove(&id).is_some()
	}

	pub fn len(&self) -> usize {
		self.layers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.layers.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use relabel_primitives::Point;

	use super::*;

	fn range(col: usize, len: usize) -> TextRange {
		TextRange::new(Point::new(0, col), Point::new(0, col + len))
	}

	#[test]
	fn layer_is_created_once_per_buffer() {
		let mut tracker = RangeTracker::new();
		let shared = SharedBuffer::from_text("abc", None);

		let first = shared.with_mut(|b| tracker.layer_for(&shared, b));
		let second = shared.with_mut(|b| tracker.layer_for(&shared, b));
		assert_eq!(first, second);
		assert_eq!(tracker.len(), 1);
	}

	#[test]
	fn tracked_ranges_follow_earlier_writes() {
		let mut tracker = RangeTracker::new();
		let shared = SharedBuffer::from_text("a.b.c", None);
		shared.with_mut(|b| {
			let layer = tracker.layer_for(&shared, b);
			let markers = tracker.track(b, layer, [range(2, 1), range(4, 1)]);
			b.set_text_in_range(0..1, "xyz").unwrap();
			assert_eq!(tracker.resolve(b, layer, markers[0]), Some(4..5));
			assert_eq!(tracker.resolve(b, layer, markers[1]), Some(6..7));
		});
	}

	#[test]
	fn prune_drops_destroyed_and_released_buffers() {
		let mut tracker = RangeTracker::new();
		let kept = SharedBuffer::from_text("k", None);
		let destroyed = SharedBuffer::from_text("d", None);
		let dropped = SharedBuffer::from_text("r", None);
		for shared in [&kept, &destroyed, &dropped] {
			shared.with_mut(|b| tracker.layer_for(shared, b));
		}

		destroyed.destroy();
		drop(dropped);
		assert_eq!(tracker.prune(), 2);
		assert_eq!(tracker.len(), 1);
		assert!(tracker.forget(kept.id()));
		assert!(tracker.is_empty());
	}

	#[test]
	fn destroyed_layer_is_recreated() {
		let mut tracker = RangeTracker::new();
		let shared = SharedBuffer::from_text("abc", None);
		let layer = shared.with_mut(|b| tracker.layer_for(&shared, b));
		shared.with_mut(|b| {
			b.destroy();
			assert!(!b.has_marker_layer(layer));
		});
		let markers = shared.with_mut(|b| {
			let layer = tracker.layer_for(&shared, b);
			tracker.track(b, layer, [range(0, 1)])
		});
		assert_eq!(markers.len(), 1);
	}
}
