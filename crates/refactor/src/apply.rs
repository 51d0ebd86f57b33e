//! Applies one file's edit set as a single undoable unit.

use std::path::PathBuf;

use relabel_buffer::{Buffer, Checkpoint, LayerId, MarkerId, SharedBuffer};
use relabel_primitives::Edit;

use crate::error::{ApplyError, MissingMarkerError};
use crate::tracker::RangeTracker;

/// Applies `edits` to `shared` and returns the checkpoint that undoes them.
///
/// Every range is captured before the first write, then resolved to its live
/// position right before its own write, so edits that change the document's
/// length do not displace later ones. The writes are grouped into one undo
/// step.
///
/// The whole call runs under the buffer lock: no other task can observe the
/// buffer half edited.
///
/// # Errors
///
/// On failure the buffer is reverted to the state it was found in, history
/// included, before the error is returned.
pub fn apply_edit_set(tracker: &mut RangeTracker, shared: &SharedBuffer, edits: &[Edit]) -> Result<Checkpoint, ApplyError> {
	shared.with_mut(|buffer| {
		let checkpoint = buffer.create_checkpoint();
		let layer = tracker.layer_for(shared, buffer);
		let markers = tracker.track(buffer, layer, edits.iter().map(|e| e.old_range));

		let result = write_edits(tracker, buffer, layer, &markers, edits);
		for marker in markers.iter().flatten() {
			buffer.destroy_marker(layer, *marker);
		}

		match result {
			Ok(()) => {
				buffer.group_changes_since_checkpoint(checkpoint);
				Ok(checkpoint)
			}
			Err(err) => {
				buffer.revert_to_checkpoint(checkpoint);
				Err(err)
			}
		}
	})
}

fn write_edits(
	tracker: &RangeTracker,
	buffer: &mut Buffer,
	layer: LayerId,
	markers: &[Option<MarkerId>],
	edits: &[Edit],
) -> Result<(), ApplyError> {
	for (index, (edit, marker)) in edits.iter().zip(markers).enumerate() {
		let Some(range) = tracker.resolve(buffer, layer, *marker) else {
			return Err(ApplyError::MissingMarker {
				path: path_of(buffer),
				source: MissingMarkerError { index },
			});
		};
		buffer
			.set_text_in_range(range, &edit.new_text)
			.map_err(|source| ApplyError::Edit {
				path: path_of(buffer),
				source,
			})?;
	}
	Ok(())
}

fn path_of(buffer: &Buffer) -> PathBuf {
	buffer.path().map(|p| p.to_path_buf()).unwrap_or_default()
}
