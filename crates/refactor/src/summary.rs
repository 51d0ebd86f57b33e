//! Human-readable descriptions of rename jobs.

use std::fmt::Write;

use relabel_primitives::{EditsByPath, count_edits};

use crate::response::RenameSummary;

/// Formats `count` with the singular or plural noun.
///
/// The plural defaults to `singular` with an `s` appended.
pub fn pluralize(count: usize, singular: &str, plural: Option<&str>) -> String {
	match (count, plural) {
		(1, _) => format!("{count} {singular}"),
		(_, Some(plural)) => format!("{count} {plural}"),
		(_, None) => format!("{count} {singular}s"),
	}
}

/// One-line description of a job, e.g. `Would rename 3 instances in 2 files.`
pub fn describe_edits(edits: &EditsByPath, pending: bool) -> String {
	let (instances, files) = count_edits(edits);
	format!(
		"{} {} in {}.",
		if pending { "Would rename" } else { "Renamed" },
		pluralize(instances, "instance", None),
		pluralize(files, "file", None),
	)
}

/// Markdown report of a finished job listing the files it touched.
pub fn describe_response(summary: &RenameSummary) -> String {
	let total = summary.editor_files.len() + summary.buffer_files.len();
	let mut out = format!("Rename succeeded. {} affected.", pluralize(total, "file", None));

	for (heading, files) in [
		("Open files in workspace:", &summary.editor_files),
		("Other files:", &summary.buffer_files),
	] {
		if files.is_empty() {
			continue;
		}
		let _ = write!(out, "\n\n{heading}\n");
		for file in files {
			let _ = write!(out, "\n* `{}`", file.display());
		}
	}
	out
}
