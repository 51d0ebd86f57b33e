use pretty_assertions::assert_eq;

use super::*;
use crate::workspace::Workspace;

fn workspace() -> Arc<dyn WorkspaceLookup> {
	Arc::new(Workspace::new([PathBuf::from("/proj")]))
}

fn editor(path: &str, text: &str) -> TextEditor {
	TextEditor::new(SharedBuffer::from_text(text, Some(PathBuf::from(path))))
}

fn edited(buffer: &SharedBuffer, text: &str) -> Checkpoint {
	let checkpoint = buffer.create_checkpoint();
	let len = buffer.with(|b| b.content().len_chars());
	buffer.with_mut(|b| b.set_text_in_range(0..len, text)).unwrap();
	checkpoint
}

#[test]
fn dispose_on_empty_ledger_is_a_noop() {
	let mut response = RenameResponse::new(workspace());
	response.dispose();
	response.dispose();
	assert!(response.is_empty());
	assert_eq!(response.describe(), RenameSummary::default());
}

#[test]
fn rerecording_replaces_the_entry_and_unsaved_count() {
	let mut response = RenameResponse::new(workspace());
	let editor = editor("/proj/a.js", "a");
	let checkpoint = edited(editor.buffer(), "b");

	response.record_editor(editor.clone(), checkpoint, false);
	assert_eq!(response.unsaved_editors(), 1);
	response.record_editor(editor.clone(), checkpoint, true);
	assert_eq!(response.unsaved_editors(), 0);
	assert_eq!(response.editors().count(), 1);
}

#[test]
fn describe_lists_relative_paths_by_kind() {
	let mut response = RenameResponse::new(workspace());
	let open = editor("/proj/src/a.js", "a");
	let open_cp = edited(open.buffer(), "b");
	let headless = SharedBuffer::from_text("a", Some(PathBuf::from("/proj/lib/b.js")));
	let headless_cp = edited(&headless, "b");

	response.record_editor(open, open_cp, false);
	response.record_buffer(headless, headless_cp);

	let summary = response.describe();
	assert_eq!(
		summary,
		RenameSummary {
			editor_files: vec![PathBuf::from("src/a.js")],
			buffer_files: vec![PathBuf::from("lib/b.js")],
			unsaved_editors: 1,
		}
	);
	assert_eq!(
		serde_json::to_value(&summary).unwrap(),
		serde_json::json!({
			"editorFiles": ["src/a.js"],
			"bufferFiles": ["lib/b.js"],
			"unsavedEditors": 1,
		})
	);
}

#[tokio::test]
async fn revert_skips_saving_unsaved_editors() {
	let mut response = RenameResponse::new(workspace());
	let editor = editor("/nonexistent-dir/a.js", "before");
	let checkpoint = edited(editor.buffer(), "after");
	response.record_editor(editor.clone(), checkpoint, false);

	response.revert().await.unwrap();
	assert_eq!(editor.text(), "before");
	assert!(!editor.is_modified());
}

#[tokio::test]
async fn revert_resaves_headless_buffers() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("b.js");
	std::fs::write(&path, "after").unwrap();

	let mut response = RenameResponse::new(workspace());
	let buffer = SharedBuffer::from_text("before", Some(path.clone()));
	let checkpoint = edited(&buffer, "after");
	response.record_buffer(buffer.clone(), checkpoint);

	response.revert().await.unwrap();
	assert_eq!(std::fs::read_to_string(&path).unwrap(), "before");

	drop(response);
	assert!(buffer.is_destroyed());
}
