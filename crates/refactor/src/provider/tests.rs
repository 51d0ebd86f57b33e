use std::path::PathBuf;

use pretty_assertions::assert_eq;
use relabel_buffer::SharedBuffer;
use relabel_config::Settings;
use relabel_primitives::Edit;

use super::*;
use crate::workspace::Workspace;

/// Renames every occurrence of `target` on the first line of the editor.
struct FakeProvider {
	name: &'static str,
	scopes: Vec<String>,
	priority: f64,
	prepare: Option<PrepareRename>,
	accepts: bool,
}

impl FakeProvider {
	fn new(name: &'static str, priority: f64) -> Self {
		Self {
			name,
			scopes: vec!["source.js".into()],
			priority,
			prepare: None,
			accepts: true,
		}
	}

	fn preparing(mut self, prepare: PrepareRename) -> Self {
		self.prepare = Some(prepare);
		self
	}

	fn rejecting(mut self) -> Self {
		self.accepts = false;
		self
	}
}

#[async_trait]
impl RenameProvider for FakeProvider {
	fn name(&self) -> &str {
		self.name
	}

	fn grammar_scopes(&self) -> &[String] {
		&self.scopes
	}

	fn priority(&self) -> f64 {
		self.priority
	}

	fn supports_prepare(&self) -> bool {
		self.prepare.is_some()
	}

	async fn prepare_rename(&self, _editor: &TextEditor, _position: Point) -> Option<PrepareRename> {
		self.prepare.clone()
	}

	async fn rename(&self, editor: &TextEditor, position: Point, new_name: &str) -> Option<EditsByPath> {
		if !self.accepts {
			return None;
		}
		let text = editor.text();
		let line = text.lines().next().unwrap_or_default();
		let word_start = position.column;
		let word_len = line[word_start..].find(|c: char| !c.is_alphanumeric()).unwrap_or(line.len() - word_start);
		let word = &line[word_start..word_start + word_len];

		let edits: Vec<Edit> = line
			.match_indices(word)
			.map(|(col, _)| Edit::new(TextRange::new(Point::new(0, col), Point::new(0, col + word_len)), new_name))
			.collect();
		Some([(editor.path().unwrap_or_default(), edits)].into_iter().collect())
	}
}

fn registry(providers: impl IntoIterator<Item = FakeProvider>) -> ProviderRegistry {
	let mut registry = ProviderRegistry::new();
	for provider in providers {
		registry.register(Arc::new(provider));
	}
	registry
}

fn names(providers: &[SharedProvider]) -> Vec<&str> {
	providers.iter().map(|p| p.name()).collect()
}

fn js_editor(text: &str) -> TextEditor {
	TextEditor::new(SharedBuffer::from_text(text, Some(PathBuf::from("/proj/a.js")))).with_grammar_scope("source.js")
}

fn word_at(col: usize, len: usize) -> TextRange {
	TextRange::new(Point::new(0, col), Point::new(0, col + len))
}

#[test]
fn ranking_prefers_priority_then_prepare_support() {
	let prepare = PrepareRename {
		range: word_at(0, 1),
		placeholder: None,
	};
	let registry = registry([
		FakeProvider::new("low", 1.0),
		FakeProvider::new("plain", 2.0),
		FakeProvider::new("preparing", 2.0).preparing(prepare.clone()),
		FakeProvider::new("high", 3.0),
	]);

	let ranked = registry.providers_for(Some("source.js"));
	assert_eq!(names(&ranked), vec!["high", "preparing", "plain", "low"]);
	assert!(registry.providers_for(Some("source.python")).is_empty());
	assert!(registry.providers_for(None).is_empty());
}

#[tokio::test]
async fn first_valid_response_skips_declining_providers() {
	let registry = registry([FakeProvider::new("a", 2.0), FakeProvider::new("b", 1.0)]);
	let providers = registry.providers_for(Some("source.js"));

	let found = first_valid_response(&providers, |p| async move { (p.name() == "b").then_some(7) }).await;
	let (provider, answer) = found.unwrap();
	assert_eq!(provider.name(), "b");
	assert_eq!(answer, 7);

	let none = first_valid_response(&providers, |_| async { None::<()> }).await;
	assert!(none.is_none());
}

#[tokio::test]
async fn prepare_fails_without_providers() {
	let registry = ProviderRegistry::new();
	let err = RenameSession::prepare(&registry, js_editor("foo"), word_at(0, 3)).await.err();
	assert_eq!(err, Some(ProviderError::NoProviders(Some("source.js".into()))));
}

#[tokio::test]
async fn prepare_adopts_the_provider_range() {
	let prepare = PrepareRename {
		range: word_at(4, 3),
		placeholder: Some("foo".into()),
	};
	let registry = registry([
		FakeProvider::new("plain", 5.0),
		FakeProvider::new("preparing", 0.0).preparing(prepare),
	]);

	let session = RenameSession::prepare(&registry, js_editor("let foo = foo;"), word_at(0, 0)).await.unwrap();
	assert_eq!(session.provider_name(), Some("preparing"));
	assert_eq!(session.range(), word_at(4, 3));
	assert_eq!(session.original_text(), "foo");
	assert_eq!(session.placeholder(), Some("foo"));
}

#[tokio::test]
async fn preview_describes_the_pending_rename() {
	let registry = registry([FakeProvider::new("js", 0.0)]);
	let session = RenameSession::prepare(&registry, js_editor("foo + foo"), word_at(0, 3)).await.unwrap();

	assert_eq!(session.preview("").await, Ok(None));
	assert_eq!(session.preview("foo").await, Ok(None));
	assert_eq!(session.preview("bar").await, Ok(Some("Would rename 2 instances in 1 file.".into())));
}

#[tokio::test]
async fn rejected_rename_surfaces_provider_error() {
	let registry = registry([FakeProvider::new("js", 0.0).rejecting()]);
	let session = RenameSession::prepare(&registry, js_editor("foo"), word_at(0, 3)).await.unwrap();
	assert_eq!(session.preview("bar").await, Err(ProviderError::Rejected));

	let apply_edits = ApplyEdits::new(Arc::new(Workspace::default()), Arc::new(Settings::default()));
	let err = session.rename(&apply_edits, "bar").await.unwrap_err();
	assert!(matches!(err, RenameError::Provider(ProviderError::Rejected)));
}

#[tokio::test]
async fn rename_applies_edits_to_the_open_editor() {
	let editor = js_editor("foo + foo");
	let workspace = Arc::new(Workspace::new([PathBuf::from("/proj")]));
	workspace.open(editor.clone());
	let registry = registry([FakeProvider::new("declines", 9.0).rejecting(), FakeProvider::new("js", 0.0)]);

	let session = RenameSession::prepare(&registry, editor.clone(), word_at(0, 3)).await.unwrap();
	let apply_edits = ApplyEdits::new(workspace, Arc::new(Settings::default()));
	let outcome = session.rename(&apply_edits, "bar").await.unwrap();

	assert_eq!(editor.text(), "bar + bar");
	assert_eq!(outcome.summary.editor_files, vec![PathBuf::from("a.js")]);
	assert_eq!(outcome.summary.unsaved_editors, 1);

	let undo = outcome.undo.expect("undo is offered by default");
	undo.revert().await.unwrap();
	assert_eq!(editor.text(), "foo + foo");
}

#[tokio::test]
async fn rename_releases_the_ledger_when_undo_is_not_offered() {
	let editor = js_editor("foo + foo");
	let workspace = Arc::new(Workspace::new([PathBuf::from("/proj")]));
	workspace.open(editor.clone());
	let registry = registry([FakeProvider::new("js", 0.0)]);
	let settings = Settings::parse(
		r#"
		[scopes."source.js"]
		offer_undo_notification = false
		"#,
	)
	.unwrap();

	let session = RenameSession::prepare(&registry, editor.clone(), word_at(0, 3)).await.unwrap();
	let apply_edits = ApplyEdits::new(workspace, Arc::new(settings));
	let outcome = session.rename(&apply_edits, "bar").await.unwrap();

	assert_eq!(editor.text(), "bar + bar");
	assert_eq!(outcome.summary.editor_files, vec![PathBuf::from("a.js")]);
	assert!(outcome.undo.is_none());
}
