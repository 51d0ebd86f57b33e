//! Rename providers and the session that drives them.
//!
//! Providers compute which ranges a rename touches; they never write. A
//! [`RenameSession`] picks providers for an editor's grammar scope, asks them
//! in rank order until one answers, and hands the resulting job to
//! [`ApplyEdits`].

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use relabel_buffer::TextEditor;
use relabel_primitives::{EditsByPath, Point, TextRange};

use crate::apply_edits::ApplyEdits;
use crate::error::{ProviderError, RenameError};
use crate::response::{RenameResponse, RenameSummary};
use crate::summary::describe_edits;

/// Score bonus for providers that can prepare a rename, enough to win ties
/// without outranking a higher priority.
const PREPARE_BONUS: f64 = 0.001;

/// A provider's answer to a prepare request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepareRename {
	/// The range that will be renamed.
	pub range: TextRange,
	/// Suggested initial name.
	pub placeholder: Option<String>,
}

/// Computes rename edits for a language.
#[async_trait]
pub trait RenameProvider: Send + Sync {
	fn name(&self) -> &str;

	/// Grammar scopes this provider handles, e.g. `source.js`.
	fn grammar_scopes(&self) -> &[String];

	fn priority(&self) -> f64 {
		0.0
	}

	/// Whether [`prepare_rename`](Self::prepare_rename) is implemented.
	fn supports_prepare(&self) -> bool {
		false
	}

	/// Validates a rename position and may adjust the range to rename.
	async fn prepare_rename(&self, _editor: &TextEditor, _position: Point) -> Option<PrepareRename> {
		None
	}

	/// Returns the edits renaming the symbol at `position`, or `None` if the
	/// provider rejects the request.
	async fn rename(&self, editor: &TextEditor, position: Point, new_name: &str) -> Option<EditsByPath>;
}

pub type SharedProvider = Arc<dyn RenameProvider>;

fn score(provider: &dyn RenameProvider) -> f64 {
	let bonus = if provider.supports_prepare() { PREPARE_BONUS } else { 0.0 };
	provider.priority() + bonus
}

/// Registered providers.
#[derive(Default)]
pub struct ProviderRegistry {
	providers: Vec<SharedProvider>,
}

impl ProviderRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, provider: SharedProvider) {
		tracing::debug!(provider = provider.name(), scopes = ?provider.grammar_scopes(), "registered rename provider");
		self.providers.push(provider);
	}

	pub fn len(&self) -> usize {
		self.providers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.providers.is_empty()
	}

	/// Providers handling `scope`, best first. Equal scores keep registration
	/// order.
	pub fn providers_for(&self, scope: Option<&str>) -> Vec<SharedProvider> {
		let Some(scope) = scope else {
			return Vec::new();
		};
		let mut matching: Vec<_> = self
			.providers
			.iter()
			.filter(|p| p.grammar_scopes().iter().any(|s| s == scope))
			.cloned()
			.collect();
		matching.sort_by(|a, b| score(b.as_ref()).total_cmp(&score(a.as_ref())));
		matching
	}
}

/// Asks each provider in turn and returns the first `Some` answer along with
/// the provider that gave it.
pub async fn first_valid_response<T, F, Fut>(providers: &[SharedProvider], mut ask: F) -> Option<(SharedProvider, T)>
where
	F: FnMut(SharedProvider) -> Fut,
	Fut: Future<Output = Option<T>>,
{
	for provider in providers {
		if let Some(answer) = ask(Arc::clone(provider)).await {
			return Some((Arc::clone(provider), answer));
		}
		tracing::trace!(provider = provider.name(), "provider declined");
	}
	None
}

/// Result of a completed rename.
#[derive(Debug)]
pub struct RenameOutcome {
	pub summary: RenameSummary,
	/// The ledger, kept when an undo should be offered.
	pub undo: Option<RenameResponse>,
}

/// One rename interaction on an editor.
pub struct RenameSession {
	editor: TextEditor,
	providers: Vec<SharedProvider>,
	/// Provider that answered the prepare request; used for every later call.
	chosen: Option<SharedProvider>,
	range: TextRange,
	placeholder: Option<String>,
}

impl RenameSession {
	/// Starts a session for the symbol at `range`.
	///
	/// Providers that support preparing are asked first. The first one to
	/// answer is kept for the rest of the session and may replace the range.
	///
	/// # Errors
	///
	/// Returns [`ProviderError::NoProviders`] if nothing handles the editor's
	/// grammar scope.
	pub async fn prepare(registry: &ProviderRegistry, editor: TextEditor, range: TextRange) -> Result<Self, ProviderError> {
		let providers = registry.providers_for(editor.grammar_scope());
		if providers.is_empty() {
			return Err(ProviderError::NoProviders(editor.grammar_scope().map(str::to_owned)));
		}

		let mut session = Self {
			editor,
			providers,
			chosen: None,
			range,
			placeholder: None,
		};

		let preparers: Vec<_> = session.providers.iter().filter(|p| p.supports_prepare()).cloned().collect();
		let editor = &session.editor;
		let position = session.range.start;
		if let Some((provider, prepared)) =
			first_valid_response(&preparers, |p| async move { p.prepare_rename(editor, position).await }).await
		{
			tracing::debug!(provider = provider.name(), range = ?prepared.range, "rename prepared");
			if !prepared.range.is_empty() {
				session.range = prepared.range;
			}
			session.placeholder = prepared.placeholder;
			session.chosen = Some(provider);
		}
		Ok(session)
	}

	pub fn range(&self) -> TextRange {
		self.range
	}

	/// Name of the provider chosen during prepare, if any.
	pub fn provider_name(&self) -> Option<&str> {
		self.chosen.as_deref().map(|p| p.name())
	}

	pub fn placeholder(&self) -> Option<&str> {
		self.placeholder.as_deref()
	}

	/// The text currently covered by the rename range.
	pub fn original_text(&self) -> String {
		self.editor.buffer().with(|b| b.text_in_range(self.range))
	}

	/// Dry run: describes what renaming to `new_name` would touch.
	///
	/// Returns `None` for an empty or unchanged name.
	pub async fn preview(&self, new_name: &str) -> Result<Option<String>, ProviderError> {
		if new_name.is_empty() || new_name == self.original_text() {
			return Ok(None);
		}
		let edits = self.request(new_name).await.ok_or(ProviderError::Rejected)?;
		Ok(Some(describe_edits(&edits, true)))
	}

	/// Computes the rename and applies it through `apply_edits`.
	///
	/// The ledger is handed back for a later undo when
	/// `offer_undo_notification` is enabled for the editor's grammar scope.
	/// Otherwise it is disposed before returning.
	pub async fn rename(&self, apply_edits: &ApplyEdits, new_name: &str) -> Result<RenameOutcome, RenameError> {
		let edits = self.request(new_name).await.ok_or(ProviderError::Rejected)?;
		tracing::debug!(summary = %describe_edits(&edits, true), "applying rename");
		let mut response = apply_edits.execute(&edits).await?;
		let summary = response.describe();
		if apply_edits.settings().offer_undo_notification_for(self.editor.grammar_scope()) {
			return Ok(RenameOutcome {
				summary,
				undo: Some(response),
			});
		}
		response.dispose();
		Ok(RenameOutcome { summary, undo: None })
	}

	async fn request(&self, new_name: &str) -> Option<EditsByPath> {
		let editor = &self.editor;
		let position = self.range.start;
		let candidates = match &self.chosen {
			Some(chosen) => std::slice::from_ref(chosen),
			None => self.providers.as_slice(),
		};
		first_valid_response(candidates, |p| async move { p.rename(editor, position, new_name).await })
			.await
			.map(|(_, edits)| edits)
	}
}

#[cfg(test)]
mod tests;
