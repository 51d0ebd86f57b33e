//! Relabel command-line front end.
//!
//! Applies a rename job, written as JSON, to files on disk:
//!
//! ```text
//! relabel apply edits.json --root ./project
//! ```
//!
//! The job maps absolute paths to edit lists:
//!
//! ```json
//! { "/project/a.js": [{ "old_range": [[0, 4], [0, 7]], "new_text": "bar" }] }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use relabel_config::Settings;
use relabel_primitives::EditsByPath;
use relabel_refactor::{ApplyEdits, Workspace, describe_edits, describe_response};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "relabel")]
#[command(about = "Apply multi-file rename edits atomically")]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Apply a JSON rename job to files on disk
	Apply {
		/// Path to the JSON job
		#[arg(value_name = "EDITS")]
		edits: PathBuf,

		/// Project root used to shorten reported paths
		#[arg(long, value_name = "DIR")]
		root: Option<PathBuf>,

		/// Settings file (TOML)
		#[arg(long, value_name = "FILE")]
		config: Option<PathBuf>,

		/// Describe the job without writing anything
		#[arg(long)]
		dry_run: bool,

		/// Verbose logging
		#[arg(short, long)]
		verbose: bool,
	},
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	match cli.command {
		Command::Apply {
			edits,
			root,
			config,
			dry_run,
			verbose,
		} => {
			let settings = match &config {
				Some(path) => Settings::load(path).with_context(|| format!("loading settings from {}", path.display()))?,
				None => Settings::default(),
			};
			setup_tracing(verbose || settings.debug_logging_for(None));
			apply(&edits, root, settings, dry_run).await
		}
	}
}

async fn apply(edits_path: &Path, root: Option<PathBuf>, settings: Settings, dry_run: bool) -> anyhow::Result<()> {
	let edits = read_job(edits_path)?;
	if dry_run {
		println!("{}", describe_edits(&edits, true));
		return Ok(());
	}

	let root = match root {
		Some(root) => root,
		None => std::env::current_dir().context("resolving current directory")?,
	};
	info!(root = %root.display(), job = %edits_path.display(), "applying rename job");

	let workspace = Arc::new(Workspace::new([root]));
	let apply_edits = ApplyEdits::new(workspace, Arc::new(settings));
	let mut response = apply_edits
		.execute(&edits)
		.await
		.context("rename failed; every file was restored")?;

	println!("{}", describe_edits(&edits, false));
	println!();
	println!("{}", describe_response(&response.describe()));
	response.dispose();
	Ok(())
}

fn read_job(path: &Path) -> anyhow::Result<EditsByPath> {
	let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
	serde_json::from_str(&text).with_context(|| format!("parsing rename job {}", path.display()))
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env("RELABEL_LOG").unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("relabel=debug,relabel_refactor=debug,relabel_buffer=debug,warn")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(true)
		.init();
}
