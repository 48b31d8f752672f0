use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;

use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wsync_core::constants::CONFIG_FILE;
use wsync_core::{DiskStore, SyncError, Synchronizer, Task, WorkspaceSpec};

mod styles;

use styles as s;

/// The command-line interface for wsync.
#[derive(Debug, Parser)]
#[command(name = "wsync")]
#[command(version)]
#[command(styles = s::get_clap_styles())]
#[command(about = "Workspace synchronization for generated API client packages")]
#[command(
    long_about = "wsync keeps a multi-package API client workspace in line with its
canonical specification. Every task is an idempotent pass: manifests and
barrel files are fully regenerated, the Dart descriptor is patched in
place, and re-running any task is always safe.

Tasks:
  setup              Write package manifests, ensure export lines, patch pubspec.yaml
  barrels <package>  Regenerate one package's barrel (index.ts) file
  fix-imports        Rewrite model imports in generated stubs to type-only form
"
)]
pub(crate) struct Cli {
    /// Task to run: `setup`, `barrels`, or `fix-imports`
    command: Option<String>,
    /// Target package name (required by `barrels`)
    package: Option<String>,
    /// Workspace root directory.
    #[arg(long, default_value = ".")]
    root: PathBuf,
    /// Path to a workspace spec file (TOML). Defaults to `wsync.toml` in
    /// the workspace root when present, otherwise the builtin spec.
    #[arg(long)]
    config: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    debug!("parsed cli arguments: {:?}", cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

/// Usage mistakes exit with a distinct code so callers can tell them apart
/// from I/O failures.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<SyncError>() {
        Some(SyncError::Usage(_)) => 2,
        _ => 1,
    }
}

fn run(cli: &Cli) -> Result<()> {
    let command_text = match &cli.command {
        Some(command) => command,
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            return Ok(());
        }
    };

    let task = Task::from_str(command_text).map_err(|e| SyncError::usage(e.to_string()))?;
    let spec = load_spec(cli)?;
    let store = DiskStore::new(&cli.root);
    let sync = Synchronizer::new(&store, &spec);

    match task {
        Task::Setup => {
            sync.setup()?;
            println!("workspace setup complete");
        }
        Task::Barrels => {
            sync.generate_barrel(cli.package.as_deref())?;
        }
        Task::FixImports => {
            sync.fix_imports()?;
        }
    }

    Ok(())
}

fn load_spec(cli: &Cli) -> Result<WorkspaceSpec> {
    if let Some(path) = &cli.config {
        return WorkspaceSpec::load_from_file(path)
            .with_context(|| format!("unable to load workspace spec '{path}'"));
    }

    let default_path = cli.root.join(CONFIG_FILE);
    if default_path.exists() {
        let path = default_path.to_string_lossy();
        return WorkspaceSpec::load_from_file(&path)
            .with_context(|| format!("unable to load workspace spec '{path}'"));
    }

    Ok(WorkspaceSpec::builtin())
}
