//! # ETABS Adapter CLI
//!
//! Runs adapter sessions against an offline model snapshot. Every command
//! prints its result as JSON on stdout; logs go to stderr (`RUST_LOG`).
//!
//! ```text
//! etabs_cli init    --model model.json --story Story1=3.5 --story Story2=7.0
//! etabs_cli push    --model model.json --nodes nodes.json [--settings settings.json]
//! etabs_cli next-id --model model.json --type Node [--refresh] [--count 3]
//! etabs_cli list    --model model.json --category PointObj
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use etabs_core::file_io::{
    load_nodes, load_settings, load_snapshot, load_snapshot_with_lock_check, save_snapshot,
    FileLock, ModelSnapshot,
};
use etabs_core::{
    AdapterError, AdapterResult, AdapterSettings, Diagnostic, EtabsAdapter, InMemoryModel, Node,
    ObjectCategory, ObjectType, PushReport,
};

#[derive(Debug, Parser)]
#[command(
    name = "etabs_cli",
    version,
    about = "Push structural nodes into an ETABS model snapshot"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an empty model snapshot.
    Init {
        #[arg(long)]
        model: PathBuf,
        /// Story level as NAME=ELEVATION, repeatable
        #[arg(long = "story")]
        stories: Vec<String>,
        /// Overwrite an existing snapshot
        #[arg(long)]
        force: bool,
    },
    /// Create nodes from a JSON array.
    Push {
        #[arg(long)]
        model: PathBuf,
        #[arg(long)]
        nodes: PathBuf,
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Recorded in the lock file while the snapshot is being written
        #[arg(long, default_value = "etabs_cli")]
        user: String,
    },
    /// Print the next free identifiers of an object type.
    NextId {
        #[arg(long)]
        model: PathBuf,
        #[arg(long = "type")]
        object_type: ObjectType,
        /// Re-read the name list instead of trusting cached identifiers
        #[arg(long)]
        refresh: bool,
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// Print the name list of a category.
    List {
        #[arg(long)]
        model: PathBuf,
        #[arg(long)]
        category: ObjectCategory,
    },
}

#[derive(Serialize)]
struct PushOutput<'a> {
    report: PushReport,
    nodes: &'a [Node],
    diagnostics: &'a [Diagnostic],
}

#[derive(Serialize)]
struct NextIdOutput<'a> {
    object_type: &'a str,
    ids: Vec<String>,
    diagnostics: &'a [Diagnostic],
}

fn main() -> ExitCode {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("etabs_core=info,etabs_cli=info"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> AdapterResult<()> {
    match command {
        Command::Init { model, stories, force } => init(&model, &stories, force),
        Command::Push {
            model,
            nodes,
            settings,
            user,
        } => push(&model, &nodes, settings.as_deref(), &user),
        Command::NextId {
            model,
            object_type,
            refresh,
            count,
        } => next_id(&model, &object_type, refresh, count),
        Command::List { model, category } => list(&model, category),
    }
}

fn init(path: &Path, stories: &[String], force: bool) -> AdapterResult<()> {
    if path.exists() && !force {
        return Err(AdapterError::invalid_input(
            "model",
            path.display().to_string(),
            "Snapshot already exists (use --force to overwrite)",
        ));
    }

    let mut model = InMemoryModel::new();
    for story in stories {
        let (name, elevation) = parse_story(story)?;
        model.add_story(name, elevation);
    }

    let _lock = FileLock::acquire(path, "etabs_cli")?;
    let snapshot = ModelSnapshot::new(model);
    save_snapshot(&snapshot, path)?;
    print_json(&snapshot)
}

fn parse_story(arg: &str) -> AdapterResult<(&str, f64)> {
    let invalid = |reason: &str| AdapterError::invalid_input("story", arg, reason);
    let (name, elevation) = arg
        .split_once('=')
        .ok_or_else(|| invalid("Expected NAME=ELEVATION"))?;
    let elevation: f64 = elevation
        .trim()
        .parse()
        .map_err(|_| invalid("Elevation must be a number"))?;
    if name.trim().is_empty() {
        return Err(invalid("Story name must not be empty"));
    }
    Ok((name.trim(), elevation))
}

fn push(
    path: &Path,
    nodes_path: &Path,
    settings_path: Option<&Path>,
    user: &str,
) -> AdapterResult<()> {
    let settings = match settings_path {
        Some(p) => load_settings(p)?,
        None => AdapterSettings::default(),
    };
    let mut nodes = load_nodes(nodes_path)?;

    let _lock = FileLock::acquire(path, user)?;
    let mut snapshot = load_snapshot(path)?;
    tracing::info!(
        path = %path.display(),
        points = snapshot.model.points().len(),
        nodes = nodes.len(),
        "pushing nodes into snapshot"
    );

    let mut adapter = EtabsAdapter::with_settings(&mut snapshot.model, settings);
    let report = adapter.push_nodes(&mut nodes);
    let diagnostics = adapter.take_diagnostics();
    drop(adapter);

    save_snapshot(&snapshot, path)?;
    print_json(&PushOutput {
        report,
        nodes: &nodes,
        diagnostics: diagnostics.entries(),
    })
}

/// Load a snapshot for a read-only command. A lock held by someone else
/// does not block reading, but the snapshot may change underneath.
fn load_for_reading(path: &Path) -> AdapterResult<ModelSnapshot> {
    let (snapshot, lock) = load_snapshot_with_lock_check(path)?;
    if let Some(lock) = lock {
        tracing::warn!(
            path = %path.display(),
            user = %lock.user_id,
            machine = %lock.machine,
            locked_at = %lock.locked_at.to_rfc3339(),
            "snapshot is locked by another session; results may be out of date"
        );
    }
    Ok(snapshot)
}

fn next_id(
    path: &Path,
    object_type: &ObjectType,
    refresh: bool,
    count: usize,
) -> AdapterResult<()> {
    let mut snapshot = load_for_reading(path)?;
    let mut adapter = EtabsAdapter::new(&mut snapshot.model);

    let ids: Vec<String> = (0..count.max(1))
        .map(|i| adapter.next_id(object_type, refresh && i == 0))
        .collect();
    let diagnostics = adapter.take_diagnostics();

    print_json(&NextIdOutput {
        object_type: object_type.tag(),
        ids,
        diagnostics: diagnostics.entries(),
    })
}

fn list(path: &Path, category: ObjectCategory) -> AdapterResult<()> {
    use etabs_core::CsiModel;

    let snapshot = load_for_reading(path)?;
    let names = snapshot
        .model
        .name_list(category)
        .map_err(|status| status.into_error(&format!("{}.GetNameList", category)))?;
    print_json(&names)
}

fn print_json<T: Serialize>(value: &T) -> AdapterResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
