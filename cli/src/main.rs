//! Quill CLI - author blueprints and drive contracts through their lifecycle.
//!
//! # Architecture
//!
//! Each invocation loads the JSON store, runs one command against it through
//! [`quill_core`], and writes the store back when the command changed it.
//!
//! ```text
//! main() -> QuillConfig::load() -> Store::load(path) -> Session::run(command)
//!                                                            |
//!                                                            v
//!                                              Outcome::Unchanged | Changed -> Store::save
//! ```

mod commands;
mod render;

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use quill_config::QuillConfig;
use quill_core::{ContractFilter, ContractSort};
use quill_store::Store;
use quill_types::{ContractStatus, FieldType};

use crate::commands::{Outcome, Session};

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Author contract blueprints and manage contract lifecycles")]
struct Cli {
    /// Store file to use instead of the configured one
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create and edit blueprints
    #[command(subcommand)]
    Blueprint(BlueprintCommand),
    /// Create, fill, sign and advance contracts
    #[command(subcommand)]
    Contract(ContractCommand),
    /// Show dashboard counters
    Stats,
    /// Add the demo blueprint and contract to an empty store
    SeedDemo,
    /// Change settings in the config file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
pub(crate) enum BlueprintCommand {
    /// List blueprints
    List,
    /// Show a blueprint's fields
    Show { id: String },
    /// Create a blueprint from field specs such as `text:Full name` or `checkbox`
    Create {
        name: String,
        /// Field as `<type>[:<label>]`; repeatable, at least one required
        #[arg(long = "field", required = true)]
        fields: Vec<String>,
    },
    /// Append a field at the next free slot
    AddField {
        id: String,
        #[arg(value_parser = parse_field_type)]
        field_type: FieldType,
        #[arg(long)]
        label: Option<String>,
    },
    /// Change properties of a field
    UpdateField {
        id: String,
        field: String,
        #[command(flatten)]
        update: FieldUpdateArgs,
    },
    /// Remove a field
    DeleteField { id: String, field: String },
    /// Rename a blueprint
    Rename { id: String, name: String },
    /// Move a field; the drop point is snapped to the grid and kept on the page
    MoveField {
        id: String,
        field: String,
        x: f64,
        y: f64,
    },
}

#[derive(Args, Default)]
pub(crate) struct FieldUpdateArgs {
    #[arg(long)]
    pub label: Option<String>,
    /// Static text of a text block
    #[arg(long)]
    pub content: Option<String>,
    #[arg(long)]
    pub required: Option<bool>,
    /// Replace the options of a select; repeatable
    #[arg(long = "option")]
    pub options: Vec<String>,
    /// Width as a number of units or a CSS length such as `250px`
    #[arg(long)]
    pub width: Option<String>,
    #[arg(long)]
    pub hide_label: Option<bool>,
    /// Full partial update as JSON, e.g. `{"label":"Name","required":true}`
    #[arg(long, conflicts_with_all = ["label", "content", "required", "options", "width", "hide_label"])]
    pub json: Option<String>,
}

#[derive(Subcommand)]
pub(crate) enum ContractCommand {
    /// List contracts
    List {
        #[arg(long, default_value_t = ContractFilter::All)]
        filter: ContractFilter,
        /// Match contract name, blueprint name or id
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value_t = ContractSort::NewestFirst)]
        sort: ContractSort,
    },
    /// Show a contract with its values
    Show { id: String },
    /// Instantiate a blueprint as a new contract
    Create { blueprint: String, name: String },
    /// Fill in a field value
    Set {
        id: String,
        field: String,
        /// Text, or `true`/`false` for checkboxes
        #[arg(required_unless_present = "clear")]
        value: Option<String>,
        /// Clear the value instead
        #[arg(long, conflicts_with = "value")]
        clear: bool,
    },
    /// Sign a signature field
    Sign {
        id: String,
        field: String,
        signer: String,
    },
    /// Remove a signature
    Unsign { id: String, field: String },
    /// Move a contract to another status
    Transition {
        id: String,
        #[arg(value_parser = parse_status)]
        status: ContractStatus,
    },
    /// List the statuses a contract can move to
    Transitions { id: String },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Record the store location in the config file
    SetStore { path: PathBuf },
}

fn parse_field_type(raw: &str) -> Result<FieldType, String> {
    FieldType::parse(raw).ok_or_else(|| {
        let known: Vec<_> = FieldType::ALL.iter().map(|t| t.as_str()).collect();
        format!("unknown field type `{raw}` (expected one of {})", known.join(", "))
    })
}

fn parse_status(raw: &str) -> Result<ContractStatus, String> {
    raw.parse().map_err(|err| format!("{err}"))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::debug!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // Without a log file, stay silent rather than mixing logs into command output.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new().create(true).append(true).open(&candidate) {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.quill/logs/quill.log
    if let Some(home) = quill_config::quill_home() {
        candidates.push(home.join("logs").join("quill.log"));
    }

    // Fallback: ./.quill/logs/quill.log
    candidates.push(PathBuf::from(".quill").join("logs").join("quill.log"));

    candidates
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    if let Command::Config(ConfigCommand::SetStore { path }) = &cli.command {
        QuillConfig::persist_store_path(path)
            .with_context(|| format!("failed to record store path {}", path.display()))?;
        println!("Store path set to {}", path.display());
        return Ok(());
    }

    let config = QuillConfig::load()
        .context("failed to load config")?
        .unwrap_or_default();
    let store_path = cli.store.unwrap_or_else(|| config.store_path());
    let timestamp_format = config
        .timestamp_format()
        .context("invalid signature timestamp format")?;

    let first_run = !store_path.exists();
    let mut store = Store::load(&store_path)?;
    let mut seeded = false;
    if first_run && config.seed_demo() && !matches!(cli.command, Command::SeedDemo) {
        seeded = store.seed_demo(chrono::Utc::now());
    }

    let mut session = Session::new(&mut store, timestamp_format);
    let mut out = io::stdout().lock();
    let outcome = match cli.command {
        Command::Blueprint(command) => session.blueprint(command, &mut out)?,
        Command::Contract(command) => session.contract(command, &mut out)?,
        Command::Stats => session.stats(&mut out)?,
        Command::SeedDemo => session.seed_demo(&mut out)?,
        Command::Config(_) => Outcome::Unchanged,
    };
    out.flush()?;

    if seeded || outcome == Outcome::Changed {
        store.save(&store_path)?;
    }
    Ok(())
}
