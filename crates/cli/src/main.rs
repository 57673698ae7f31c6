// Sovendus settings CLI - normalize, inspect and save settings files

mod exit_codes;

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use sovendus_settings::store::{load_settings, persist_settings, SETTINGS_KEY};
use sovendus_settings::tour::TourProgress;
use sovendus_settings::{
    AppSettings, CloseOutcome, Feature, FileStore, ReconcilerConfig, SaveFailure, SettingsError,
    SettingsReconciler, SettingsSession,
};

use exit_codes::{settings_exit_code, EXIT_DIFF_DIFFS, EXIT_SAVE_FAILED, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "sovendus")]
#[command(about = "Normalize and inspect Sovendus App settings")]
#[command(version)]
struct Cli {
    /// Display configuration (TOML) for status summaries
    #[arg(long, global = true, value_name = "FILE", env = "SOVENDUS_CONFIG")]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize settings JSON and print the result
    #[command(after_help = "\
Examples:
  sovendus normalize settings.json
  cat settings.json | sovendus normalize --compact")]
    Normalize {
        /// Settings file (omit to read from stdin)
        input: Option<PathBuf>,

        /// Print on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Show which features are active
    #[command(after_help = "\
Examples:
  sovendus status settings.json
  sovendus status settings.json --feature optimize --json")]
    Status {
        /// Settings file (omit to read from stdin)
        input: Option<PathBuf>,

        /// Only this feature (e.g. voucherNetwork, optimize, rewards)
        #[arg(long, short = 'f')]
        feature: Option<Feature>,

        /// Print a JSON array instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Compare two settings files after normalization (exit 1 if they differ)
    Diff {
        stored: PathBuf,
        draft: PathBuf,
    },

    /// Save a draft into the settings store if it differs from what is stored
    Save {
        /// Draft settings file
        draft: PathBuf,

        /// Store file (default: <config dir>/sovendus/ui-state.json)
        #[arg(long, env = "SOVENDUS_STORE")]
        store: Option<PathBuf>,

        /// Key the settings are stored under
        #[arg(long, default_value = SETTINGS_KEY)]
        key: String,
    },

    /// Onboarding tour progress
    Tour {
        #[command(subcommand)]
        action: TourAction,

        /// Store file (default: <config dir>/sovendus/ui-state.json)
        #[arg(long, env = "SOVENDUS_STORE")]
        store: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum TourAction {
    /// List completed and pending tours
    Status,
    /// Mark a feature's tour as completed
    Done { feature: Feature },
    /// Show a feature's tour again
    Reset { feature: Feature },
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into() }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self { code: settings_exit_code(&err), message: err.to_string() }
    }
}

impl From<SaveFailure> for CliError {
    fn from(err: SaveFailure) -> Self {
        Self { code: EXIT_SAVE_FAILED, message: err.to_string() }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(CliError { code, message }) => {
            eprintln!("error: {}", message);
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<u8, CliError> {
    let config = match &cli.config {
        Some(path) => ReconcilerConfig::load(path)?,
        None => ReconcilerConfig::default(),
    };
    let reconciler = SettingsReconciler::with_config(config);

    match cli.command {
        Commands::Normalize { input, compact } => cmd_normalize(&reconciler, input.as_deref(), compact),
        Commands::Status { input, feature, json } => cmd_status(&reconciler, input.as_deref(), feature, json),
        Commands::Diff { stored, draft } => cmd_diff(&reconciler, &stored, &draft),
        Commands::Save { draft, store, key } => cmd_save(&reconciler, &draft, store, &key),
        Commands::Tour { action, store } => cmd_tour(action, store),
    }
}

// ---------------------------------------------------------------------------
// Input helpers
// ---------------------------------------------------------------------------

fn read_input(input: Option<&Path>) -> Result<String, CliError> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| CliError::usage(format!("cannot read {}: {e}", path.display()))),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| CliError::usage(format!("cannot read stdin: {e}")))?;
            Ok(buf)
        }
    }
}

fn load_normalized(reconciler: &SettingsReconciler, input: Option<&Path>) -> Result<AppSettings, CliError> {
    let json = read_input(input)?;
    Ok(reconciler.normalize(json)?)
}

fn open_store(path: Option<PathBuf>) -> Result<FileStore, CliError> {
    let store = match path {
        Some(path) => FileStore::open(path)?,
        None => FileStore::open_default()?,
    };
    log::debug!("using store {}", store.path().display());
    Ok(store)
}

fn to_json(value: &impl Serialize, compact: bool) -> Result<String, CliError> {
    let json = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    json.map_err(|e| CliError::usage(format!("cannot serialize output: {e}")))
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_normalize(reconciler: &SettingsReconciler, input: Option<&Path>, compact: bool) -> Result<u8, CliError> {
    let settings = load_normalized(reconciler, input)?;
    println!("{}", to_json(&settings, compact)?);
    Ok(EXIT_SUCCESS)
}

fn cmd_status(
    reconciler: &SettingsReconciler,
    input: Option<&Path>,
    feature: Option<Feature>,
    json: bool,
) -> Result<u8, CliError> {
    let settings = load_normalized(reconciler, input)?;
    let statuses = match feature {
        Some(feature) => vec![reconciler.feature_status(feature, &settings)?],
        None => reconciler.all_statuses(&settings)?,
    };

    if json {
        println!("{}", to_json(&statuses, true)?);
        return Ok(EXIT_SUCCESS);
    }

    for status in &statuses {
        println!(
            "{:<18} {:<8} {}",
            status.feature.key(),
            if status.active { "active" } else { "inactive" },
            status.summary.render(reconciler.config())
        );
    }
    Ok(EXIT_SUCCESS)
}

/// Top-level keys whose normalized value differs
fn changed_sections(stored: &AppSettings, draft: &AppSettings) -> Vec<String> {
    let (Ok(serde_json::Value::Object(a)), Ok(serde_json::Value::Object(b))) =
        (serde_json::to_value(stored), serde_json::to_value(draft))
    else {
        return Vec::new();
    };

    let mut keys: Vec<&String> = a.keys().chain(b.keys()).collect();
    keys.sort();
    keys.dedup();
    keys.into_iter()
        .filter(|k| a.get(*k) != b.get(*k))
        .cloned()
        .collect()
}

fn cmd_diff(reconciler: &SettingsReconciler, stored: &Path, draft: &Path) -> Result<u8, CliError> {
    let stored = load_normalized(reconciler, Some(stored))?;
    let draft = load_normalized(reconciler, Some(draft))?;

    let mut session = SettingsSession::new(stored);
    *session.draft_mut() = draft;
    if !session.has_unsaved_changes() {
        println!("no changes");
        return Ok(EXIT_SUCCESS);
    }

    for key in changed_sections(session.stored(), session.draft()) {
        println!("changed: {key}");
    }
    Ok(EXIT_DIFF_DIFFS)
}

fn cmd_save(
    reconciler: &SettingsReconciler,
    draft: &Path,
    store: Option<PathBuf>,
    key: &str,
) -> Result<u8, CliError> {
    let mut store = open_store(store)?;
    let draft = load_normalized(reconciler, Some(draft))?;

    let mut session = SettingsSession::new(load_settings(&store, key));
    *session.draft_mut() = draft;

    let outcome = smol::block_on(session.close_configuration(|draft| {
        let saved = persist_settings(&mut store, key, &draft)
            .map(|()| draft)
            .map_err(|e| SaveFailure::new(e.to_string()));
        async move { saved }
    }))?;

    match outcome {
        CloseOutcome::Unchanged => println!("unchanged"),
        CloseOutcome::Saved => println!("saved"),
    }
    Ok(EXIT_SUCCESS)
}

fn cmd_tour(action: TourAction, store: Option<PathBuf>) -> Result<u8, CliError> {
    let mut tours = TourProgress::new(open_store(store)?);
    match action {
        TourAction::Status => {
            let pending = tours.pending(&Feature::ALL)?;
            for feature in Feature::ALL {
                let state = if pending.contains(&feature) { "pending" } else { "completed" };
                println!("{:<18} {}", feature.key(), state);
            }
        }
        TourAction::Done { feature } => tours.mark_completed(feature)?,
        TourAction::Reset { feature } => tours.reset(feature)?,
    }
    Ok(EXIT_SUCCESS)
}
