//! `notesort` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments, load config once, wire logging, and dispatch to
//!   `notesort_core` services.
//! - Map outcomes onto the exit codes in `exit_codes`.

mod exit_codes;

use clap::{Parser, Subcommand};
use exit_codes::{EXIT_ERROR, EXIT_MISSING_RECORDS, EXIT_SUCCESS, EXIT_USAGE};
use log::debug;
use notesort_core::{
    default_log_level, init_logging, init_stderr_logging, load_canvas_strict, read_target_list,
    FileRecord, NoteOutcome, SortMode, SortReport, SortService, SorterConfig, SyncService, Vault,
    VaultQuery,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "notesort")]
#[command(about = "Sync canvas boards with vault notes and sort notes around a center")]
#[command(version)]
struct Cli {
    /// TOML config file (defaults apply when omitted)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Absolute directory for rolling log files (stderr when omitted)
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error|off (stderr defaults to warn)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add/remove file nodes so the canvas mirrors the selected notes
    #[command(after_help = "\
Examples:
  notesort sync board.canvas --vault ~/vault --folder inbox
  notesort sync board.canvas --vault ~/vault --matching '#idea'
  notesort sync board.canvas --vault ~/vault --targets picks.txt")]
    Sync {
        /// Canvas file (created when missing)
        canvas: PathBuf,

        /// Vault root directory (not needed with --targets)
        #[arg(long, required_unless_present = "targets")]
        vault: Option<PathBuf>,

        /// Only notes under this vault-relative folder
        #[arg(long)]
        folder: Option<String>,

        /// Only notes whose content matches this regex
        #[arg(long, value_name = "REGEX")]
        matching: Option<String>,

        /// Read target paths from a list file instead of querying the vault
        #[arg(long, value_name = "FILE", conflicts_with_all = ["folder", "matching"])]
        targets: Option<PathBuf>,
    },

    /// Write distance/priority front matter for every note on the canvas
    #[command(after_help = "\
Exit code 3 means some canvas notes were not found in the vault; the rest
were still processed.")]
    Sort {
        /// Canvas file
        canvas: PathBuf,

        /// Vault root directory
        #[arg(long)]
        vault: PathBuf,

        /// Classify and print without touching notes
        #[arg(long)]
        dry_run: bool,
    },

    /// Print distance/quadrant of every note node as JSON
    Classify {
        /// Canvas file
        canvas: PathBuf,

        /// Use this node as center instead of the sentinel node
        #[arg(long, value_name = "ID")]
        center_id: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let logging = match cli.log_dir.as_deref() {
        Some(dir) => init_logging(
            cli.log_level.as_deref().unwrap_or(default_log_level()),
            dir,
        ),
        None => init_stderr_logging(cli.log_level.as_deref().unwrap_or("warn")),
    };
    if let Err(err) = logging {
        eprintln!("error: {err}");
        return ExitCode::from(EXIT_USAGE);
    }

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(code) => return ExitCode::from(code),
    };
    debug!("event=cli_start module=cli status=ok config={:?}", cli.config);

    let result = match cli.command {
        Commands::Sync {
            canvas,
            vault,
            folder,
            matching,
            targets,
        } => run_sync(config, &canvas, vault.as_deref(), folder, matching, targets),
        Commands::Sort {
            canvas,
            vault,
            dry_run,
        } => run_sort(config, &canvas, &vault, dry_run),
        Commands::Classify { canvas, center_id } => {
            run_classify(config, &canvas, center_id.as_deref())
        }
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

type CliResult = Result<u8, Box<dyn std::error::Error>>;

/// Config problems are usage errors.
fn load_config(path: Option<&Path>) -> Result<SorterConfig, u8> {
    SorterConfig::load_or_default(path).map_err(|err| {
        eprintln!("error: {err}");
        EXIT_USAGE
    })
}

/// A failed write outranks missing notes.
fn sort_exit_code(report: &SortReport) -> u8 {
    if report.failed().next().is_some() {
        EXIT_ERROR
    } else if report.missing().next().is_some() {
        EXIT_MISSING_RECORDS
    } else {
        EXIT_SUCCESS
    }
}

fn run_sync(
    config: SorterConfig,
    canvas: &Path,
    vault_root: Option<&Path>,
    folder: Option<String>,
    matching: Option<String>,
    targets: Option<PathBuf>,
) -> CliResult {
    let records: Vec<FileRecord> = match targets {
        Some(list) => read_target_list(list)?,
        None => {
            let vault_root = vault_root.ok_or("--vault is required unless --targets is given")?;
            let vault = Vault::open(vault_root)?;
            let mut query = VaultQuery::new(config.canvas.note_extension.as_str());
            if let Some(folder) = folder {
                query = query.in_folder(folder);
            }
            if let Some(pattern) = matching {
                query = query.matching(pattern.as_str())?;
            }
            vault.query(&query)?
        }
    };

    let mut service = SyncService::new(config);
    let report = service.sync_canvas(canvas, &records)?;
    println!(
        "synced {}: {} added, {} removed, {} nodes",
        report.canvas.display(),
        report.added.len(),
        report.removed.len(),
        report.total_nodes
    );
    Ok(EXIT_SUCCESS)
}

fn run_sort(config: SorterConfig, canvas: &Path, vault_root: &Path, dry_run: bool) -> CliResult {
    let vault = Vault::open(vault_root)?;
    let mode = if dry_run {
        SortMode::DryRun
    } else {
        SortMode::Apply
    };

    let service = SortService::new(config);
    let report = service.export_sort_data(canvas, &vault, mode)?;

    println!(
        "center: {}",
        report.center.as_deref().unwrap_or("origin (no sentinel node)")
    );
    for entry in &report.entries {
        let status = match &entry.outcome {
            NoteOutcome::Written => "written".to_string(),
            NoteOutcome::Skipped => "dry-run".to_string(),
            NoteOutcome::Missing => "missing".to_string(),
            NoteOutcome::Failed(message) => format!("failed: {message}"),
        };
        println!(
            "{}\tquadrant={}\tdistance={}\t{}",
            entry.path, entry.quadrant, entry.distance, status
        );
    }

    Ok(sort_exit_code(&report))
}

fn run_classify(config: SorterConfig, canvas: &Path, center_id: Option<&str>) -> CliResult {
    let document = load_canvas_strict(canvas)?;
    let service = SortService::new(config);
    let sorted = service.classify_document(&document, center_id)?;
    println!("{}", serde_json::to_string_pretty(&sorted)?);
    Ok(EXIT_SUCCESS)
}
