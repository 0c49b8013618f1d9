//! Logging bootstrap.
//!
//! # Responsibility
//! - Start the `log` backend once per process: rolling files under a
//!   directory for long runs, or stderr for one-shot CLI calls.
//! - Route panics through the logger as single-line `error` events.
//!
//! # Invariants
//! - Repeating initialization with the same level and target is a no-op.
//! - A second call with a different level or target is an error.
//! - Nothing here panics.

use flexi_logger::{
    Cleanup, Criterion, FileSpec, LogSpecification, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Once;

const LOG_FILE_BASENAME: &str = "notesort";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 5;
const PANIC_TEXT_LIMIT: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: Once = Once::new();

/// Where log records go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Rolling files under an absolute directory.
    Directory(PathBuf),
}

impl Display for LogTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stderr => f.write_str("stderr"),
            Self::Directory(dir) => write!(f, "{}", dir.display()),
        }
    }
}

struct ActiveLogger {
    level: LevelFilter,
    target: LogTarget,
    _handle: LoggerHandle,
}

/// Starts file logging under `log_dir`.
///
/// # Errors
/// - `level` is not a known level name.
/// - `log_dir` is blank, relative, or cannot be created.
/// - Logging already runs with a different level or target.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    init_logging_to(level, LogTarget::Directory(absolute_log_dir(log_dir)?))
}

/// Starts stderr logging.
pub fn init_stderr_logging(level: &str) -> Result<(), String> {
    init_logging_to(level, LogTarget::Stderr)
}

pub fn init_logging_to(level: &str, target: LogTarget) -> Result<(), String> {
    let level = parse_level(level)?;
    let active = ACTIVE.get_or_try_init(|| start(level, &target))?;

    if active.target != target {
        return Err(format!(
            "logging already writes to `{}`; refusing to switch to `{target}`",
            active.target
        ));
    }
    if active.level != level {
        return Err(format!(
            "logging already runs at `{}`; refusing to switch to `{level}`",
            active.level
        ));
    }
    Ok(())
}

/// Active level and target, if logging was started.
pub fn logging_status() -> Option<(LevelFilter, LogTarget)> {
    ACTIVE
        .get()
        .map(|active| (active.level, active.target.clone()))
}

/// Level used for file logging when none is given.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start(level: LevelFilter, target: &LogTarget) -> Result<ActiveLogger, String> {
    let spec = LogSpecification::builder().default(level).build();
    let logger = Logger::with(spec);

    let logger = match target {
        LogTarget::Stderr => logger.log_to_stderr().format(flexi_logger::default_format),
        LogTarget::Directory(dir) => {
            std::fs::create_dir_all(dir)
                .map_err(|err| format!("cannot create log directory `{}`: {err}", dir.display()))?;
            let files = FileSpec::default()
                .directory(dir.as_path())
                .basename(LOG_FILE_BASENAME);
            logger
                .log_to_file(files)
                .rotate(
                    Criterion::Size(ROTATE_AT_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
                )
                .write_mode(WriteMode::BufferAndFlush)
                .append()
                .format_for_files(flexi_logger::detailed_format)
        }
    };

    let handle = logger
        .start()
        .map_err(|err| format!("logger did not start: {err}"))?;
    PANIC_HOOK.call_once(install_panic_hook);

    info!(
        "event=logging_init module=logging status=ok level={level} target={target} version={}",
        env!("CARGO_PKG_VERSION")
    );
    Ok(ActiveLogger {
        level,
        target: target.clone(),
        _handle: handle,
    })
}

fn parse_level(level: &str) -> Result<LevelFilter, String> {
    let trimmed = level.trim();
    if trimmed.eq_ignore_ascii_case("warning") {
        return Ok(LevelFilter::Warn);
    }
    trimmed
        .parse::<LevelFilter>()
        .map_err(|_| format!("unknown log level `{trimmed}`; use trace|debug|info|warn|error|off"))
}

fn absolute_log_dir(log_dir: &str) -> Result<PathBuf, String> {
    let path = Path::new(log_dir.trim());
    if path.as_os_str().is_empty() {
        return Err("log directory is empty".to_string());
    }
    if path.is_relative() {
        return Err(format!(
            "log directory must be an absolute path, got `{}`",
            path.display()
        ));
    }
    Ok(path.to_path_buf())
}

fn install_panic_hook() {
    let chained = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let at = panic.location().map_or_else(
            || "unknown".to_string(),
            |location| format!("{}:{}", location.file(), location.line()),
        );
        error!(
            "event=panic module=logging status=error at={at} message={}",
            one_line(&panic_text(panic.payload()), PANIC_TEXT_LIMIT)
        );
        chained(panic);
    }));
}

fn panic_text(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|text| text.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "<non-text payload>".to_string())
}

// Note text can reach panic messages; keep it to one bounded line.
fn one_line(text: &str, limit: usize) -> String {
    let mut chars = text
        .chars()
        .map(|ch| if ch == '\n' || ch == '\r' { ' ' } else { ch });
    let mut line: String = chars.by_ref().take(limit).collect();
    if chars.next().is_some() {
        line.push_str("...");
    }
    line
}
