//! Tracing setup shared by the server and the batch driver.
//!
//! Each binary chooses its console stream and gets its own log file, `logs/<app>.log`, unless
//! `REVIEWLENS_LOG_FILE` names one. `review-batch` writes preview tables to stdout, so it logs to
//! stderr to keep the two apart.
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, fmt::writer::BoxMakeWriter, prelude::*};

/// Environment variable overriding the log file path for every binary.
pub const LOG_FILE_ENV: &str = "REVIEWLENS_LOG_FILE";

const LOG_DIR: &str = "logs";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Stream receiving human-readable log lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleTarget {
    /// Standard output; used by the HTTP server.
    Stdout,
    /// Standard error; used when stdout carries program output.
    Stderr,
}

impl ConsoleTarget {
    fn make_writer(self) -> BoxMakeWriter {
        match self {
            Self::Stdout => BoxMakeWriter::new(std::io::stdout),
            Self::Stderr => BoxMakeWriter::new(std::io::stderr),
        }
    }
}

/// Install the global subscriber for the binary named `app`.
///
/// `RUST_LOG` filters both layers and defaults to `info`. A log file that cannot be opened is
/// reported on stderr and skipped.
pub fn init_tracing(app: &str, console: ConsoleTarget) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console_layer = fmt::layer()
        .with_writer(console.make_writer())
        .with_target(false)
        .compact();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    let path = log_file_path(std::env::var(LOG_FILE_ENV).ok(), app);
    match open_log_file(&path) {
        Ok(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let _ = LOG_GUARD.set(guard);
            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .compact();
            registry.with(file_layer).init();
        }
        Err(err) => {
            eprintln!("Failed to open log file {}: {err}", path.display());
            registry.init();
        }
    }
}

/// Resolve where `app` writes its log file. A non-blank override wins.
pub fn log_file_path(override_path: Option<String>, app: &str) -> PathBuf {
    match override_path {
        Some(path) if !path.trim().is_empty() => PathBuf::from(path.trim()),
        _ => Path::new(LOG_DIR).join(format!("{app}.log")),
    }
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
