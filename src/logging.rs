//! Subscriber setup for the binary.
//!
//! Library code only emits `tracing` events. The binary builds one subscriber
//! per session and installs it with [`tracing::subscriber::with_default`].

use crate::config::LoggingConfig;
use chrono::{Local, NaiveDate};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;

const LOG_FILE_PREFIX: &str = "fractals_";
const LOG_FILE_SUFFIX: &str = ".log";
const LOG_DATE_FORMAT: &str = "%Y%m%d";

/// `TRACE`, `DEBUG`, `INFO`, `WARN`/`WARNING` or `ERROR`, any case.
/// Anything else is `INFO`.
#[must_use]
pub fn level_filter(level: &str) -> LevelFilter {
    match level.trim().to_ascii_uppercase().as_str() {
        "TRACE" => LevelFilter::TRACE,
        "DEBUG" => LevelFilter::DEBUG,
        "WARN" | "WARNING" => LevelFilter::WARN,
        "ERROR" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    }
}

#[must_use]
pub fn log_file_name(date: NaiveDate) -> String {
    format!("{LOG_FILE_PREFIX}{}{LOG_FILE_SUFFIX}", date.format(LOG_DATE_FORMAT))
}

fn log_file_date(file_name: &str) -> Option<NaiveDate> {
    let date = file_name
        .strip_prefix(LOG_FILE_PREFIX)?
        .strip_suffix(LOG_FILE_SUFFIX)?;
    NaiveDate::parse_from_str(date, LOG_DATE_FORMAT).ok()
}

/// Deletes daily log files dated more than `retention_days` before `today`.
/// Returns how many files were removed.
pub fn prune_old_logs(directory: &Path, retention_days: u32, today: NaiveDate) -> io::Result<usize> {
    let Some(cutoff) = today.checked_sub_days(chrono::Days::new(u64::from(retention_days))) else {
        return Ok(0);
    };

    let mut removed = 0;
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(date) = name.to_str().and_then(log_file_date) else {
            continue;
        };

        if date < cutoff {
            fs::remove_file(entry.path())?;
            removed += 1;
        }
    }

    Ok(removed)
}

fn open_log_file(directory: &Path, today: NaiveDate) -> io::Result<(File, PathBuf)> {
    fs::create_dir_all(directory)?;
    let path = directory.join(log_file_name(today));
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((file, path))
}

/// Stderr output plus, when enabled and writable, today's log file.
///
/// `RUST_LOG` overrides the configured level. Returns the log file path
/// when one was opened.
pub fn session_subscriber(
    config: &LoggingConfig,
    log_directory: &Path,
) -> (impl Subscriber + Send + Sync + 'static, Option<PathBuf>) {
    let filter = EnvFilter::builder()
        .with_default_directive(level_filter(&config.level).into())
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false);

    let today = Local::now().date_naive();
    let file = if config.enabled {
        if let Err(err) = fs::create_dir_all(log_directory)
            .and_then(|()| prune_old_logs(log_directory, config.retention_days, today))
        {
            eprintln!("log retention cleanup failed in {}: {err}", log_directory.display());
        }

        match open_log_file(log_directory, today) {
            Ok(opened) => Some(opened),
            Err(err) => {
                eprintln!("file logging disabled, cannot open log in {}: {err}", log_directory.display());
                None
            }
        }
    } else {
        None
    };

    let (file_layer, path) = match file {
        Some((file, path)) => (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false),
            ),
            Some(path),
        ),
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer);

    (subscriber, path)
}
