//! Tracing subscriber setup for the inframan CLI.
//!
//! Configured entirely through environment variables so wrapped-tool output
//! stays clean by default:
//!
//! - `LOG_LEVEL`  — filter directive when `RUST_LOG` is unset (default `info`)
//! - `LOG_FORMAT` — `human` (default) or `json`
//! - `LOG_OUTPUT` — `console` (default) or `file`
//! - `LOG_FILE_PATH` — file target (default `/tmp/inframan.log`)

use std::env;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{prelude::*, registry, EnvFilter};

/// Initializes the global tracing subscriber based on environment variables.
///
/// Returns the worker guard for the non-blocking file writer when file
/// output is selected; the caller must keep it alive for the process
/// lifetime or buffered log lines are lost.
pub fn init_subscriber() -> Option<WorkerGuard> {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_output = env::var("LOG_OUTPUT").unwrap_or_else(|_| "console".to_string());
    let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "human".to_string());
    let log_file_path =
        env::var("LOG_FILE_PATH").unwrap_or_else(|_| "/tmp/inframan.log".to_string());

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));

    let is_json = log_format == "json";
    let subscriber = registry().with(env_filter);

    if log_output == "file" {
        let log_path = Path::new(&log_file_path);
        let log_dir = log_path.parent().unwrap_or_else(|| Path::new("/tmp"));
        let log_filename = log_path.file_name().unwrap_or("inframan.log".as_ref());

        let file_appender = tracing_appender::rolling::daily(log_dir, log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let fmt_layer = tracing_subscriber::fmt::layer().with_writer(non_blocking);
        if is_json {
            subscriber.with(fmt_layer.json()).init();
        } else {
            subscriber.with(fmt_layer).init();
        }
        Some(guard)
    } else {
        // Logs go to stderr; stdout is reserved for command output and the
        // wrapped tools' own streams.
        let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        if is_json {
            subscriber.with(fmt_layer.json()).init();
        } else {
            subscriber.with(fmt_layer).init();
        }
        None
    }
}
