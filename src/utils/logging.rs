// file: src/utils/logging.rs
// description: Tracing subscriber initialization and colored CLI status lines

use crate::models::sync_result::SyncStatus;
use colored::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// `RUST_LOG` wins over the verbosity flag when set.
pub fn init_logger(colored_output: bool, verbose: bool) -> Result<(), TryInitError> {
    let level = if verbose { "kova_sync=debug,info" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact()
        .with_ansi(colored_output);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
}

pub fn format_success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg.green())
}

pub fn format_error(msg: &str) -> String {
    format!("{} {}", "✗".red().bold(), msg.red())
}

pub fn format_warning(msg: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), msg.yellow())
}

pub fn format_info(msg: &str) -> String {
    format!("{} {}", "ℹ".blue().bold(), msg)
}

pub fn format_step(step: usize, total: usize, msg: &str) -> String {
    format!("{} {}", format!("[{}/{}]", step, total).cyan().bold(), msg)
}

pub fn format_status(status: SyncStatus, msg: &str) -> String {
    match status {
        SyncStatus::Success => format_success(msg),
        SyncStatus::NotFound => format_warning(msg),
        SyncStatus::Error => format_error(msg),
    }
}
