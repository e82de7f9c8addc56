// file: src/utils/logging.rs
// description: tracing setup on stderr and colored status lines for terminal output

use colored::{ColoredString, Colorize};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Directive used when `RUST_LOG` is unset. Dependencies stay at `warn` so
/// HTTP and parser internals do not drown the ranking output.
fn default_directive(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("warn,resume_ranker={}", level)
}

/// Logs go to stderr; stdout carries only rankings and extracted text.
pub fn init_logger(colored_output: bool, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_line_number(verbose)
        .compact()
        .with_ansi(colored_output);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

#[derive(Debug, Clone, Copy)]
enum Status {
    Success,
    Error,
    Warning,
    Info,
}

fn status_line(status: Status, msg: &str) -> String {
    let (marker, body): (ColoredString, ColoredString) = match status {
        Status::Success => ("✓".green().bold(), msg.green()),
        Status::Error => ("✗".red().bold(), msg.red()),
        Status::Warning => ("⚠".yellow().bold(), msg.yellow()),
        Status::Info => ("ℹ".blue().bold(), msg.normal()),
    };
    format!("{} {}", marker, body)
}

pub fn format_success(msg: &str) -> String {
    status_line(Status::Success, msg)
}

pub fn format_error(msg: &str) -> String {
    status_line(Status::Error, msg)
}

pub fn format_warning(msg: &str) -> String {
    status_line(Status::Warning, msg)
}

pub fn format_info(msg: &str) -> String {
    status_line(Status::Info, msg)
}

/// Keyword highlight used by the resume preview.
pub fn format_keyword(word: &str) -> String {
    word.yellow().bold().to_string()
}
