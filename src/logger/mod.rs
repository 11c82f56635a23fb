//! Logger module
//!
//! Provides logging utilities for the server including:
//! - The startup announcement
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

/// Write to access log
fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => eprintln!("{message}"),
    }
}

/// Announce the listening URL, the only line the server prints to stdout
pub fn log_server_start(url: &str) {
    println!("Serving at {url} (no-cache)");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Error responses sent to clients, one line per response
pub fn log_http_error(code: u16, message: &str) {
    write_error(&http_error_line(code, message));
}

fn http_error_line(code: u16, message: &str) -> String {
    format!("[WARN] code {code}, message {message}")
}

pub fn log_shutdown(reason: &str) {
    write_error(&format!("[INFO] {reason}, shutting down"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}
