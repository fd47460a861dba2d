//! Logger module
//!
//! Provides logging utilities for the edge server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Leveled error, warning, info and debug logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use chrono::Local;
use std::net::SocketAddr;

/// Severity of a log line, ordered from most to least severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    /// Parse a configured level name
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" | "trace" => Some(Self::Debug),
            _ => None,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }
}

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    let level = LogLevel::parse(&config.logging.level).unwrap_or(LogLevel::Info);
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
        level,
    )
}

fn write(level: LogLevel, message: &str) {
    let line = format!(
        "{} [{}] {message}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        level.label()
    );
    match writer::get() {
        Some(w) => w.write_leveled(level, &line),
        // Before init: errors and warnings to stderr, debug dropped
        None => match level {
            LogLevel::Error | LogLevel::Warn => eprintln!("{line}"),
            LogLevel::Info => println!("{line}"),
            LogLevel::Debug => {}
        },
    }
}

pub fn log_error(message: &str) {
    write(LogLevel::Error, message);
}

pub fn log_warning(message: &str) {
    write(LogLevel::Warn, message);
}

pub fn log_info(message: &str) {
    write(LogLevel::Info, message);
}

pub fn log_debug(message: &str) {
    write(LogLevel::Debug, message);
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    let line = entry.format(format);
    match writer::get() {
        Some(w) => w.write_access(&line),
        None => println!("{line}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, storage: &str) {
    log_info("======================================");
    log_info("Edge server started successfully");
    log_info(&format!("Listening on: http://{addr}"));
    log_info(&format!("Serving: {storage}"));
    log_info(&format!("Root document: {}", config.storage.root_document));
    log_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        log_info(&format!("Worker threads: {workers}"));
    }
    if let Some(max) = config.performance.max_connections {
        log_info(&format!("Max connections: {max}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        log_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        log_info(&format!("Error log: {path}"));
    }
    log_info("======================================");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    log_debug(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    log_error(&format!("[Connection] Failed to serve connection: {err}"));
}

pub fn log_shutdown_started(in_flight: usize, grace_secs: u64) {
    log_info(&format!(
        "[Shutdown] Stopped accepting, waiting up to {grace_secs}s for {in_flight} connection(s)"
    ));
}

pub fn log_shutdown_complete(remaining: usize) {
    if remaining == 0 {
        log_info("[Shutdown] All connections closed");
    } else {
        log_warning(&format!(
            "[Shutdown] Grace period elapsed with {remaining} connection(s) still open"
        ));
    }
}
