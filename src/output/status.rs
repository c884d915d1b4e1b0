//! Status reporting.
//!
//! Components receive a `&dyn StatusReporter` instead of writing to the
//! terminal themselves, so tests can capture every line.

use colored::Colorize;
use std::sync::Mutex;

use super::banner::{center, service_title, BANNER_WIDTH, USAGE_LINES};

/// Category of a console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Action,
    Success,
    Warn,
    Error,
    Header,
    Usage,
    Plain,
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StatusKind::Info => "info",
            StatusKind::Action => "action",
            StatusKind::Success => "success",
            StatusKind::Warn => "warn",
            StatusKind::Error => "error",
            StatusKind::Header => "header",
            StatusKind::Usage => "usage",
            StatusKind::Plain => "plain",
        };
        write!(f, "{s}")
    }
}

pub trait StatusReporter: Send + Sync {
    /// Emit one line of the given kind.
    fn line(&self, kind: StatusKind, msg: &str);

    fn info(&self, msg: &str) {
        self.line(StatusKind::Info, msg)
    }

    fn action(&self, msg: &str) {
        self.line(StatusKind::Action, msg)
    }

    fn success(&self, msg: &str) {
        self.line(StatusKind::Success, msg)
    }

    fn warn(&self, msg: &str) {
        self.line(StatusKind::Warn, msg)
    }

    fn error(&self, msg: &str) {
        self.line(StatusKind::Error, msg)
    }

    /// Uncategorized text, e.g. menu entries.
    fn plain(&self, msg: &str) {
        self.line(StatusKind::Plain, msg)
    }

    /// Banner for the selected service.
    fn header(&self, service: &str) {
        self.line(StatusKind::Header, service_title(service))
    }

    fn usage(&self) {
        for usage in USAGE_LINES {
            self.line(StatusKind::Usage, usage)
        }
    }
}

/// Colored stdout reporter. The only place terminal styling is applied.
#[derive(Debug, Default)]
pub struct ConsoleStatus;

impl ConsoleStatus {
    pub fn new() -> Self {
        ConsoleStatus
    }
}

impl StatusReporter for ConsoleStatus {
    fn line(&self, kind: StatusKind, msg: &str) {
        if kind != StatusKind::Plain {
            log::info!("[{kind}] {msg}");
        }
        match kind {
            StatusKind::Info => println!("{}", format!("ℹ️  {msg}").cyan()),
            StatusKind::Action => println!("{}", format!("🚀 {msg}").magenta()),
            StatusKind::Success => println!("{}", format!("✅ {msg}").green()),
            StatusKind::Warn => println!("{}", format!("⚠️  {msg}").yellow()),
            StatusKind::Error => println!("{}", format!("❌ {msg}").red()),
            StatusKind::Plain => println!("{msg}"),
            StatusKind::Usage => println!("  {}", msg.green()),
            StatusKind::Header => {
                let divider = "═".repeat(BANNER_WIDTH);
                println!();
                println!("{}", divider.cyan());
                println!("{}", center(msg, BANNER_WIDTH).cyan().bold());
                println!("{}", divider.cyan());
                println!();
            }
        }
    }

    fn usage(&self) {
        println!("{}", "Usage (non-interactive):".yellow());
        for usage in USAGE_LINES {
            self.line(StatusKind::Usage, usage);
        }
        println!();
        println!(
            "{}",
            "Run without args when interactive mode is ON in config.".bright_black()
        );
    }
}

/// Captures every line in order; used by tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingStatus {
    lines: Mutex<Vec<(StatusKind, String)>>,
}

impl RecordingStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(StatusKind, String)> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Messages of one kind, in emission order.
    pub fn of_kind(&self, kind: StatusKind) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, m)| m)
            .collect()
    }

    pub fn contains(&self, kind: StatusKind, needle: &str) -> bool {
        self.of_kind(kind).iter().any(|m| m.contains(needle))
    }
}

impl StatusReporter for RecordingStatus {
    fn line(&self, kind: StatusKind, msg: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((kind, msg.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_keeps_order_and_kind() {
        let status = RecordingStatus::new();
        status.info("checking");
        status.action("creating");
        status.success("done");
        assert_eq!(
            status.lines(),
            vec![
                (StatusKind::Info, "checking".to_string()),
                (StatusKind::Action, "creating".to_string()),
                (StatusKind::Success, "done".to_string()),
            ]
        );
    }

    #[test]
    fn test_recording_header_and_usage() {
        let status = RecordingStatus::new();
        status.header("model");
        status.usage();
        assert_eq!(status.of_kind(StatusKind::Header), vec!["Model Deployment Service"]);
        assert_eq!(status.of_kind(StatusKind::Usage).len(), USAGE_LINES.len());
        assert!(status.contains(StatusKind::Usage, "resource delete"));
    }
}
