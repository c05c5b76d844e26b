//! This module handles all output-related functionality.
//! It formats result, retry and summary lines, and defines the `Reporter` sink
//! the workers write through, along with its console implementation.

use crate::buster::Location;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::StatusCode;
use std::time::Duration;

/// Destination for everything the scan wants the operator to see.
///
/// Implementations must accept calls from many workers at once and must not
/// split a line.
pub trait Reporter: Send + Sync {
    /// A general log line (startup, read errors, summary).
    fn info(&self, line: &str);
    /// A retry notice. Deduplication happens before this is called.
    fn retry(&self, line: &str);
    /// A result line for a response that was not a 404.
    fn found(&self, status: StatusCode, line: &str);
    /// Called after each terminal probe with the running total.
    fn progress(&self, _tried: usize) {}
}

/// Writes timestamped lines to the terminal.
///
/// Results go to stdout; log lines and retry notices go to stderr.
pub struct ConsoleReporter {
    progress_bar: Option<ProgressBar>,
}

impl ConsoleReporter {
    pub fn new(show_progress: bool) -> Self {
        let progress_bar = show_progress.then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {pos} tried ({per_sec}) {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.enable_steady_tick(Duration::from_millis(120));
            pb.set_message("Scanning...");
            pb
        });
        Self { progress_bar }
    }

    /// Clears the spinner, if any. Call before printing the summary.
    pub fn finish(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.finish_and_clear();
        }
    }

    fn write(&self, line: String, to_stderr: bool) {
        let line = format!("{} {line}", timestamp().dimmed());
        let print = || {
            if to_stderr {
                eprintln!("{line}");
            } else {
                println!("{line}");
            }
        };
        match &self.progress_bar {
            Some(pb) => pb.suspend(print),
            None => print(),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn info(&self, line: &str) {
        self.write(line.to_string(), true);
    }

    fn retry(&self, line: &str) {
        self.write(line.yellow().to_string(), true);
    }

    fn found(&self, status: StatusCode, line: &str) {
        let line = if status.is_success() {
            line.green().bold()
        } else if status.is_redirection() {
            line.cyan()
        } else if status.is_client_error() {
            line.yellow()
        } else {
            line.red()
        };
        self.write(line.to_string(), false);
    }

    fn progress(&self, tried: usize) {
        if let Some(pb) = &self.progress_bar {
            pb.set_position(tried as u64);
        }
    }
}

/// Local time in `YYYY/MM/DD HH:MM:SS` form, used to prefix every line.
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y/%m/%d %H:%M:%S").to_string()
}

/// Formats the line reported for a non-404 response.
///
/// `final_url` is only shown when the transport followed redirects away from `url`.
pub fn format_report_line(
    url: &str,
    status: StatusCode,
    final_url: Option<&str>,
    location: Option<&Location>,
) -> String {
    let mut line = format!("[{status}] {url}");
    if let Some(final_url) = final_url {
        line.push_str(&format!(" -> {final_url}"));
    }
    if let Some(location) = location {
        line.push_str(&format!(" (Location: {location})"));
    }
    line
}

pub fn format_retry_notice(url: &str, wait: Duration, cause: &str) -> String {
    format!(
        "[Retry] {url} Retrying every {} ({cause})",
        format_duration(wait)
    )
}

pub fn format_summary(tried: usize, elapsed: Duration) -> String {
    let rounded = Duration::from_millis(((elapsed.as_nanos() + 500_000) / 1_000_000) as u64);
    format!("Tried {tried} URLs in {}", format_duration(rounded))
}

/// Formats a duration the way operators type them: `10s`, `1.5s`, `250ms`, `1m30s`.
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    match nanos {
        0 => "0s".to_string(),
        1..1_000 => format!("{nanos}ns"),
        1_000..1_000_000 => format!("{}µs", decimal(nanos, 1_000)),
        1_000_000..1_000_000_000 => format!("{}ms", decimal(nanos, 1_000_000)),
        _ => {
            let secs = d.as_secs();
            let (hours, minutes) = (secs / 3600, (secs % 3600) / 60);
            let rem = nanos % 60_000_000_000;
            let mut out = String::new();
            if hours > 0 {
                out.push_str(&format!("{hours}h"));
            }
            if hours > 0 || minutes > 0 {
                out.push_str(&format!("{minutes}m"));
            }
            out.push_str(&format!("{}s", decimal(rem, 1_000_000_000)));
            out
        }
    }
}

/// `value / unit` with the fractional part trimmed of trailing zeros.
fn decimal(value: u128, unit: u128) -> String {
    let (whole, frac) = (value / unit, value % unit);
    if frac == 0 {
        return whole.to_string();
    }
    let width = unit.to_string().len() - 1;
    let frac = format!("{frac:0width$}");
    format!("{whole}.{}", frac.trim_end_matches('0'))
}
