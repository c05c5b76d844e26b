//! This module defines the command-line arguments for the application.
//! It uses the `clap` crate to parse and validate user input.

use crate::parser::parse_duration;
use clap::Parser;
use std::time::Duration;

/// Brute-forces paths on the given target.
///
/// If a connection error, timeout or empty reply occurs during a request,
/// the request is repeated at a fixed interval until it completes.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Target URL. Trailing slashes are normalized to exactly one.
    #[arg(short, long, value_name = "URL")]
    pub target: Option<String>,

    /// Optional comma-separated list of suffixes (e.g. .php,.txt,).
    #[arg(short, long, value_name = "LIST", default_value = "")]
    pub suffix: String,

    /// Wordlist file, one path segment per line. Use - for standard input.
    #[arg(short, long, value_name = "FILE")]
    pub wordlist: Option<String>,

    /// Number of paths to attempt in parallel.
    #[arg(
        short,
        long,
        value_name = "N",
        default_value_t = 4,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub parallel: u16,

    /// Wait before retrying a URL after a connection error or timeout (e.g. 500ms, 10s, 1m30s).
    #[arg(long, value_name = "DURATION", default_value = "10s", value_parser = parse_duration)]
    pub timeout_wait: Duration,

    /// Don't log when a URL is retried.
    #[arg(long)]
    pub quiet_retries: bool,

    /// Give up on a single request after this long. Unset means no limit.
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub request_timeout: Option<Duration>,

    /// Show a spinner with the number of URLs tried so far.
    #[arg(long)]
    pub progress: bool,

    /// Print debug diagnostics to standard error.
    #[arg(short, long)]
    pub verbose: bool,
}
