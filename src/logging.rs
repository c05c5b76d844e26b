//! Diagnostic logging initialization.
//!
//! Operator-facing lines go through [`crate::output::Reporter`]; this logger
//! only carries worker and channel diagnostics to stderr.

use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Installs a stderr terminal logger. `verbose` raises the level to debug.
pub fn initialize(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .add_filter_allow_str("httpbrute")
        .build();

    // A logger may already be installed, e.g. by a test harness.
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}
