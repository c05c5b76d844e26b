//! This is the main entry point for the httpbrute application.
//! It validates the command line, starts the worker pool, streams the wordlist
//! into it, and prints a summary once every candidate has been tried.
//! Ctrl+C cancels pending probes and retry waits; a second Ctrl+C exits at once.

use clap::Parser;
use httpbrute::args::Args;
use httpbrute::buster::{FetchSettings, ProbeConfig, ProgressCounter, ReqwestFetcher};
use httpbrute::error::ConfigError;
use httpbrute::output::{self, ConsoleReporter, Reporter};
use httpbrute::pool::{PoolContext, WorkerPool};
use httpbrute::{generator, logging, parser};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> ExitCode {
    let start = Instant::now();
    let args = Args::parse();
    logging::initialize(args.verbose);

    match run(args, start).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", output::timestamp());
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args, start: Instant) -> Result<(), ConfigError> {
    let suffixes = parser::parse_suffix_list(&args.suffix);
    let target = args
        .target
        .filter(|target| !target.is_empty())
        .ok_or(ConfigError::MissingTarget)?;
    let wordlist_path = args
        .wordlist
        .filter(|path| !path.is_empty())
        .ok_or(ConfigError::MissingWordlist)?;
    let wordlist = parser::open_wordlist(&wordlist_path).await?;

    let parallel = usize::from(args.parallel);
    let fetcher = ReqwestFetcher::new(&FetchSettings {
        request_timeout: args.request_timeout,
        parallel,
    })?;
    let console = Arc::new(ConsoleReporter::new(args.progress));
    let counter = Arc::new(ProgressCounter::new());
    let shutdown = CancellationToken::new();

    // Handle Ctrl+C for graceful shutdown
    let signal_shutdown = shutdown.clone();
    let signal_console = console.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            signal_console.info("Received Ctrl+C, stopping scan...");
            signal_shutdown.cancel();
        }
        if signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });

    let (tx, rx) = mpsc::unbounded_channel();
    let pool = WorkerPool::spawn(
        parallel,
        rx,
        PoolContext {
            fetcher: Arc::new(fetcher),
            config: Arc::new(ProbeConfig {
                retry_wait: args.timeout_wait,
                log_retries: !args.quiet_retries,
            }),
            counter: counter.clone(),
            reporter: console.clone(),
            shutdown: shutdown.clone(),
        },
    );

    let base = parser::normalize_target(&target);
    console.info(&format!("Target: {base}"));
    console.info(&format!("Suffixes: {suffixes:?}"));

    tokio::select! {
        result = generator::dispatch(wordlist.reader, &base, &suffixes, &tx) => match result {
            Ok(sent) => log::debug!("dispatched {sent} candidate URLs"),
            Err(err) => console.info(&format!("Error reading wordlist {}: {err}", wordlist.name)),
        },
        _ = shutdown.cancelled() => log::debug!("wordlist reading interrupted"),
    }

    drop(tx);
    pool.join().await;
    console.finish();
    console.info(&output::format_summary(counter.total(), start.elapsed()));
    Ok(())
}
