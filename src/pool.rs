//! The fixed-size worker pool that drains the dispatch channel.

use crate::buster::{Fetcher, ProbeConfig, ProgressCounter, probe_url};
use crate::output::Reporter;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Everything a worker shares with its siblings.
#[derive(Clone)]
pub struct PoolContext {
    pub fetcher: Arc<dyn Fetcher>,
    pub config: Arc<ProbeConfig>,
    pub counter: Arc<ProgressCounter>,
    pub reporter: Arc<dyn Reporter>,
    pub shutdown: CancellationToken,
}

/// Workers competing for URLs on one shared receiver.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Starts `size` workers. The pool drains `rx` until it is closed and empty.
    pub fn spawn(size: usize, rx: UnboundedReceiver<String>, ctx: PoolContext) -> Self {
        let rx = Arc::new(Mutex::new(rx));
        let handles = (0..size)
            .map(|id| tokio::spawn(worker(id, rx.clone(), ctx.clone())))
            .collect();
        Self { handles }
    }

    /// Waits for every worker to exit.
    pub async fn join(self) {
        for result in join_all(self.handles).await {
            if let Err(err) = result {
                log::error!("worker task failed: {err}");
            }
        }
    }
}

async fn worker(id: usize, rx: Arc<Mutex<UnboundedReceiver<String>>>, ctx: PoolContext) {
    log::debug!("worker {id} started");
    loop {
        let next = {
            let mut rx = rx.lock().await;
            tokio::select! {
                biased;
                _ = ctx.shutdown.cancelled() => None,
                url = rx.recv() => url,
            }
        };
        let Some(url) = next else {
            break;
        };

        let end = probe_url(
            &url,
            ctx.fetcher.as_ref(),
            &ctx.config,
            ctx.reporter.as_ref(),
            &ctx.shutdown,
        )
        .await;
        if !end.is_terminal() {
            log::debug!("worker {id} abandoned {url}");
            break;
        }
        let tried = ctx.counter.record();
        ctx.reporter.progress(tried);
    }
    log::debug!("worker {id} finished");
}
