//! Report channel and shared per-run state for parallel search workers.

use crate::oracle::OracleError;
use crate::progress::{NoProgress, ProgressObserver, Throttle};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How a worker's walk over its block ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerReport {
    /// Every index in the block was tried without a match.
    Exhausted,
    /// The candidate unlocked the target.
    Found(String),
    /// Cancellation was observed after this many indices were tried.
    Interrupted(u64),
    /// The oracle failed for a reason other than a non-match.
    Failed(OracleError),
}

/// Message sent from a worker to the coordinator.
#[derive(Debug, Clone)]
pub struct WorkerMessage {
    pub worker_id: usize,
    pub report: WorkerReport,
}

/// State shared by every worker of one search run.
pub struct SearchContext {
    cancelled: AtomicBool,
    tried: AtomicU64,
    progress: Throttle,
}

impl SearchContext {
    pub fn new(initial_progress: u64, progress: Throttle) -> Self {
        Self {
            cancelled: AtomicBool::new(false),
            tried: AtomicU64::new(initial_progress),
            progress,
        }
    }

    /// Context with no progress output.
    pub fn silent() -> Self {
        Self::new(0, Throttle::new(Box::new(NoProgress), Duration::MAX))
    }

    pub fn with_observer(
        initial_progress: u64,
        observer: Box<dyn ProgressObserver>,
        interval: Duration,
    ) -> Self {
        Self::new(initial_progress, Throttle::new(observer, interval))
    }

    /// Check if workers should stop.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Ask every worker to stop at its next check.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Record one more failed attempt and offer a progress snapshot.
    pub fn record_attempt(&self, candidate: &str) {
        let tried = self.tried.fetch_add(1, Ordering::Relaxed) + 1;
        self.progress.offer(tried, candidate);
    }

    /// Cumulative attempts so far. Observability only.
    pub fn tried(&self) -> u64 {
        self.tried.load(Ordering::Relaxed)
    }

    pub fn finish_progress(&self) {
        self.progress.finish();
    }
}

/// Channel endpoints for a worker.
pub struct WorkerChannels {
    /// Send the final report to the coordinator.
    pub to_coordinator: Sender<WorkerMessage>,
    /// Shared cancellation flag and progress counter.
    pub context: Arc<SearchContext>,
}

/// Channel endpoints for the coordinator.
pub struct CoordinatorChannels {
    /// Receive reports from workers.
    pub from_workers: Receiver<WorkerMessage>,
    /// Shared state.
    pub context: Arc<SearchContext>,
}

/// Create channels for a search with the given number of workers.
pub fn create_channels(
    num_workers: usize,
    context: SearchContext,
) -> (CoordinatorChannels, Vec<WorkerChannels>) {
    let context = Arc::new(context);

    // Unbounded so a reporting worker never blocks on the coordinator.
    let (worker_tx, coordinator_rx) = unbounded();

    let worker_channels = (0..num_workers)
        .map(|_| WorkerChannels {
            to_coordinator: worker_tx.clone(),
            context: Arc::clone(&context),
        })
        .collect();

    let coordinator = CoordinatorChannels {
        from_workers: coordinator_rx,
        context,
    };

    (coordinator, worker_channels)
}
