//! Parallel search coordinator that manages worker threads.

use crate::error::{Result, SearchError};
use crate::oracle::{OracleError, Verifier};
use crate::progress::ProgressObserver;
use crate::search::parallel::channel::{
    create_channels, CoordinatorChannels, SearchContext, WorkerChannels, WorkerMessage,
    WorkerReport,
};
use crate::search::parallel::config::ParallelConfig;
use crate::search::parallel::worker::search_block;
use crate::search::partition::{partition, WorkBlock};
use crate::search::result::{SearchOutcome, SearchStatistics};
use crate::search::space::SearchSpace;
use crossbeam_channel::{never, select, Receiver};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Result from parallel search execution.
#[derive(Debug)]
pub struct ParallelResult {
    /// Found, not found, or where to resume.
    pub outcome: SearchOutcome,
    /// Statistics aggregated from all workers.
    pub statistics: SearchStatistics,
}

/// Coordinator lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Workers are searching; waiting on reports and the interrupt signal.
    Running,
    /// Interrupt received; the cancellation flag is about to be raised.
    Cancelling,
    /// Cancellation raised; collecting the remaining reports.
    Draining,
    /// An outcome is decided.
    Done,
}

/// Aggregated worker reports.
struct Tally {
    active: usize,
    resume_offset: u64,
    min_resume: Option<u64>,
    interrupted: usize,
    /// Workers that went away without a report.
    lost: usize,
    found: Option<String>,
    failure: Option<OracleError>,
}

impl Tally {
    fn new(active: usize, resume_offset: u64) -> Self {
        Self {
            active,
            resume_offset,
            min_resume: None,
            interrupted: 0,
            lost: 0,
            found: None,
            failure: None,
        }
    }

    /// Fold one report in. Returns true once the outcome is decided.
    fn record(&mut self, worker_id: usize, report: WorkerReport) -> bool {
        self.active = self.active.saturating_sub(1);
        match report {
            WorkerReport::Exhausted => {
                debug!(worker_id, "block exhausted");
            }
            WorkerReport::Found(candidate) => {
                debug!(worker_id, "match found");
                self.found = Some(candidate);
                return true;
            }
            WorkerReport::Interrupted(progress) => {
                debug!(worker_id, progress, "worker interrupted");
                let offset = progress.saturating_add(self.resume_offset);
                self.min_resume = Some(self.min_resume.map_or(offset, |m| m.min(offset)));
                self.interrupted += 1;
            }
            WorkerReport::Failed(e) => {
                error!(worker_id, error = %e, "verifier failed");
                self.failure = Some(e);
                return true;
            }
        }
        self.active == 0
    }

    /// Count the workers still owed a report as lost.
    fn abandon_active(&mut self) {
        if self.active > 0 {
            error!(missing = self.active, "workers stopped without reporting");
        }
        self.lost = self.lost.max(self.active);
        self.active = 0;
    }

    fn outcome(self) -> Result<SearchOutcome> {
        if let Some(e) = self.failure {
            return Err(SearchError::Oracle(e));
        }
        if let Some(candidate) = self.found {
            return Ok(SearchOutcome::Found(candidate));
        }
        // A lost worker leaves part of its block unsearched.
        if self.lost > 0 {
            return Err(SearchError::WorkerPanicked(self.lost));
        }
        Ok(match self.min_resume {
            Some(offset) => SearchOutcome::Resume(offset),
            None => SearchOutcome::NotFound,
        })
    }
}

/// Run a parallel search over the configured chunk of `space`.
///
/// Every worker thread has stopped by the time this returns, whatever the
/// outcome. A message on `interrupt` cancels the run and yields a resume offset.
pub fn run_parallel_search<V>(
    target: &str,
    space: &SearchSpace,
    verifier: Arc<V>,
    config: &ParallelConfig,
    observer: Box<dyn ProgressObserver>,
    interrupt: Receiver<()>,
) -> Result<ParallelResult>
where
    V: Verifier + ?Sized + 'static,
{
    let start_time = Instant::now();

    // Pre-flight checks; nothing runs if any of these fail.
    if target.trim().is_empty() {
        return Err(SearchError::EmptyTarget);
    }
    verifier.check_target(target)?;
    let blocks = partition(space, config)?;

    info!(
        workers = blocks.len(),
        space_size = space.size(),
        chunk = config.chunk,
        chunks = config.chunks,
        resume_offset = config.resume_offset,
        "starting search"
    );

    let initial_progress = config.initial_progress();
    let context = SearchContext::with_observer(initial_progress, observer, config.progress_interval);
    let (coordinator_channels, worker_channels) = create_channels(blocks.len(), context);
    let context = Arc::clone(&coordinator_channels.context);

    let target: Arc<str> = Arc::from(target);
    let space = Arc::new(space.clone());

    let mut handles = Vec::with_capacity(blocks.len());
    for (worker_id, (block, channels)) in blocks.into_iter().zip(worker_channels).enumerate() {
        match spawn_worker(
            worker_id,
            block,
            Arc::clone(&space),
            Arc::clone(&verifier),
            Arc::clone(&target),
            channels,
        ) {
            Ok(handle) => handles.push(handle),
            Err(e) => {
                context.cancel();
                join_workers(handles);
                context.finish_progress();
                return Err(SearchError::Spawn(e));
            }
        }
    }

    let mut tally = run_coordinator(coordinator_channels, handles.len(), config, interrupt);

    // Early success or failure leaves workers running until they see the flag.
    context.cancel();
    let panicked = join_workers(handles);
    context.finish_progress();
    tally.lost = tally.lost.max(panicked);

    let tried = context.tried();
    let statistics = SearchStatistics {
        elapsed_time: start_time.elapsed(),
        candidates_tried: tried.saturating_sub(initial_progress),
        cumulative_tried: tried,
        workers: config.num_workers,
        interrupted_workers: tally.interrupted,
    };
    let outcome = tally.outcome()?;
    info!(?outcome, tried = statistics.candidates_tried, "search finished");

    Ok(ParallelResult {
        outcome,
        statistics,
    })
}

fn spawn_worker<V>(
    worker_id: usize,
    block: WorkBlock,
    space: Arc<SearchSpace>,
    verifier: Arc<V>,
    target: Arc<str>,
    channels: WorkerChannels,
) -> std::io::Result<JoinHandle<()>>
where
    V: Verifier + ?Sized + 'static,
{
    std::thread::Builder::new()
        .name(format!("search-worker-{worker_id}"))
        .spawn(move || {
            debug!(worker_id, start = block.start, finish = block.finish, "worker started");
            let report = search_block(
                block,
                &space,
                verifier.as_ref(),
                &target,
                &channels.context,
            );
            let _ = channels
                .to_coordinator
                .send(WorkerMessage { worker_id, report });
        })
}

/// Join every handle and return how many threads panicked.
fn join_workers(handles: Vec<JoinHandle<()>>) -> usize {
    let mut panicked = 0;
    for handle in handles {
        if handle.join().is_err() {
            warn!("search worker panicked");
            panicked += 1;
        }
    }
    panicked
}

/// Coordinator loop that receives reports from workers and the interrupt signal.
fn run_coordinator(
    channels: CoordinatorChannels,
    num_workers: usize,
    config: &ParallelConfig,
    interrupt: Receiver<()>,
) -> Tally {
    let mut tally = Tally::new(num_workers, config.resume_offset);
    let mut phase = if num_workers == 0 {
        Phase::Done
    } else {
        Phase::Running
    };
    let closed = never();
    let mut interrupt_open = true;

    while phase != Phase::Done {
        if phase == Phase::Cancelling {
            channels.context.cancel();
            phase = Phase::Draining;
        }

        let interrupt_rx = if interrupt_open { &interrupt } else { &closed };
        select! {
            recv(channels.from_workers) -> msg => match msg {
                Ok(WorkerMessage { worker_id, report }) => {
                    if tally.record(worker_id, report) {
                        phase = Phase::Done;
                    }
                }
                // Every remaining worker hung up without reporting.
                Err(_) => {
                    tally.abandon_active();
                    phase = Phase::Done;
                }
            },
            recv(interrupt_rx) -> signal => match signal {
                Ok(()) => {
                    if phase == Phase::Running {
                        info!("interrupt received, stopping workers");
                        phase = Phase::Cancelling;
                    }
                }
                Err(_) => interrupt_open = false,
            },
        }
    }

    tally
}
