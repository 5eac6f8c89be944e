//! Throttled progress reporting, kept off the workers' hot path.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Receives progress snapshots: cumulative attempts and the latest candidate tried.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, tried: u64, latest: &str);

    /// Called once when the search has produced its outcome.
    fn finish(&self) {}
}

/// Discards all progress.
#[derive(Debug, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&self, _tried: u64, _latest: &str) {}
}

/// Terminal progress bar on stderr.
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    /// `total` is the number of attempts the run will make if nothing matches.
    pub fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec}) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░-"),
        );
        Self { bar }
    }
}

impl ProgressObserver for BarProgress {
    fn on_progress(&self, tried: u64, latest: &str) {
        self.bar.set_position(tried);
        self.bar.set_message(format!("latest guess: {latest}"));
    }

    fn finish(&self) {
        self.bar.abandon();
    }
}

const NEVER: u64 = u64::MAX;

fn as_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Forwards at most one snapshot per interval to the wrapped observer.
///
/// Any worker may offer a snapshot; the first one past the interval wins a
/// compare-exchange on the last-report timestamp, everyone else returns at once.
pub struct Throttle {
    observer: Box<dyn ProgressObserver>,
    interval_ms: u64,
    epoch: Instant,
    last_ms: AtomicU64,
}

impl Throttle {
    pub fn new(observer: Box<dyn ProgressObserver>, interval: Duration) -> Self {
        Self {
            observer,
            interval_ms: as_millis(interval),
            epoch: Instant::now(),
            last_ms: AtomicU64::new(NEVER),
        }
    }

    /// Offer a snapshot. Returns true if it was forwarded.
    pub fn offer(&self, tried: u64, latest: &str) -> bool {
        let now = as_millis(self.epoch.elapsed());
        let last = self.last_ms.load(Ordering::Relaxed);
        if last != NEVER && now.saturating_sub(last) < self.interval_ms {
            return false;
        }
        if self
            .last_ms
            .compare_exchange(last, now, Ordering::Relaxed, Ordering::Relaxed)
            .is_err()
        {
            return false;
        }
        self.observer.on_progress(tried, latest);
        true
    }

    pub fn finish(&self) {
        self.observer.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder(Arc<Mutex<Vec<(u64, String)>>>);

    impl ProgressObserver for Recorder {
        fn on_progress(&self, tried: u64, latest: &str) {
            self.0.lock().unwrap().push((tried, latest.to_string()));
        }
    }

    #[test]
    fn test_first_snapshot_always_passes() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let throttle = Throttle::new(
            Box::new(Recorder(Arc::clone(&seen))),
            Duration::from_secs(3600),
        );

        assert!(throttle.offer(1, "a"));
        assert!(!throttle.offer(2, "b"));
        assert!(!throttle.offer(3, "c"));
        assert_eq!(*seen.lock().unwrap(), vec![(1, "a".to_string())]);
    }

    #[test]
    fn test_zero_interval_forwards_everything() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let throttle = Throttle::new(Box::new(Recorder(Arc::clone(&seen))), Duration::ZERO);

        for i in 0..5 {
            throttle.offer(i, "x");
        }
        assert_eq!(seen.lock().unwrap().len(), 5);
    }

    #[test]
    fn test_interval_elapses() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let throttle = Throttle::new(
            Box::new(Recorder(Arc::clone(&seen))),
            Duration::from_millis(20),
        );

        assert!(throttle.offer(1, "a"));
        std::thread::sleep(Duration::from_millis(40));
        assert!(throttle.offer(2, "b"));
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_millis_saturate() {
        assert_eq!(as_millis(Duration::from_millis(250)), 250);
        assert_eq!(as_millis(Duration::MAX), u64::MAX);
    }
}
