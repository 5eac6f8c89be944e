//! Configuration for parallel search execution.

use std::time::Duration;

/// Configuration for parallel search execution.
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Number of worker threads to spawn.
    pub num_workers: usize,
    /// Zero-based chunk of the space this invocation covers.
    pub chunk: u64,
    /// Number of chunks the space is split into.
    pub chunks: u64,
    /// Indices each worker skips at the start of its block.
    pub resume_offset: u64,
    /// Minimum time between two progress reports.
    pub progress_interval: Duration,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get(),
            chunk: 0,
            chunks: 1,
            resume_offset: 0,
            progress_interval: Duration::from_millis(250),
        }
    }
}

impl ParallelConfig {
    /// Create a new parallel config with the specified number of workers.
    pub fn with_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers.max(1);
        self
    }

    /// Set the worker count from an Option, keeping the CPU count on None.
    pub fn with_workers_option(self, num_workers: Option<usize>) -> Self {
        match num_workers {
            Some(n) => self.with_workers(n),
            None => self,
        }
    }

    /// Restrict the search to chunk `chunk` of `chunks`.
    pub fn with_chunk(mut self, chunk: u64, chunks: u64) -> Self {
        self.chunk = chunk;
        self.chunks = chunks;
        self
    }

    /// Continue an interrupted run from the reported offset.
    pub fn with_resume_offset(mut self, offset: u64) -> Self {
        self.resume_offset = offset;
        self
    }

    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Initial value of the cumulative progress counter.
    ///
    /// A resumed run counts the prefix every worker skipped.
    pub fn initial_progress(&self) -> u64 {
        self.resume_offset.saturating_mul(self.num_workers as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ParallelConfig::default();
        assert!(config.num_workers >= 1);
        assert_eq!(config.chunk, 0);
        assert_eq!(config.chunks, 1);
        assert_eq!(config.resume_offset, 0);
        assert_eq!(config.initial_progress(), 0);
    }

    #[test]
    fn test_config_builder() {
        let config = ParallelConfig::default()
            .with_workers(4)
            .with_chunk(2, 8)
            .with_resume_offset(100)
            .with_progress_interval(Duration::from_secs(1));

        assert_eq!(config.num_workers, 4);
        assert_eq!((config.chunk, config.chunks), (2, 8));
        assert_eq!(config.resume_offset, 100);
        assert_eq!(config.progress_interval, Duration::from_secs(1));
        assert_eq!(config.initial_progress(), 400);
    }

    #[test]
    fn test_minimum_workers() {
        let config = ParallelConfig::default().with_workers(0);
        assert_eq!(config.num_workers, 1);
    }

    #[test]
    fn test_workers_option() {
        let default_workers = ParallelConfig::default().num_workers;
        assert_eq!(
            ParallelConfig::default().with_workers_option(None).num_workers,
            default_workers
        );
        assert_eq!(
            ParallelConfig::default()
                .with_workers_option(Some(3))
                .num_workers,
            3
        );
    }
}
