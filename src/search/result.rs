//! Search outcome and statistics

use std::time::Duration;

/// Final outcome of one search invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A candidate unlocked the target.
    Found(String),
    /// Every candidate in the chunk was tried without a match.
    NotFound,
    /// The run was interrupted; rerun with this resume offset to continue.
    Resume(u64),
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    /// The single line reported to the operator for this outcome.
    pub fn terminal_line(&self, target: &str) -> String {
        match self {
            SearchOutcome::Found(candidate) => {
                format!("found: {} (credential: {})", candidate, target)
            }
            SearchOutcome::NotFound => "not found".to_string(),
            SearchOutcome::Resume(offset) => {
                format!("interrupted — resume from offset {}", offset)
            }
        }
    }
}

/// Statistics from a search operation
#[derive(Debug, Clone, Default)]
pub struct SearchStatistics {
    /// Total time spent searching
    pub elapsed_time: Duration,
    /// Oracle calls that did not match during this run
    pub candidates_tried: u64,
    /// Cumulative counter including the prefix skipped by a resume
    pub cumulative_tried: u64,
    /// Number of workers spawned
    pub workers: usize,
    /// Workers that stopped because of cancellation
    pub interrupted_workers: usize,
}

impl SearchStatistics {
    /// Get candidates tried per second
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.candidates_tried as f64 / secs
        }
    }

    /// Format statistics as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Time: {:.2?}\n", self.elapsed_time));
        s.push_str(&format!("Workers: {}\n", self.workers));
        s.push_str(&format!("Candidates tried: {}\n", self.candidates_tried));
        if self.cumulative_tried != self.candidates_tried {
            s.push_str(&format!(
                "Cumulative (with resumed prefix): {}\n",
                self.cumulative_tried
            ));
        }
        s.push_str(&format!(
            "Throughput: {:.0} candidates/sec\n",
            self.throughput()
        ));
        if self.interrupted_workers > 0 {
            s.push_str(&format!(
                "Interrupted workers: {}\n",
                self.interrupted_workers
            ));
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_lines() {
        assert_eq!(SearchOutcome::NotFound.terminal_line("abc"), "not found");
        assert_eq!(
            SearchOutcome::Found("ba".into()).terminal_line("abc"),
            "found: ba (credential: abc)"
        );
        assert_eq!(
            SearchOutcome::Resume(42).terminal_line("abc"),
            "interrupted — resume from offset 42"
        );
    }

    #[test]
    fn test_is_found() {
        assert!(SearchOutcome::Found("x".into()).is_found());
        assert!(!SearchOutcome::NotFound.is_found());
        assert!(!SearchOutcome::Resume(0).is_found());
    }

    #[test]
    fn test_statistics_throughput() {
        let stats = SearchStatistics {
            candidates_tried: 10000,
            elapsed_time: Duration::from_secs(10),
            ..Default::default()
        };
        assert!((stats.throughput() - 1000.0).abs() < 1e-10);
    }

    #[test]
    fn test_statistics_zero_division() {
        let stats = SearchStatistics::default();
        assert_eq!(stats.throughput(), 0.0);
    }

    #[test]
    fn test_summary_mentions_resumed_prefix_only_when_present() {
        let mut stats = SearchStatistics {
            candidates_tried: 5,
            cumulative_tried: 5,
            workers: 2,
            ..Default::default()
        };
        assert!(!stats.format_summary().contains("Cumulative"));

        stats.cumulative_tried = 25;
        stats.interrupted_workers = 1;
        let summary = stats.format_summary();
        assert!(summary.contains("Cumulative (with resumed prefix): 25"));
        assert!(summary.contains("Interrupted workers: 1"));
    }
}
