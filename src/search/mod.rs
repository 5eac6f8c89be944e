//! Keyspace search for a passphrase that unlocks a credential
//!
//! This module provides:
//! - Space model: charset/pattern or dictionary mapped to an indexable space
//! - Partitioning: chunk and per-worker block assignment
//! - Parallel execution: workers, coordinator, cancellation and resume

pub mod config;
pub mod parallel;
pub mod partition;
pub mod result;
pub mod space;

pub use config::SearchConfig;
pub use parallel::{run_parallel_search, ParallelConfig, ParallelResult};
pub use partition::{chunk_range, WorkBlock};
pub use result::{SearchOutcome, SearchStatistics};
pub use space::SearchSpace;
