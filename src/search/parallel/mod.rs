//! Parallel search execution over a partitioned candidate space.
//!
//! # Architecture
//!
//! The parallel search system consists of:
//! - A **coordinator** that spawns worker threads, listens for an interrupt and
//!   aggregates worker reports into one outcome
//! - Multiple **workers**, each walking one static block of indices
//! - A **report channel** carrying one tagged report per worker
//! - A per-run **search context** holding the cancellation flag and the
//!   progress counter, shared without locks
//!
//! # Example
//!
//! ```ignore
//! use keysearch::search::parallel::{ParallelConfig, run_parallel_search};
//!
//! let config = ParallelConfig::default()
//!     .with_workers(4)
//!     .with_chunk(0, 2)
//!     .with_resume_offset(1_000);
//!
//! let result = run_parallel_search(&target, &space, verifier, &config, observer, interrupt)?;
//! ```

pub mod channel;
pub mod config;
pub mod coordinator;
pub mod worker;

pub use config::ParallelConfig;
pub use coordinator::{run_parallel_search, ParallelResult};
