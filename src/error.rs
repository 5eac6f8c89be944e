//! Error types for search configuration and execution

use crate::oracle::OracleError;
use thiserror::Error;

/// Fatal errors raised before or during a search.
///
/// Everything except `Oracle` and `WorkerPanicked` is detected before any
/// worker starts.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("target credential identifier is empty")]
    EmptyTarget,

    #[error("charset is empty")]
    EmptyCharset,

    #[error("charset contains duplicate character {0:?}")]
    DuplicateCharset(char),

    #[error("password pattern is empty (give a pattern or a positive password length)")]
    EmptyPattern,

    #[error("pattern length {pattern} does not match password length {pwlen}")]
    PatternLength { pattern: usize, pwlen: usize },

    #[error("a pattern cannot be combined with a dictionary")]
    PatternWithDictionary,

    #[error("search space {charset}^{wildcards} does not fit in 64 bits")]
    SpaceOverflow { charset: usize, wildcards: usize },

    #[error("worker count must be at least 1")]
    NoWorkers,

    #[error("chunk {chunk} is out of range for {chunks} chunk(s)")]
    InvalidChunk { chunk: u64, chunks: u64 },

    #[error("resume offset {0} overflows the index range")]
    ResumeOverflow(u64),

    #[error("block [{start}, {finish}) exceeds dictionary of {len} entries")]
    DictionaryBounds { start: u64, finish: u64, len: u64 },

    #[error("failed to read dictionary {path}: {source}")]
    Dictionary {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("{0} search worker(s) stopped without reporting")]
    WorkerPanicked(usize),

    #[error("verifier failed: {0}")]
    Oracle(#[from] OracleError),
}

pub type Result<T> = std::result::Result<T, SearchError>;
