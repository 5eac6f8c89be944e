//! keysearch: parallel, resumable passphrase search against an opaque verifier.
//!
//! The engine enumerates a charset/pattern space (or scans a dictionary) across a
//! fixed pool of worker threads, stops cooperatively on interrupt and reports an
//! offset from which an interrupted run can be resumed.

pub mod error;
pub mod oracle;
pub mod progress;
pub mod search;

pub use error::{Result, SearchError};
pub use oracle::{DigestVerifier, KeyMaterial, OracleError, Verifier};
