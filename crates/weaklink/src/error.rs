//! Error types for weaklink operations.
//!
//! The analysis core rarely fails: structural problems (an invalid circuit,
//! a topology without endpoints) degrade to conservative verdicts instead of
//! errors. What remains here are infrastructure failures surfaced by the
//! collaborators around the core:
//!
//! - **`Source`**: the adjacency capability used by path enumeration failed.
//!   The enumerator logs these and treats the branch as a dead end; they only
//!   reach callers of [`AdjacencySource`](crate::traversal::AdjacencySource)
//!   directly.
//! - **`Store`** / **`CircuitNotFound`**: the injected circuit store failed or
//!   no longer knows the circuit.
//! - **`WorkerPool`**: the bounded worker pool could not be created. This is
//!   the only hard failure of a traversal.

use std::io;
use thiserror::Error;

/// Result type for weaklink operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for weaklink operations.
#[derive(Debug, Error)]
pub enum Error {
    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid configuration or arguments
    #[error("configuration error: {0}")]
    Config(String),

    /// Adjacency lookup against the connection store failed
    #[error("adjacency source error: {0}")]
    Source(String),

    /// Circuit store operation failed
    #[error("circuit store error: {0}")]
    Store(String),

    /// Circuit is not known to the store
    #[error("circuit not found: {0}")]
    CircuitNotFound(String),

    /// Worker pool for path enumeration could not be created
    #[error("worker pool unavailable: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let error = Error::CircuitNotFound("circuit-7".to_string());
        assert_eq!(error.to_string(), "circuit not found: circuit-7");

        let error = Error::Source("connection store timed out".to_string());
        assert!(error.to_string().contains("timed out"));
    }

    #[test]
    fn io_errors_convert() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "edges.jsonl");
        let error: Error = io_error.into();
        assert!(matches!(error, Error::Io(_)));
    }
}
