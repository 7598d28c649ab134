//! Error handling for binnacle
//!
//! This module defines custom error types and a Result alias for use
//! throughout the crate. The slot primitives themselves never fail; errors
//! come from spawning worker threads, loading configuration and snapshots,
//! and executing queries.

use thiserror::Error;

/// Main error type for binnacle operations
#[derive(Error, Debug)]
pub enum BinnacleError {
    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to loading sample snapshots
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Errors produced while executing a query
    #[error("Query error: {0}")]
    Query(String),

    /// Errors related to worker threads
    #[error("Worker error: {0}")]
    Worker(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<BinnacleError>,
    },
}

impl BinnacleError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        BinnacleError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<serde_json::Error> for BinnacleError {
    fn from(err: serde_json::Error) -> Self {
        BinnacleError::Serialization(err.to_string())
    }
}

/// Result type alias for binnacle operations
pub type Result<T> = std::result::Result<T, BinnacleError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
