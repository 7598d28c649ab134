//! Query editing and execution
//!
//! - [`format`] - paren-depth auto-indentation applied on every edit
//! - [`backend`] - the [`QueryBackend`] trait, a file-backed implementation,
//!   and the worker wrapper that keeps query execution off the input thread

pub mod backend;
pub mod format;

pub use backend::{
    backend_worker, QueryBackend, QueryOutcome, QueryResult, Sample, SnapshotBackend,
    DEFAULT_MAX_SAMPLES, SELECT_ALL,
};
pub use format::{format_query, Formatted, Selection};
