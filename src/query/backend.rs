//! Query execution behind a latest-value worker
//!
//! A [`QueryBackend`] turns query text into samples. The console never calls
//! it directly; it runs inside a [`Worker`] created by [`backend_worker`] so
//! that typing never waits on a slow query and only the newest query's
//! result is ever shown.
//!
//! [`SnapshotBackend`] answers queries from a JSON file of samples, which is
//! enough to drive the console without a live metrics server.

use crate::error::{BinnacleError, Result, ResultExt};
use crate::latest::Worker;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Default cap on samples returned by one query
pub const DEFAULT_MAX_SAMPLES: usize = 500;

/// Selector matching every sample
pub const SELECT_ALL: &str = "*";

/// One labelled value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Metric name with labels, e.g. `up{job="node"}`
    pub metric: String,
    /// Sample value
    pub value: f64,
}

impl Sample {
    pub fn new(metric: impl Into<String>, value: f64) -> Self {
        Self {
            metric: metric.into(),
            value,
        }
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.metric, self.value)
    }
}

/// Successful query output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutcome {
    pub samples: Vec<Sample>,
    /// Non-fatal notes about the query (truncation, no matches)
    pub warnings: Vec<String>,
}

/// Worker output: failures travel as the error message
pub type QueryResult = std::result::Result<QueryOutcome, String>;

/// Something that can answer queries
#[cfg_attr(test, mockall::automock)]
pub trait QueryBackend: Send {
    /// Execute `text` and return the matching samples
    fn query(&mut self, text: &str) -> Result<QueryOutcome>;
}

/// Run `backend` on its own thread behind latest-value slots
pub fn backend_worker<B>(mut backend: B) -> Result<Worker<String, QueryResult>>
where
    B: QueryBackend + 'static,
{
    Worker::with_name("query-backend", move |text: String| {
        let result = backend.query(&text).map_err(|e| e.to_string());
        if let Err(e) = &result {
            tracing::debug!("Query failed: {}", e);
        }
        result
    })
}

/// Backend serving queries from an in-memory set of samples
#[derive(Debug, Clone)]
pub struct SnapshotBackend {
    samples: Vec<Sample>,
    max_samples: usize,
}

impl SnapshotBackend {
    /// Create a backend over `samples`
    pub fn new(samples: Vec<Sample>) -> Self {
        Self {
            samples,
            max_samples: DEFAULT_MAX_SAMPLES,
        }
    }

    /// Load samples from a JSON array of `{"metric": ..., "value": ...}`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            BinnacleError::Snapshot(format!("Failed to read snapshot {:?}: {}", path, e))
        })?;
        let samples: Vec<Sample> = serde_json::from_str(&content)
            .map_err(BinnacleError::from)
            .with_context(|| format!("Failed to parse snapshot {:?}", path))?;

        tracing::info!("Loaded {} samples from {:?}", samples.len(), path);
        Ok(Self::new(samples))
    }

    /// Limit the number of samples returned per query
    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples.max(1);
        self
    }

    /// Number of samples in the snapshot
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the snapshot holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Innermost parenthesised part of `text` with whitespace runs collapsed.
///
/// `sum(\n  rate(up[5m])\n)` selects `up[5m]`; text without parens is used
/// as a whole. An unclosed group runs to the end of the text.
fn inner_selector(text: &str) -> String {
    let close = text.find(')').unwrap_or(text.len());
    let open = text[..close].rfind('(').map_or(0, |i| i + 1);
    text[open..close].split_whitespace().collect::<Vec<_>>().join(" ")
}

impl QueryBackend for SnapshotBackend {
    fn query(&mut self, text: &str) -> Result<QueryOutcome> {
        if text.trim().is_empty() {
            return Err(BinnacleError::Query("empty query".to_string()));
        }
        let selector = inner_selector(text);
        if selector.is_empty() {
            return Err(BinnacleError::Query(format!("no selector in {:?}", text.trim())));
        }

        let mut samples: Vec<Sample> = self
            .samples
            .iter()
            .filter(|s| selector == SELECT_ALL || s.metric.contains(selector.as_str()))
            .cloned()
            .collect();

        let mut warnings = Vec::new();
        if samples.is_empty() {
            warnings.push(format!("no samples match {:?}", selector));
        } else if samples.len() > self.max_samples {
            warnings.push(format!(
                "{} samples matched, showing first {}",
                samples.len(),
                self.max_samples
            ));
            samples.truncate(self.max_samples);
        }

        Ok(QueryOutcome { samples, warnings })
    }
}
