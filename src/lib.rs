//! # binnacle: latest-value-wins query console
//!
//! A query console where the user types a query, it is executed against a
//! metrics source, and the result is shown as sorted text and a bar chart.
//! The interesting part is how work moves between threads: nothing ever
//! queues up behind a slow consumer, because every hop keeps only the newest
//! value.
//!
//! ## Architecture
//!
//! - **latest**: [`LatestSlot`] (capacity-one, overwrite-on-push channel) and
//!   [`Worker`] (background thread between two slots)
//! - **query**: auto-indentation of queries and the [`QueryBackend`] trait
//! - **render**: text rendering and bar chart layout
//! - **app**: the [`Console`] event loop multiplexing input with worker output
//! - **Communication**: crossbeam channels, waited on with `select!`
//!
//! ## Example
//!
//! ```
//! use binnacle::latest::LatestSlot;
//!
//! let slot = LatestSlot::new();
//! slot.push("stale");
//! slot.push("fresh");
//! assert_eq!(slot.pull(), Some("fresh"));
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod latest;
pub mod query;
pub mod render;

// Re-export commonly used types
pub use app::{Console, ViewState};
pub use config::AppConfig;
pub use error::{BinnacleError, Result};
pub use latest::{LatestSlot, Worker};
pub use query::{QueryBackend, QueryOutcome, QueryResult, Sample, SnapshotBackend};
pub use render::{ChartFrame, ChartRequest, ChartSort};
