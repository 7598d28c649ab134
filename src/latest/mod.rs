//! Latest-value-wins concurrency primitives
//!
//! Building blocks for pipelines where only the newest input matters and a
//! stale one is worthless the moment a fresh one arrives (re-running a query
//! as the user types, re-rendering a chart for the current data).
//!
//! - [`LatestSlot`] - capacity-one channel whose `push` overwrites and never blocks
//! - [`Worker`] - background thread that maps the freshest input to the freshest output
//!
//! # Example
//!
//! ```
//! use binnacle::latest::Worker;
//!
//! let mut worker = Worker::new(|x: u32| x * 2).unwrap();
//! worker.push(21);
//! assert_eq!(worker.pull(), Some(42));
//!
//! worker.close();
//! assert_eq!(worker.pull(), None);
//! ```
//!
//! Both types allow one producer only. See [`slot`] for details.

pub mod slot;
pub mod worker;

pub use slot::LatestSlot;
pub use worker::{Worker, DEFAULT_WORKER_NAME};
