//! Background worker between two latest-value slots
//!
//! A [`Worker`] owns one thread that repeatedly takes the freshest input,
//! runs the transform on it and publishes the result. Both sides go through
//! a [`LatestSlot`], so:
//!
//! - the owner never blocks when pushing work (older unpicked inputs are dropped)
//! - the thread never blocks when publishing (older unread outputs are dropped)
//! - the thread's only blocking point is waiting for new input
//!
//! # Lifecycle
//!
//! ```text
//! new() ──► RUNNING ──(input closed and drained)──► TERMINATED
//!              │  pull input → transform → push output
//!              └──────────────────────────────┘
//! ```
//!
//! [`Worker::close`] closes the input. Dropping the handle does the same,
//! since it drops the only sender. The thread finishes any in-flight
//! transform, publishes it, and exits; the output side then reports closed
//! once that final result has been pulled.
//!
//! Unlike a handle that must be closed explicitly, a dropped `Worker` never
//! leaves its thread parked on an input nobody can feed.
//!
//! The transform is assumed total. A transform that can fail should return a
//! `Result` (or similar) as its output type. If it panics anyway, the thread
//! dies and the output reports closed.

use crate::error::{BinnacleError, Result};
use crate::latest::slot::LatestSlot;
use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Thread name used when none is given
pub const DEFAULT_WORKER_NAME: &str = "latest-worker";

/// Handle to a background transform thread.
///
/// [`close`](Self::close) is not the only shutdown path: dropping the handle
/// also closes the input, and the output disconnects once the thread exits.
pub struct Worker<I, O> {
    /// Input slot; the owner is its single producer
    input: LatestSlot<I>,
    /// Output side; the thread holds the slot and thus the only sender
    output: Receiver<O>,
    /// Background thread
    handle: Option<JoinHandle<()>>,
    /// Name of the background thread
    name: String,
}

impl<I, O> Worker<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    /// Spawn a worker thread running `transform` on each freshest input
    pub fn new<F>(transform: F) -> Result<Self>
    where
        F: FnMut(I) -> O + Send + 'static,
    {
        Self::with_name(DEFAULT_WORKER_NAME, transform)
    }

    /// Spawn a worker whose thread carries `name` (shown in logs and panics)
    pub fn with_name<F>(name: impl Into<String>, mut transform: F) -> Result<Self>
    where
        F: FnMut(I) -> O + Send + 'static,
    {
        let name = name.into();
        let input = LatestSlot::new();
        let output = LatestSlot::new();

        let inputs = input.expose();
        let results = output.expose();

        let thread_name = name.clone();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                tracing::debug!(worker = %thread_name, "Worker started");
                let mut processed = 0u64;
                // Ends once the input is closed and drained.
                for value in inputs.iter() {
                    let result = transform(value);
                    output.push(result);
                    processed += 1;
                    tracing::trace!(worker = %thread_name, processed, "Published result");
                }
                tracing::debug!(worker = %thread_name, processed, "Worker stopped");
                // `output` drops here, which closes the owner's side.
            })
            .map_err(|e| BinnacleError::Worker(format!("failed to spawn {}: {}", name, e)))?;

        Ok(Self {
            input,
            output: results,
            handle: Some(handle),
            name,
        })
    }
}

impl<I, O> Worker<I, O> {
    /// Hand the worker new input. Never blocks.
    ///
    /// Input the thread has not picked up yet is replaced. Must not be called
    /// after [`close`](Self::close).
    pub fn push(&self, input: I) {
        self.input.push(input);
    }

    /// Block until a result is available.
    ///
    /// Returns `None` once the worker has stopped and its final result has
    /// been taken.
    pub fn pull(&self) -> Option<O> {
        self.output.recv().ok()
    }

    /// Take the latest result if one is ready
    pub fn try_pull(&self) -> Option<O> {
        match self.output.try_recv() {
            Ok(value) => Some(value),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Like [`pull`](Self::pull), giving up after `timeout`
    pub fn pull_timeout(&self, timeout: Duration) -> std::result::Result<O, RecvTimeoutError> {
        self.output.recv_timeout(timeout)
    }

    /// Output wait handle for `crossbeam_channel::select!`.
    ///
    /// Disconnects when the worker thread exits.
    pub fn expose(&self) -> Receiver<O> {
        self.output.clone()
    }

    /// Close the input; the thread exits after its in-flight transform
    pub fn close(&mut self) {
        self.input.close();
    }

    /// Whether [`close`](Self::close) has been called
    pub fn is_closed(&self) -> bool {
        self.input.is_closed()
    }

    /// Whether the background thread has exited
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Name of the background thread
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Close the input and wait for the thread to exit.
    ///
    /// Returns the final result if it was not pulled yet.
    pub fn join(mut self) -> Result<Option<O>> {
        self.input.close();
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| BinnacleError::Worker(format!("{} panicked", self.name)))?;
        }
        Ok(self.try_pull())
    }
}

impl<I, O> std::fmt::Debug for Worker<I, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("name", &self.name)
            .field("closed", &self.is_closed())
            .field("finished", &self.is_finished())
            .finish()
    }
}
