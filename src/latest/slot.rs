//! Single-item mailbox where the newest value always wins
//!
//! A [`LatestSlot`] is a crossbeam channel with capacity one plus an
//! overwrite loop on the sending side. Sending never blocks: if the slot is
//! occupied, the stale value is drained and the send is retried.
//!
//! # Producer discipline
//!
//! A slot supports exactly **one producer**. The drain-then-retry loop in
//! [`LatestSlot::push`] is only correct when nothing else is adding values
//! concurrently; two producers can race each other's drain/send pairs and
//! deliver a value that is not the newest. Memory safety is unaffected, since
//! the channel still serializes individual sends and receives.
//!
//! Any number of consumers may [`pull`](LatestSlot::pull) or wait on an
//! [`expose`](LatestSlot::expose)d receiver. Every value is handed to exactly
//! one of them.

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError, TrySendError};
use std::time::Duration;

/// A capacity-one channel whose `push` overwrites instead of blocking
pub struct LatestSlot<T> {
    /// Sending half; `None` once closed
    tx: Option<Sender<T>>,
    /// Receiving half, also used by `push` to drain stale values
    rx: Receiver<T>,
}

impl<T> LatestSlot<T> {
    /// Create an empty, open slot
    pub fn new() -> Self {
        let (tx, rx) = bounded(1);
        Self { tx: Some(tx), rx }
    }

    /// Store `value`, discarding any value that has not been pulled yet.
    ///
    /// Never blocks. Must only be called from a single producer, and never
    /// after [`close`](Self::close). Pushing into a closed slot drops the value
    /// and logs an error.
    pub fn push(&self, mut value: T) {
        let Some(tx) = &self.tx else {
            tracing::error!("push on a closed LatestSlot, value dropped");
            return;
        };

        loop {
            match tx.try_send(value) {
                Ok(()) => return,
                Err(TrySendError::Full(rejected)) => {
                    value = rejected;
                    // A consumer may have taken the occupant already, in which
                    // case there is nothing to drain and the next send succeeds.
                    if self.rx.try_recv().is_ok() {
                        tracing::trace!("overwrote unread slot value");
                    }
                }
                // Unreachable while `self.rx` is alive.
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }

    /// Block until a value is available and take it.
    ///
    /// Returns `None` once the slot is closed and its last value has been
    /// taken.
    pub fn pull(&self) -> Option<T> {
        self.rx.recv().ok()
    }

    /// Take the pending value without blocking
    pub fn try_pull(&self) -> Option<T> {
        match self.rx.try_recv() {
            Ok(value) => Some(value),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Like [`pull`](Self::pull), giving up after `timeout`.
    ///
    /// Returns `Err(RecvTimeoutError::Disconnected)` when the slot is closed
    /// and drained.
    pub fn pull_timeout(&self, timeout: Duration) -> Result<T, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    /// Receive-only view of the slot for use in `crossbeam_channel::select!`.
    ///
    /// The returned receiver competes with [`pull`](Self::pull) and with any
    /// other exposed receiver; a value goes to whichever receives first.
    pub fn expose(&self) -> Receiver<T> {
        self.rx.clone()
    }

    /// Close the slot.
    ///
    /// A value still buffered is delivered normally; after that every wait
    /// reports the slot as closed. Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.tx.take().is_none() {
            tracing::warn!("LatestSlot closed more than once");
        }
    }

    /// Whether [`close`](Self::close) has been called
    pub fn is_closed(&self) -> bool {
        self.tx.is_none()
    }

    /// Whether a value is waiting to be pulled
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for LatestSlot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LatestSlot")
            .field("closed", &self.is_closed())
            .field("pending", &!self.is_empty())
            .finish()
    }
}
