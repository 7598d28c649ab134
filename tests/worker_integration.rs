//! Integration tests for Worker lifecycle
//!
//! These tests validate:
//! - transforms run on the freshest input only
//! - output is latest-only and never blocks the worker
//! - close/drop shut the background thread down

mod common;

use binnacle::Worker;
use crossbeam_channel::{bounded, select, RecvTimeoutError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_doubling_worker_sees_second_input() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    let worker = Worker::new(move |x: i64| {
        log.lock().unwrap().push(x);
        x * 2
    })
    .unwrap();

    worker.push(1);
    worker.push(2);

    // Either 1 was picked up before 2 arrived, or it was dropped; in both
    // cases the result eventually reported is 4.
    let mut result = worker.pull_timeout(common::test_timeout()).unwrap();
    if result != 4 {
        assert_eq!(result, 2);
        result = worker.pull_timeout(common::test_timeout()).unwrap();
    }
    assert_eq!(result, 4);
    assert_eq!(seen.lock().unwrap().last(), Some(&2));
}

#[test]
fn test_superseded_inputs_skipped_while_busy() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let (started_tx, started_rx) = bounded::<()>(1);
    let (release_tx, release_rx) = bounded::<()>(0);

    let worker = Worker::new(move |x: u32| {
        counter.fetch_add(1, Ordering::SeqCst);
        if x == 0 {
            let _ = started_tx.send(());
            let _ = release_rx.recv();
        }
        x
    })
    .unwrap();

    worker.push(0);
    started_rx.recv_timeout(common::test_timeout()).unwrap();
    for i in 1..=100 {
        worker.push(i);
    }
    release_tx.send_timeout((), common::test_timeout()).unwrap();

    let mut last = 0;
    while last != 100 {
        last = worker.pull_timeout(common::test_timeout()).unwrap();
    }
    // Input 0 plus only the newest of the 100 queued behind it
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_worker_never_blocks_on_unread_output() {
    let worker = Worker::new(|x: u32| x).unwrap();
    for i in 0..1_000 {
        worker.push(i);
        thread::sleep(Duration::from_micros(50));
    }
    thread::sleep(Duration::from_millis(50));

    // Nobody pulled; the worker kept going and only the last output remains
    assert_eq!(worker.try_pull(), Some(999));
    assert_eq!(worker.try_pull(), None);
}

#[test]
fn test_shutdown_disconnects_output() {
    let mut worker = Worker::new(|x: u8| x).unwrap();
    let output = worker.expose();

    worker.push(1);
    assert_eq!(output.recv_timeout(common::test_timeout()), Ok(1));

    worker.close();
    assert_eq!(
        output.recv_timeout(common::test_timeout()),
        Err(RecvTimeoutError::Disconnected)
    );

    let deadline = Instant::now() + common::test_timeout();
    while !worker.is_finished() {
        assert!(Instant::now() < deadline, "worker thread still running");
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn test_close_finishes_in_flight_transform() {
    let (started_tx, started_rx) = bounded::<()>(1);
    let mut worker = Worker::new(move |x: u32| {
        let _ = started_tx.send(());
        thread::sleep(Duration::from_millis(100));
        x * 10
    })
    .unwrap();

    worker.push(4);
    started_rx.recv_timeout(common::test_timeout()).unwrap();
    worker.close();

    assert_eq!(worker.pull(), Some(40));
    assert_eq!(worker.pull(), None);
}

#[test]
fn test_select_across_two_workers() {
    let squares = Worker::new(|x: u64| x * x).unwrap();
    let labels = Worker::new(|x: u64| format!("#{}", x)).unwrap();
    let square_rx = squares.expose();
    let label_rx = labels.expose();

    squares.push(12);
    labels.push(7);

    let mut got_square = None;
    let mut got_label = None;
    while got_square.is_none() || got_label.is_none() {
        select! {
            recv(square_rx) -> msg => got_square = msg.ok(),
            recv(label_rx) -> msg => got_label = msg.ok(),
            default(common::test_timeout()) => panic!("no worker output"),
        }
    }

    assert_eq!(got_square, Some(144));
    assert_eq!(got_label.as_deref(), Some("#7"));
}

#[test]
fn test_join_after_work() {
    let worker = Worker::with_name("joiner", |s: &'static str| s.to_uppercase()).unwrap();
    worker.push("done");
    thread::sleep(Duration::from_millis(50));
    assert_eq!(worker.join().unwrap().as_deref(), Some("DONE"));
}
