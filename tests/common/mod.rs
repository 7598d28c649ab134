//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use binnacle::{AppConfig, Console, QueryBackend, ViewState};
use crossbeam_channel::bounded;
use std::time::Duration;

/// Upper bound for anything a test waits on
pub fn test_timeout() -> Duration {
    Duration::from_secs(5)
}

/// Feed `lines` to a console over `backend`, close the input and return the
/// final view plus everything printed.
pub fn run_console<B>(backend: B, config: &AppConfig, lines: &[&str]) -> (ViewState, String)
where
    B: QueryBackend + 'static,
{
    let console = Console::spawn(backend, config).expect("spawn console");
    let (tx, rx) = bounded(lines.len().max(1));
    for line in lines {
        tx.send(line.to_string()).unwrap();
    }
    drop(tx);

    let mut out = Vec::new();
    let view = console.run(rx, &mut out).expect("console run");
    (view, String::from_utf8(out).unwrap())
}
