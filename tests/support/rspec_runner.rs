//! Serial `rspec` execution for the exploration scenarios.
//!
//! Scenarios log through the scene, so they run on one thread to keep the
//! output readable. The runner itself never aborts the process; instead the
//! collected report decides whether the enclosing `#[test]` fails.

use std::io;
use std::sync::Arc;

use rspec::block::Suite;
use rspec::report::Report;
use rspec::runner::RunnerObserver;
use rspec::{Configuration, ConfigurationBuilder, Logger, Runner};

fn single_threaded() -> Configuration {
    ConfigurationBuilder::default()
        .parallel(false)
        .exit_on_failure(false)
        .build()
        .unwrap_or_else(|message| panic!("invalid rspec configuration: {message}"))
}

/// Runs every scenario in `suite` and panics if any of them failed.
pub fn run_scenarios<T>(suite: &Suite<T>)
where
    T: Clone + Send + Sync + std::fmt::Debug,
{
    let observers: Vec<Arc<dyn RunnerObserver>> = vec![Arc::new(Logger::new(io::stdout()))];
    let report = Runner::new(single_threaded(), observers).run(suite);
    assert!(
        report.is_success(),
        "{} scenario(s) failed, {} passed",
        report.get_failed(),
        report.get_passed()
    );
}
