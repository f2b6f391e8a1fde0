//! Unit tests for pipeline timing statistics.

use crate::helpers::{WarnCounter, run_pipeline, view, xy_source};
use plotcore::glyphs::Scatter;
use plotcore::perf::{OperationStats, PipelineStats, ScopedTimer, measure};
use std::thread;
use std::time::Duration;

#[test]
fn test_measure_returns_result_and_time() {
    let (value, elapsed_ms) = measure(|| {
        thread::sleep(Duration::from_millis(5));
        42
    });
    assert_eq!(value, 42);
    assert!(elapsed_ms >= 5.0);
}

#[test]
fn test_operation_stats() {
    let mut stats = OperationStats::default();
    assert_eq!(stats.min(), 0.0);
    assert_eq!(stats.average(), 0.0);

    for ms in [4.0, 2.0, 6.0] {
        stats.record(ms);
    }
    assert_eq!(stats.count(), 3);
    assert_eq!(stats.min(), 2.0);
    assert_eq!(stats.max(), 6.0);
    assert_eq!(stats.average(), 4.0);
    assert_eq!(stats.p95(), 6.0);
}

#[test]
fn test_pipeline_stats_per_stage() {
    let mut stats = PipelineStats::default();
    stats.record("set_data", 1.0);
    stats.record("set_data", 3.0);
    stats.record("map_data", 0.5);

    assert_eq!(stats.stage("set_data").map(OperationStats::count), Some(2));
    let names: Vec<&str> = stats.stages().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["map_data", "set_data"]);

    stats.reset();
    assert!(stats.stage("set_data").is_none());
}

#[test]
fn test_view_counts_repeated_stages() {
    let mut view = view(Scatter::new());
    run_pipeline(&mut view, &xy_source());
    view.map_data().unwrap();
    assert_eq!(view.stats().stage("map_data").map(|s| s.count()), Some(2));
    assert!(view.stats().stage("render").is_none());
}

#[test]
fn test_slow_scope_is_logged() {
    let counter = WarnCounter::new("Slow operation");
    counter.capture(|| {
        let timer = ScopedTimer::new("sleepy", 1.0);
        thread::sleep(Duration::from_millis(5));
        assert!(timer.elapsed_ms() >= 5.0);
    });
    assert_eq!(counter.count(), 1);

    let counter = WarnCounter::new("Slow operation");
    counter.capture(|| {
        let _timer = ScopedTimer::new("quick", 10_000.0);
    });
    assert_eq!(counter.count(), 0);
}
