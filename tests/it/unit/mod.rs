//! Unit tests for plotcore.

mod color_tests;
mod data_source_tests;
mod perf_tests;
mod pipeline_tests;
mod property_tests;
mod settings_tests;
mod snapshot_tests;
mod units_tests;
mod visuals_tests;
