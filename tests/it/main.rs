//! Single test binary entry point.
//!
//! This consolidates all tests into a single binary, reducing linking
//! overhead to one link step.
//!
//! Structure:
//! - helpers: Fixtures, pipeline drivers and log capture
//! - integration: Multi-component workflow tests
//! - unit: Single-component unit tests

mod unit;
