//! The property model: kinds, specs and their resolution.
//!
//! A [`Property`] holds exactly one active [`SpecMode`] (a literal value, a
//! field reference or an expression). Vector specs resolve that mode
//! against a [`DataSource`](crate::data::DataSource) into one value per row.

mod color_spec;
mod data_property;
mod kinds;
mod property;
mod signal;
pub(crate) mod spec;
mod units;
mod vector;

pub use color_spec::*;
pub use data_property::*;
pub use kinds::*;
pub use property::*;
pub use signal::*;
pub use spec::{Spec, SpecMode};
pub use units::*;
pub use vector::*;
