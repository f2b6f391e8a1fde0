//! Value-level helpers: color literals and numeric buffers.

mod color;
mod ndarray;

pub use color::*;
pub use ndarray::*;
