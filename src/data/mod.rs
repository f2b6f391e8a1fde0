//! Data sources and the columns, expressions and transforms that feed
//! vectorized property resolution.
//!
//! ## Error Handling
//!
//! Loaders and mutators return `PlotResult<T>`. Common errors include:
//! - `LengthMismatch`: columns of different lengths
//! - `ColumnType`: a column that cannot be read as the requested type
//! - `Polars`/`Json`: parse errors while loading

mod column;
mod expression;
mod frame;
mod source;
mod transform;

pub use column::*;
pub use expression::*;
pub use source::*;
pub use transform::*;
