//! Drawing context abstraction and a recording implementation.

mod context;
mod recording;

pub use context::*;
pub use recording::*;
