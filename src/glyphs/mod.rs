//! Glyphs and the data pipeline that drives them.
//!
//! A [`Glyph`] declares geometry properties and visual groups; a
//! [`GlyphView`] resolves them against a data source, indexes the raw
//! geometry, projects it through the scales and paints visible rows.

mod glyph;
pub mod markers;
mod scatter;
mod segment;
mod text;
mod view;

pub use glyph::*;
pub use hit_test::*;
pub use scatter::*;
pub use segment::*;
pub use text::*;
pub use view::*;
