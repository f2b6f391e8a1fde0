//! plotcore: property resolution and glyph rendering for declarative 2D plots.
//!
//! Models declare typed properties whose values come from a literal, a data
//! source field or an expression. A [`GlyphView`](glyphs::GlyphView) resolves
//! them against a [`DataSource`](data::DataSource), indexes and projects the
//! result, and paints onto a [`Context2d`](render::Context2d) through the
//! line, fill, hatch and text visual groups.

pub mod annotations;
pub mod constants;
pub mod core;
pub mod data;
pub mod error;
pub mod glyphs;
pub mod logging;
pub mod perf;
pub mod render;
pub mod scales;
pub mod settings;
pub mod spatial_index;
pub mod types;
pub mod util;
pub mod visuals;

pub use error::{PlotError, PlotResult};
pub use settings::Settings;
