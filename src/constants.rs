//! Crate-wide constants.
//!
//! Centralizes visual defaults and pipeline thresholds.

// ============================================================================
// Text
// ============================================================================

/// Default font for text visuals
pub const DEFAULT_FONT: &str = "helvetica";

/// Font used for text visuals in development mode
pub const DEV_FONT: &str = "Bokeh";

/// Width of one character relative to the font size, for text measurement
/// without a font backend
pub const APPROX_CHAR_WIDTH: f64 = 0.6;

/// Font size in pixels when a CSS size cannot be parsed
pub const FALLBACK_FONT_SIZE_PX: f64 = 16.0;

// ============================================================================
// Hatching
// ============================================================================

/// Default hatch tile size in pixels
pub const DEFAULT_HATCH_SCALE: f64 = 12.0;

// ============================================================================
// Arrow Heads
// ============================================================================

/// Default arrow head size in pixels
pub const ARROW_HEAD_SIZE: f64 = 25.0;

/// Default whisker head size in pixels
pub const WHISKER_HEAD_SIZE: f64 = 10.0;

// ============================================================================
// Markers & Hit Testing
// ============================================================================

/// Default scatter marker size in pixels
pub const DEFAULT_MARKER_SIZE: f64 = 4.0;

/// Minimum pick distance for thin lines in pixels
pub const MIN_HIT_DISTANCE: f64 = 2.0;

// ============================================================================
// Performance
// ============================================================================

/// Pipeline stages slower than this are logged
pub const SLOW_STAGE_MS: f64 = 16.67;

/// Number of samples kept per pipeline stage
pub const STATS_SAMPLE_COUNT: usize = 100;
