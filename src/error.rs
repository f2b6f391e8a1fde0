//! Error types for property resolution and the glyph pipeline
//!
//! Validation, encoding and precondition failures propagate to the caller.
//! Missing columns and unsupported hit tests are not errors: they are logged
//! through `tracing` and the pipeline degrades instead.

use thiserror::Error;

/// Errors that can occur while assigning, resolving or rendering properties
#[derive(Error, Debug)]
pub enum PlotError {
    /// A value does not satisfy the declared kind of its property
    #[error("{attr} given invalid value: {value}")]
    Validation { attr: String, value: String },

    /// Scalar access on a property that is not in value mode
    #[error(
        "attempted to retrieve property value for {attr} which has no value specification"
    )]
    InvalidState { attr: String },

    /// Units outside of the family's enumerated set
    #[error("{attr}: units must be one of {valid}; got: {units}")]
    InvalidUnits {
        attr: String,
        units: String,
        valid: String,
    },

    /// A color or geometry buffer with no conversion rule
    #[error("invalid color array: dtype {dtype} with dimension {dimension}")]
    UnsupportedEncoding { dtype: String, dimension: usize },

    /// A column whose element type cannot feed the property
    #[error("{attr}: column cannot be converted to {expected}")]
    ColumnType { attr: String, expected: &'static str },

    /// Resolved array length differs from the data source length
    #[error("{attr}: expected {expected} values, got {actual}")]
    LengthMismatch {
        attr: String,
        expected: usize,
        actual: usize,
    },

    /// A pipeline step was invoked before its required predecessor
    #[error("{operation} requires {required} (view is {state})")]
    Precondition {
        operation: &'static str,
        required: &'static str,
        state: &'static str,
    },

    /// Dynamic assignment to an attribute the model does not have
    #[error("{owner} has no attribute {attr}")]
    UnknownAttribute { owner: &'static str, attr: String },

    /// Texture image could not be decoded
    #[error("texture error: {0}")]
    Texture(String),

    /// IO error (settings files, texture files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error from serde_json
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

/// Result type alias for plot operations
pub type PlotResult<T> = Result<T, PlotError>;

impl PlotError {
    pub(crate) fn validation(attr: impl Into<String>, value: &serde_json::Value) -> Self {
        PlotError::Validation {
            attr: attr.into(),
            value: value_to_string(value),
        }
    }
}

/// Render a value the way it appears in validation messages
pub(crate) fn value_to_string(value: &serde_json::Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
}
