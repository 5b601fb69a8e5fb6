//! Error type for texture synthesis
//!
//! Numeric invariant failures are never recovered from: they mean the
//! parameters or the formulas are wrong, and the run stops before anything
//! is written for the affected artifact pair.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum TextureError {
    #[error("invalid configuration '{config}': {reason}")]
    InvalidConfig { config: String, reason: String },

    #[error("field shape mismatch: {field} is {found:?}, expected {expected:?}")]
    ShapeMismatch {
        field: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("gradient leaves the unit disk at (row {row}, col {col}): gx^2 + gy^2 = {squared_norm}")]
    GradientOutsideUnitDisk {
        row: usize,
        col: usize,
        squared_norm: f64,
    },

    #[error("{field} = {value} at (row {row}, col {col}) is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        row: usize,
        col: usize,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("normal at (row {row}, col {col}) is not unit length: |n|^2 - 1 = {deviation}")]
    NotUnitLength {
        row: usize,
        col: usize,
        deviation: f64,
    },

    #[error("failed to encode '{path}': {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("preview export failed: {0}")]
    Preview(String),
}

impl TextureError {
    pub fn invalid_config<C: ToString, R: ToString>(config: C, reason: R) -> Self {
        TextureError::InvalidConfig {
            config: config.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True for the numeric invariant failures, as opposed to I/O problems
    #[allow(dead_code)]
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            TextureError::ShapeMismatch { .. }
                | TextureError::GradientOutsideUnitDisk { .. }
                | TextureError::OutOfRange { .. }
                | TextureError::NotUnitLength { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TextureError>;
