//! Correctness gate between field evaluation and color encoding
//!
//! Every check reports the first offending sample and stops; nothing is
//! clamped or corrected here.

use crate::error::{Result, TextureError};
use crate::field::SurfaceFields;
use crate::grid::Array2D;

/// Tolerance on `|gx² + gy² + gz² - 1|`
pub const UNIT_LENGTH_TOLERANCE: f64 = 1e-5;

/// Smallest and largest gradient norm over the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStats {
    pub min_norm: f64,
    pub max_norm: f64,
}

/// Summary of a passed check, used for diagnostics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvariantReport {
    pub height_min: f64,
    pub height_max: f64,
    pub gradient: GradientStats,
    pub max_unit_deviation: f64,
}

fn check_shape(field: &'static str, grid: &Array2D, expected: (usize, usize)) -> Result<()> {
    if grid.shape() != expected {
        return Err(TextureError::ShapeMismatch {
            field,
            expected,
            found: grid.shape(),
        });
    }
    Ok(())
}

/// Gradient norm range over the grid, computed without any checks
///
/// Usable on gradients that later fail validation, so the numbers can be
/// reported before the run stops.
pub fn gradient_stats(gx: &Array2D, gy: &Array2D) -> GradientStats {
    let (min_squared, max_squared) = gx
        .values()
        .iter()
        .zip(gy.values())
        .map(|(&x, &y)| x * x + y * y)
        .fold((f64::INFINITY, 0.0f64), |(lo, hi), squared| {
            (lo.min(squared), hi.max(squared))
        });
    GradientStats {
        min_norm: min_squared.sqrt(),
        max_norm: max_squared.sqrt(),
    }
}

/// Every value of `grid` must lie in `[min, max]`; NaN never does
pub fn check_range(field: &'static str, grid: &Array2D, min: f64, max: f64) -> Result<()> {
    match grid
        .indexed_iter()
        .find(|&(_, _, value)| !(min <= value && value <= max))
    {
        Some((col, row, value)) => Err(TextureError::OutOfRange {
            field,
            row,
            col,
            value,
            min,
            max,
        }),
        None => Ok(()),
    }
}

/// |h| must stay within the declared amplitude
pub fn check_height(height: &Array2D, amplitude: f64) -> Result<()> {
    check_range("h", height, -amplitude, amplitude)
}

/// Validate a reconstructed normal field
///
/// Checks, in order: matching shapes, each component in [-1, 1],
/// `gx² + gy² <= 1`, and unit length within [`UNIT_LENGTH_TOLERANCE`].
///
/// # Returns
/// * `Result<(GradientStats, f64)>` - Gradient norm range and worst unit-length deviation
pub fn check_normal(gx: &Array2D, gy: &Array2D, gz: &Array2D) -> Result<(GradientStats, f64)> {
    let shape = gx.shape();
    check_shape("gy", gy, shape)?;
    check_shape("gz", gz, shape)?;

    check_range("gx", gx, -1.0, 1.0)?;
    check_range("gy", gy, -1.0, 1.0)?;
    check_range("gz", gz, -1.0, 1.0)?;

    let mut max_deviation = 0.0f64;

    for (((col, row, x), &y), &z) in gx.indexed_iter().zip(gy.values()).zip(gz.values()) {
        let squared_norm = x * x + y * y;
        if squared_norm > 1.0 {
            return Err(TextureError::GradientOutsideUnitDisk {
                row,
                col,
                squared_norm,
            });
        }
        let deviation = squared_norm + z * z - 1.0;
        if !(deviation.abs() < UNIT_LENGTH_TOLERANCE) {
            return Err(TextureError::NotUnitLength {
                row,
                col,
                deviation,
            });
        }
        max_deviation = max_deviation.max(deviation.abs());
    }

    Ok((gradient_stats(gx, gy), max_deviation))
}

/// Run every check on an evaluated surface
pub fn check_surface(fields: &SurfaceFields, amplitude: f64) -> Result<InvariantReport> {
    check_shape("h", &fields.height, fields.gx.shape())?;
    check_height(&fields.height, amplitude)?;
    let (gradient, max_unit_deviation) = check_normal(&fields.gx, &fields.gy, &fields.gz)?;

    Ok(InvariantReport {
        height_min: fields.height.min(),
        height_max: fields.height.max(),
        gradient,
        max_unit_deviation,
    })
}
