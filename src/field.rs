//! Analytic wave fields over the sampling grid
//!
//! For the phase `φ = ω₀ (u + a cos(ω₁ v))` and height `h = b cos(φ)`:
//!
//! ```text
//! ∂φ/∂u = ω₀
//! ∂φ/∂v = -ω₀ a ω₁ sin(ω₁ v)
//! ∂h/∂u = -b sin(φ) ∂φ/∂u
//! ∂h/∂v = -b sin(φ) ∂φ/∂v
//! ```
//!
//! The stored gradient is `k (∂h/∂u, ∂h/∂v)` where `k` comes from
//! `WaveConfig::gradient_coefficient`. The third component follows from the
//! unit-normal identity `gz = sqrt(1 - gx² - gy²)`.

use glam::{DVec2, DVec3};

use crate::config::WaveConfig;
use crate::error::{Result, TextureError};
use crate::grid::{Array2D, SamplingGrid};

/// Height and tangential gradient, before the normal is reconstructed
#[derive(Debug, Clone)]
pub struct GradientFields {
    pub height: Array2D,
    pub gx: Array2D,
    pub gy: Array2D,
}

impl GradientFields {
    /// Complete the surface with `gz = sqrt(1 - gx² - gy²)`
    pub fn with_normal(self) -> Result<SurfaceFields> {
        let gz = reconstruct_normal_z(&self.gx, &self.gy)?;
        Ok(SurfaceFields {
            height: self.height,
            gx: self.gx,
            gy: self.gy,
            gz,
        })
    }
}

/// Height, gradient and reconstructed normal of one wave texture
#[derive(Debug, Clone)]
pub struct SurfaceFields {
    pub height: Array2D,
    pub gx: Array2D,
    pub gy: Array2D,
    pub gz: Array2D,
}

impl SurfaceFields {
    pub fn resolution(&self) -> usize {
        self.height.width()
    }

    /// Unit normal at one sample
    pub fn normal_at(&self, x: usize, y: usize) -> Option<DVec3> {
        Some(DVec3::new(
            self.gx.get(x, y)?,
            self.gy.get(x, y)?,
            self.gz.get(x, y)?,
        ))
    }
}

/// Reconstruct the upward unit normal from its tangential components
///
/// Fails when `gx² + gy² > 1`; the positive root is always chosen. The
/// error carries no grid location, callers over a grid fill it in.
pub fn reconstruct_normal(gradient: DVec2) -> Result<DVec3> {
    let squared_norm = gradient.length_squared();
    if !(squared_norm <= 1.0) {
        return Err(TextureError::GradientOutsideUnitDisk {
            row: 0,
            col: 0,
            squared_norm,
        });
    }
    let gz = (1.0 - squared_norm).max(0.0).sqrt();
    Ok(gradient.extend(gz))
}

/// Elementwise normal reconstruction over whole gradient grids
///
/// # Arguments
/// * `gx` - Gradient along u
/// * `gy` - Gradient along v, same shape as `gx`
///
/// # Returns
/// * `Result<Array2D>` - gz, or the first sample outside the unit disk
pub fn reconstruct_normal_z(gx: &Array2D, gy: &Array2D) -> Result<Array2D> {
    if gx.shape() != gy.shape() {
        return Err(TextureError::ShapeMismatch {
            field: "gy",
            expected: gx.shape(),
            found: gy.shape(),
        });
    }

    let mut gz = Vec::with_capacity(gx.values().len());
    for ((x, y, gx_value), &gy_value) in gx.indexed_iter().zip(gy.values()) {
        match reconstruct_normal(DVec2::new(gx_value, gy_value)) {
            Ok(normal) => gz.push(normal.z),
            Err(TextureError::GradientOutsideUnitDisk { squared_norm, .. }) => {
                return Err(TextureError::GradientOutsideUnitDisk {
                    row: y,
                    col: x,
                    squared_norm,
                });
            }
            Err(other) => return Err(other),
        }
    }

    let width = gx.width();
    Ok(Array2D::from_fn(width, gx.height(), |x, y| gz[y * width + x]))
}

/// Evaluate height and gradient fields for a configuration
///
/// Purely elementwise; boundary samples are ordinary samples.
pub fn evaluate_gradient(grid: &SamplingGrid, config: &WaveConfig) -> Result<GradientFields> {
    let w0 = config.carrier_frequency;
    let w1 = config.modulation_frequency;
    let a = config.modulation_amplitude;
    let b = config.height_amplitude;
    let k = config.gradient_coefficient();

    let mismatch = || TextureError::ShapeMismatch {
        field: "v",
        expected: grid.u.shape(),
        found: grid.v.shape(),
    };

    let phase = grid
        .u
        .zip_map(&grid.v, |u, v| w0 * (u + a * (w1 * v).cos()))
        .ok_or_else(mismatch)?;
    let height = phase.map(|phi| b * phi.cos());
    let gx = phase.map(|phi| k * -b * phi.sin() * w0);
    let gy = phase
        .zip_map(&grid.v, |phi, v| {
            let dphi_dv = w0 * a * w1 * -(w1 * v).sin();
            k * -b * phi.sin() * dphi_dv
        })
        .ok_or_else(mismatch)?;

    Ok(GradientFields { height, gx, gy })
}

/// Evaluate the full surface, normal included
#[allow(dead_code)]
pub fn evaluate(grid: &SamplingGrid, config: &WaveConfig) -> Result<SurfaceFields> {
    evaluate_gradient(grid, config)?.with_normal()
}
