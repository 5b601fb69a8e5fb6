use std::f64::consts::PI;

use crate::error::{Result, TextureError};

/// Which of the two wave textures to synthesize
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum WaveVariant {
    /// `wavy_depth.png` + `wavy_normal.png`
    Depth,
    /// `wavy_height.png` + `wavy_normalmap.png`
    Height,
}

impl WaveVariant {
    pub fn config(self) -> WaveConfig {
        match self {
            WaveVariant::Depth => WaveConfig::depth_variant(),
            WaveVariant::Height => WaveConfig::height_variant(),
        }
    }
}

/// Coordinates the gradient is differentiated against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientSpace {
    /// Partial derivatives with respect to (u, v)
    Uv,
    /// Partial derivatives with respect to the carrier phase (ω₀u, ω₀v)
    Phase,
}

/// How the height field becomes grayscale color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightEncoding {
    /// Min-max normalized, then inverted (`1 - c`)
    Depth,
    /// Min-max normalized
    #[allow(dead_code)]
    MinMax,
    /// Affine remap `0.5 + 0.5 * h`
    Signed,
}

/// Sign applied to the green (Y) channel of the normal map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalY {
    Preserved,
    Flipped,
}

impl NormalY {
    pub fn sign(self) -> f64 {
        match self {
            NormalY::Preserved => 1.0,
            NormalY::Flipped => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConvention {
    pub height: HeightEncoding,
    pub normal_y: NormalY,
}

/// Parameters of one wave texture pair
///
/// The phase is `φ = ω₀ (u + a cos(ω₁ v))` and the height `h = b cos(φ)`.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveConfig {
    /// Name used in logs and preview file names
    pub name: &'static str,
    /// Samples along each axis
    pub resolution: usize,
    /// Carrier angular frequency ω₀
    pub carrier_frequency: f64,
    /// Modulation angular frequency ω₁
    pub modulation_frequency: f64,
    /// Modulation amplitude a
    pub modulation_amplitude: f64,
    /// Height amplitude b, also the bound on |h|
    pub height_amplitude: f64,
    /// Scalar applied to the gradient only, never to the height
    pub gradient_scale_factor: f64,
    pub gradient_space: GradientSpace,
    pub color_convention: ColorConvention,
    /// File name of the height/depth texture
    pub height_file: &'static str,
    /// File name of the normal map
    pub normal_file: &'static str,
}

impl WaveConfig {
    /// Shallow depth waves with a Y-flipped normal map
    pub fn depth_variant() -> Self {
        WaveConfig {
            name: "wavy_depth",
            resolution: 512,
            carrier_frequency: 8.0 * PI,
            modulation_frequency: 2.0 * PI,
            modulation_amplitude: 0.05,
            height_amplitude: 0.03,
            gradient_scale_factor: 1.0,
            gradient_space: GradientSpace::Uv,
            color_convention: ColorConvention {
                height: HeightEncoding::Depth,
                normal_y: NormalY::Flipped,
            },
            height_file: "wavy_depth.png",
            normal_file: "wavy_normal.png",
        }
    }

    /// Unit height waves with a phase-space gradient scaled by 0.3
    pub fn height_variant() -> Self {
        WaveConfig {
            name: "wavy_height",
            resolution: 512,
            carrier_frequency: 8.0 * PI,
            modulation_frequency: 2.0 * PI,
            modulation_amplitude: 0.1,
            height_amplitude: 1.0,
            gradient_scale_factor: 0.3,
            gradient_space: GradientSpace::Phase,
            color_convention: ColorConvention {
                height: HeightEncoding::Signed,
                normal_y: NormalY::Preserved,
            },
            height_file: "wavy_height.png",
            normal_file: "wavy_normalmap.png",
        }
    }

    /// Factor mapping `b sin(φ) ∂φ/∂u` to the stored gx
    ///
    /// The gradient is `gx = -k b sin(φ) ω₀` and `gy = -k b sin(φ) ∂φ/∂v`.
    pub fn gradient_coefficient(&self) -> f64 {
        let space = match self.gradient_space {
            GradientSpace::Uv => 1.0,
            GradientSpace::Phase => 1.0 / self.carrier_frequency,
        };
        self.gradient_scale_factor * space
    }

    /// Upper bound of gx² + gy² over the whole domain
    ///
    /// |sin| ≤ 1 in both factors, so `|gx| ≤ k b ω₀` and
    /// `|gy| ≤ k b ω₀ a ω₁`.
    pub fn gradient_bound(&self) -> f64 {
        let gx_max = self.gradient_coefficient() * self.height_amplitude * self.carrier_frequency;
        let gy_ratio = self.modulation_amplitude * self.modulation_frequency;
        gx_max * gx_max * (1.0 + gy_ratio * gy_ratio)
    }

    /// Reject parameter sets the synthesis cannot honor
    ///
    /// Runs before any field is evaluated; a gradient that could leave the
    /// unit disk is a configuration bug, not something to clamp later.
    pub fn validate(&self) -> Result<()> {
        let fail = |reason: String| Err(TextureError::invalid_config(self.name, reason));

        if self.resolution < 2 {
            return fail(format!("resolution must be at least 2, got {}", self.resolution));
        }
        let finite = [
            ("carrier_frequency", self.carrier_frequency),
            ("modulation_frequency", self.modulation_frequency),
            ("modulation_amplitude", self.modulation_amplitude),
            ("height_amplitude", self.height_amplitude),
            ("gradient_scale_factor", self.gradient_scale_factor),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return fail(format!("{} must be finite, got {}", field, value));
            }
        }
        if self.carrier_frequency <= 0.0 {
            return fail(format!(
                "carrier_frequency must be positive, got {}",
                self.carrier_frequency
            ));
        }
        if self.modulation_frequency < 0.0 {
            return fail(format!(
                "modulation_frequency must not be negative, got {}",
                self.modulation_frequency
            ));
        }
        if self.modulation_amplitude < 0.0 {
            return fail(format!(
                "modulation_amplitude must not be negative, got {}",
                self.modulation_amplitude
            ));
        }
        if self.height_amplitude <= 0.0 {
            return fail(format!(
                "height_amplitude must be positive, got {}",
                self.height_amplitude
            ));
        }
        if self.gradient_scale_factor <= 0.0 {
            return fail(format!(
                "gradient_scale_factor must be positive, got {}",
                self.gradient_scale_factor
            ));
        }

        let bound = self.gradient_bound();
        if bound > 1.0 {
            return fail(format!(
                "gradient may leave the unit disk: max gx^2 + gy^2 is {:.4}",
                bound
            ));
        }

        Ok(())
    }
}
