//! Color encoding of height and normal fields
//!
//! Two conventions turn signed fields into [0, 1] color channels:
//! min-max normalization for height/depth, and the affine remap
//! `0.5 + 0.5 * x` for signed heights and normal maps.
//!
//! Buffers are transposed relative to the sampling grid: image pixel
//! (x, y) holds the sample at row x, column y. The carrier axis u therefore
//! runs down the image and the wave crests lie along image rows.

use crate::config::{ColorConvention, HeightEncoding, NormalY};
use crate::error::{Result, TextureError};
use crate::field::SurfaceFields;
use crate::grid::Array2D;

/// R x R x 3 color values in [0, 1], row-major in image order
#[derive(Debug, Clone, PartialEq)]
pub struct ColorBuffer {
    width: usize,
    height: usize,
    pixels: Vec<[f64; 3]>,
}

impl ColorBuffer {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[allow(dead_code)]
    pub fn pixels(&self) -> &[[f64; 3]] {
        &self.pixels
    }

    #[allow(dead_code)]
    pub fn get(&self, x: usize, y: usize) -> Option<[f64; 3]> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Smallest and largest value over all channels
    pub fn range(&self) -> (f64, f64) {
        self.pixels
            .iter()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &c| {
                (lo.min(c), hi.max(c))
            })
    }

    /// Build the transposed image of a grid-shaped field
    ///
    /// `sample(i)` receives the row-major grid index of the sample that
    /// lands on each pixel.
    fn transposed<F>(grid_width: usize, grid_height: usize, sample: F) -> Self
    where
        F: Fn(usize) -> [f64; 3],
    {
        let mut pixels = Vec::with_capacity(grid_width * grid_height);
        for image_y in 0..grid_width {
            for image_x in 0..grid_height {
                pixels.push(sample(image_x * grid_width + image_y));
            }
        }
        ColorBuffer {
            width: grid_height,
            height: grid_width,
            pixels,
        }
    }

    /// Same value on all three channels
    fn grayscale(field: &Array2D) -> Self {
        let values = field.values();
        Self::transposed(field.width(), field.height(), |i| {
            let c = values[i];
            [c, c, c]
        })
    }

    /// Quantize to 8 bits per channel, rounding to nearest
    ///
    /// # Returns
    /// * `Vec<[u8; 3]>` - RGB bytes, row-major
    pub fn to_rgb8(&self) -> Vec<[u8; 3]> {
        self.pixels
            .iter()
            .map(|pixel| pixel.map(|c| (c * 255.0).round().clamp(0.0, 255.0) as u8))
            .collect()
    }
}

/// Affine remap of a signed value in [-1, 1] to [0, 1]
pub fn affine_remap(x: f64) -> f64 {
    0.5 + 0.5 * x
}

/// Inverse of [`affine_remap`]
#[allow(dead_code)]
pub fn affine_unmap(c: f64) -> f64 {
    2.0 * (c - 0.5)
}

/// Min-max normalize a field to exactly [0, 1], broadcast to gray
///
/// A constant field has no range to stretch and maps to 0 everywhere.
pub fn encode_min_max(height: &Array2D) -> ColorBuffer {
    let min = height.min();
    let range = height.max() - min;
    let normalized = if range > 0.0 {
        height.map(|h| (h - min) / range)
    } else {
        height.map(|_| 0.0)
    };
    ColorBuffer::grayscale(&normalized)
}

/// Min-max normalize, then invert so the highest point is black
pub fn encode_depth(height: &Array2D) -> ColorBuffer {
    let mut buffer = encode_min_max(height);
    for pixel in &mut buffer.pixels {
        *pixel = pixel.map(|c| 1.0 - c);
    }
    buffer
}

/// Affine remap of a signed height, broadcast to gray
pub fn encode_signed(height: &Array2D) -> ColorBuffer {
    ColorBuffer::grayscale(&height.map(affine_remap))
}

pub fn encode_height(height: &Array2D, encoding: HeightEncoding) -> ColorBuffer {
    match encoding {
        HeightEncoding::Depth => encode_depth(height),
        HeightEncoding::MinMax => encode_min_max(height),
        HeightEncoding::Signed => encode_signed(height),
    }
}

/// Encode a unit normal field as RGB
///
/// R = ½ + ½gx, G = ½ ± ½gy (per `normal_y`), B = ½ + ½gz.
pub fn encode_normal_map(
    gx: &Array2D,
    gy: &Array2D,
    gz: &Array2D,
    normal_y: NormalY,
) -> Result<ColorBuffer> {
    let shape = gx.shape();
    for (field, grid) in [("gy", gy), ("gz", gz)] {
        if grid.shape() != shape {
            return Err(TextureError::ShapeMismatch {
                field,
                expected: shape,
                found: grid.shape(),
            });
        }
    }

    let sign = normal_y.sign();
    let (x, y, z) = (gx.values(), gy.values(), gz.values());
    Ok(ColorBuffer::transposed(gx.width(), gx.height(), |i| {
        [affine_remap(x[i]), affine_remap(sign * y[i]), affine_remap(z[i])]
    }))
}

/// Height/depth and normal-map buffers for one checked surface
pub fn encode_surface(
    fields: &SurfaceFields,
    convention: ColorConvention,
) -> Result<(ColorBuffer, ColorBuffer)> {
    let height = encode_height(&fields.height, convention.height);
    let normal = encode_normal_map(&fields.gx, &fields.gy, &fields.gz, convention.normal_y)?;
    Ok((height, normal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WaveConfig;
    use crate::field::evaluate;
    use crate::grid::sample_grid;
    use rand::prelude::*;

    #[test]
    fn test_min_max_is_onto_unit_interval() {
        let field = Array2D::from_fn(8, 8, |x, y| (x as f64 * 0.7).sin() - y as f64 * 0.01);
        let buffer = encode_min_max(&field);
        assert_eq!(buffer.range(), (0.0, 1.0));
        assert!(buffer.pixels().iter().all(|p| p[0] == p[1] && p[1] == p[2]));
    }

    #[test]
    fn test_min_max_is_idempotent() {
        let field = Array2D::from_fn(8, 8, |x, y| (x * y) as f64 - 9.0);
        let once = encode_min_max(&field);
        // Undo the transpose so the second pass sees the same layout
        let red = Array2D::from_fn(8, 8, |x, y| once.get(y, x).unwrap()[0]);
        let twice = encode_min_max(&red);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_min_max_constant_field() {
        let buffer = encode_min_max(&Array2D::new(4, 4, 0.3));
        assert_eq!(buffer.range(), (0.0, 0.0));
    }

    #[test]
    fn test_depth_inverts_min_max() {
        let field = Array2D::from_fn(4, 1, |x, _| x as f64);
        let depth = encode_depth(&field);
        assert_eq!(depth.get(0, 0), Some([1.0, 1.0, 1.0]));
        assert_eq!(depth.get(0, 3), Some([0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_depth_variant_buffer_spans_unit_interval() {
        let config = WaveConfig::depth_variant();
        let grid = sample_grid(config.resolution);
        let fields = evaluate(&grid, &config).unwrap();
        let depth = encode_height(&fields.height, config.color_convention.height);
        assert_eq!(depth.range(), (0.0, 1.0));
        assert_eq!((depth.width(), depth.height()), (512, 512));
    }

    #[test]
    fn test_affine_remap_round_trip() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let x: f64 = rng.gen_range(-1.0..=1.0);
            let c = affine_remap(x);
            assert!((0.0..=1.0).contains(&c));
            assert!((affine_unmap(c) - x).abs() < 1e-15);
        }
        assert_eq!(affine_remap(-1.0), 0.0);
        assert_eq!(affine_remap(1.0), 1.0);
    }

    #[test]
    fn test_signed_height_encoding() {
        let field = Array2D::from_fn(3, 1, |x, _| x as f64 - 1.0);
        let buffer = encode_signed(&field);
        assert_eq!(buffer.get(0, 0), Some([0.0, 0.0, 0.0]));
        assert_eq!(buffer.get(0, 1), Some([0.5, 0.5, 0.5]));
        assert_eq!(buffer.get(0, 2), Some([1.0, 1.0, 1.0]));
    }

    #[test]
    fn test_normal_map_y_conventions() {
        let gx = Array2D::new(1, 1, 0.6);
        let gy = Array2D::new(1, 1, 0.0);
        let gz = Array2D::new(1, 1, 0.8);
        let tilted_y = Array2D::new(1, 1, 0.6);
        let upright = Array2D::new(1, 1, 0.0);

        let preserved = encode_normal_map(&upright, &tilted_y, &gz, NormalY::Preserved).unwrap();
        let flipped = encode_normal_map(&upright, &tilted_y, &gz, NormalY::Flipped).unwrap();
        assert!((preserved.get(0, 0).unwrap()[1] - 0.8).abs() < 1e-12);
        assert!((flipped.get(0, 0).unwrap()[1] - 0.2).abs() < 1e-12);

        let pixel = encode_normal_map(&gx, &gy, &gz, NormalY::Flipped).unwrap().get(0, 0).unwrap();
        assert!((pixel[0] - 0.8).abs() < 1e-12);
        assert_eq!(pixel[1], 0.5);
        assert!((pixel[2] - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_flat_normal_quantizes_to_128_128_255() {
        let flat = encode_normal_map(
            &Array2D::new(2, 2, 0.0),
            &Array2D::new(2, 2, 0.0),
            &Array2D::new(2, 2, 1.0),
            NormalY::Flipped,
        )
        .unwrap();
        assert!(flat.to_rgb8().iter().all(|&p| p == [128, 128, 255]));
    }

    #[test]
    fn test_normal_map_shape_mismatch() {
        let result = encode_normal_map(
            &Array2D::new(2, 2, 0.0),
            &Array2D::new(2, 2, 0.0),
            &Array2D::new(3, 2, 1.0),
            NormalY::Preserved,
        );
        assert!(matches!(result, Err(TextureError::ShapeMismatch { field: "gz", .. })));
    }

    #[test]
    fn test_encode_surface_stays_in_unit_interval() {
        for config in [WaveConfig::depth_variant(), WaveConfig::height_variant()] {
            let grid = sample_grid(64);
            let fields = evaluate(&grid, &config).unwrap();
            let (height, normal) = encode_surface(&fields, config.color_convention).unwrap();
            for buffer in [height, normal] {
                let (lo, hi) = buffer.range();
                assert!(lo >= 0.0 && hi <= 1.0, "range ({}, {})", lo, hi);
            }
        }
    }

    #[test]
    fn test_buffers_are_transposed() {
        // 3 columns x 2 rows, every sample distinct
        let field = Array2D::from_fn(3, 2, |x, y| (y * 3 + x) as f64 / 5.0 * 2.0 - 1.0);
        let gray = encode_signed(&field);
        assert_eq!((gray.width(), gray.height()), (2, 3));
        for (x, y, value) in field.indexed_iter() {
            // Grid (col x, row y) lands on image (x = y, y = x)
            assert_eq!(gray.get(y, x).unwrap()[0], affine_remap(value));
        }

        let gx = Array2D::from_fn(3, 2, |x, _| x as f64 * 0.1);
        let gy = Array2D::from_fn(3, 2, |_, y| y as f64 * 0.2);
        let gz = gx.zip_map(&gy, |x, y| (1.0 - x * x - y * y).sqrt()).unwrap();
        let normal = encode_normal_map(&gx, &gy, &gz, NormalY::Flipped).unwrap();
        assert_eq!((normal.width(), normal.height()), (2, 3));
        let pixel = normal.get(1, 2).unwrap();
        assert_eq!(pixel[0], affine_remap(0.2));
        assert_eq!(pixel[1], affine_remap(-0.2));
    }
}
