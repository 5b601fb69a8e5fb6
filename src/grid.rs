//! Row-major 2D grids and the (u, v) sampling domain
//!
//! Every field in the pipeline (coordinates, phase, height, gradient) is an
//! `Array2D` of the same shape. Transformations always build a new grid.

/// A dense row-major grid of f64 samples, indexed as (x, y) = (column, row)
#[derive(Debug, Clone, PartialEq)]
pub struct Array2D {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl Array2D {
    /// Create a grid filled with a single value
    #[allow(dead_code)]
    pub fn new(width: usize, height: usize, fill: f64) -> Self {
        Array2D {
            width,
            height,
            data: vec![fill; width * height],
        }
    }

    /// Build a grid by evaluating `f(x, y)` at every cell
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Array2D { width, height, data }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x < self.width && y < self.height {
            Some(self.data[y * self.width + x])
        } else {
            None
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Iterate over `(x, y, value)` in row-major order
    pub fn indexed_iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let width = self.width;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, &value)| (i % width, i / width, value))
    }

    /// Apply `f` elementwise, producing a new grid of the same shape
    pub fn map<F>(&self, f: F) -> Array2D
    where
        F: Fn(f64) -> f64,
    {
        Array2D {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&value| f(value)).collect(),
        }
    }

    /// Combine two grids of identical shape elementwise
    ///
    /// Returns `None` when the shapes differ.
    pub fn zip_map<F>(&self, other: &Array2D, f: F) -> Option<Array2D>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.shape() != other.shape() {
            return None;
        }
        Some(Array2D {
            width: self.width,
            height: self.height,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }

    /// Smallest value in the grid (`+inf` when empty)
    pub fn min(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest value in the grid (`-inf` when empty)
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// The parametric domain (u, v) in [0, 1] x [0, 1]
///
/// `u` varies along x (columns), `v` along y (rows).
#[derive(Debug, Clone)]
pub struct SamplingGrid {
    pub u: Array2D,
    pub v: Array2D,
}

impl SamplingGrid {
    #[allow(dead_code)]
    pub fn resolution(&self) -> usize {
        self.u.width()
    }
}

/// Evenly spaced samples from 0.0 to 1.0 inclusive, like `linspace(0, 1, n)`
///
/// The last sample is pinned to exactly 1.0.
fn linspace_unit(count: usize) -> Vec<f64> {
    let step = 1.0 / (count - 1) as f64;
    (0..count)
        .map(|i| if i == count - 1 { 1.0 } else { i as f64 * step })
        .collect()
}

/// Build the R x R sampling grid
///
/// `u[y][x] = x / (R - 1)` and `v[y][x] = y / (R - 1)`. Callers validate
/// `resolution >= 2` through `WaveConfig::validate`.
///
/// # Arguments
/// * `resolution` - Number of samples along each axis
///
/// # Returns
/// * `SamplingGrid` - Coordinate grids of shape R x R
pub fn sample_grid(resolution: usize) -> SamplingGrid {
    let axis = linspace_unit(resolution);
    let u = Array2D::from_fn(resolution, resolution, |x, _| axis[x]);
    let v = Array2D::from_fn(resolution, resolution, |_, y| axis[y]);
    SamplingGrid { u, v }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_grid_shape() {
        for resolution in [2, 3, 17, 64] {
            let grid = sample_grid(resolution);
            assert_eq!(grid.u.shape(), (resolution, resolution));
            assert_eq!(grid.v.shape(), (resolution, resolution));
            assert_eq!(grid.resolution(), resolution);
        }
    }

    #[test]
    fn test_sample_grid_endpoints_exact() {
        let resolution = 512;
        let grid = sample_grid(resolution);
        for y in 0..resolution {
            assert_eq!(grid.u.get(0, y), Some(0.0));
            assert_eq!(grid.u.get(resolution - 1, y), Some(1.0));
        }
        for x in 0..resolution {
            assert_eq!(grid.v.get(x, 0), Some(0.0));
            assert_eq!(grid.v.get(x, resolution - 1), Some(1.0));
        }
    }

    #[test]
    fn test_sample_grid_monotonic_and_replicated() {
        let resolution = 33;
        let grid = sample_grid(resolution);
        for y in 0..resolution {
            for x in 1..resolution {
                let prev = grid.u.get(x - 1, y).unwrap();
                let curr = grid.u.get(x, y).unwrap();
                assert!(curr >= prev, "u must not decrease along x");
                // Same column, every row
                assert_eq!(grid.u.get(x, y), grid.u.get(x, 0));
            }
        }
        for x in 0..resolution {
            for y in 1..resolution {
                assert!(grid.v.get(x, y).unwrap() >= grid.v.get(x, y - 1).unwrap());
                assert_eq!(grid.v.get(x, y), grid.v.get(0, y));
            }
        }
    }

    #[test]
    fn test_sample_grid_uniform_spacing() {
        let grid = sample_grid(5);
        let row: Vec<f64> = (0..5).map(|x| grid.u.get(x, 2).unwrap()).collect();
        assert_eq!(row, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_zip_map_rejects_shape_mismatch() {
        let a = Array2D::new(3, 3, 1.0);
        let b = Array2D::new(3, 4, 1.0);
        assert!(a.zip_map(&b, |x, y| x + y).is_none());

        let c = a.zip_map(&Array2D::new(3, 3, 2.0), |x, y| x + y).unwrap();
        assert!(c.values().iter().all(|&value| value == 3.0));
    }

    #[test]
    fn test_min_max_and_indexed_iter() {
        let grid = Array2D::from_fn(4, 2, |x, y| (x as f64) - (y as f64) * 10.0);
        assert_eq!(grid.min(), -10.0);
        assert_eq!(grid.max(), 3.0);
        assert_eq!(grid.get(4, 0), None);

        let cells: Vec<(usize, usize, f64)> = grid.indexed_iter().collect();
        assert_eq!(cells[0], (0, 0, 0.0));
        assert_eq!(cells[5], (1, 1, -9.0));
    }
}
