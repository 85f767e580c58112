//! Density values sampled on a grid.

#[cfg(feature = "serde")]
use crate::error::Error;
use crate::grid::{Grid, Resolution};

/// Estimated density at every point of a [`Grid`], row-major.
///
/// Entry `(row, col)` is the density at `(grid.x_axis()[col], grid.y_axis()[row])`.
/// All entries are finite and non-negative. The values are a window onto a
/// surface that integrates to 1 over the whole plane; they are not
/// renormalized to the grid.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DensityMatrix {
    nx: usize,
    ny: usize,
    values: Vec<f64>,
}

impl DensityMatrix {
    pub(crate) fn from_values(resolution: Resolution, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), resolution.len());
        Self {
            nx: resolution.nx,
            ny: resolution.ny,
            values,
        }
    }

    /// `(rows, columns)`, i.e. `(ny, nx)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.ny, self.nx)
    }

    /// Flat row-major values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value at `(row, col)`, or `None` when out of range.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.ny && col < self.nx {
            Some(self.values[row * self.nx + col])
        } else {
            None
        }
    }

    /// Iterate over rows as slices of length `nx`.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.nx)
    }

    /// Copy into nested rows, the shape contour renderers expect.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }

    /// Largest value.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Smallest value.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// `(row, col)` of the largest value; the first one on ties.
    #[must_use]
    pub fn argmax(&self) -> (usize, usize) {
        let mut best = 0;
        for (i, &v) in self.values.iter().enumerate() {
            if v > self.values[best] {
                best = i;
            }
        }
        (best / self.nx, best % self.nx)
    }

    /// `n` evenly spaced filled-contour levels from the minimum to the
    /// maximum value, both included. At least two levels are returned.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn contour_levels(&self, n: usize) -> Vec<f64> {
        let n = n.max(2);
        let (lo, hi) = (self.min(), self.max());
        let step = (hi - lo) / (n - 1) as f64;
        (0..n)
            .map(|i| if i == n - 1 { hi } else { lo + i as f64 * step })
            .collect()
    }

    /// Riemann-sum estimate of the probability mass inside `grid`.
    ///
    /// Close to 1 only when the grid covers essentially all of the kernel
    /// mass.
    #[must_use]
    pub fn mass(&self, grid: &Grid) -> f64 {
        debug_assert_eq!(grid.resolution(), Resolution { nx: self.nx, ny: self.ny });
        self.values.iter().sum::<f64>() * grid.cell_area()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for DensityMatrix {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> core::result::Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw {
            nx: usize,
            ny: usize,
            values: Vec<f64>,
        }

        let raw = <Raw as serde::Deserialize>::deserialize(deserializer)?;
        let resolution = Resolution {
            nx: raw.nx,
            ny: raw.ny,
        };
        resolution.validate().map_err(<D::Error as serde::de::Error>::custom)?;
        if raw.nx.checked_mul(raw.ny) != Some(raw.values.len()) {
            return Err(serde::de::Error::custom(Error::ShapeMismatch {
                rows: raw.ny,
                cols: raw.nx,
                len: raw.values.len(),
            }));
        }
        if let Some(&bad) = raw.values.iter().find(|v| !(v.is_finite() && **v >= 0.0)) {
            return Err(serde::de::Error::custom(Error::InvalidDensityValue(bad)));
        }
        Ok(Self::from_values(resolution, raw.values))
    }
}
