//! Regular evaluation grids around one or more point clouds.
//!
//! The domain is the union extent of the clouds expanded by a constant
//! additive `padding` on every side. The padding is absolute, in data units:
//! two datasets with very different coordinate ranges that share one padding
//! value can end up with a grid that is too tight for one and too loose for
//! the other, so callers overlaying such datasets should pick the padding per
//! dataset (see [`FramePolicy`](crate::pipeline::FramePolicy)).

use crate::cloud::{Extent, PointCloud};
use crate::error::{Axis, Error, Result};

/// Number of evaluation points along each axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resolution {
    /// Points along x (grid columns).
    pub nx: usize,
    /// Points along y (grid rows).
    pub ny: usize,
}

impl Resolution {
    /// Same number of points on both axes.
    #[must_use]
    pub const fn square(n: usize) -> Self {
        Self { nx: n, ny: n }
    }

    /// Total number of grid points.
    #[must_use]
    pub const fn len(self) -> usize {
        self.nx * self.ny
    }

    /// `true` if either axis has no points.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.nx == 0 || self.ny == 0
    }

    pub(crate) fn validate(self) -> Result<()> {
        if self.nx < 2 || self.ny < 2 {
            return Err(Error::InvalidResolution {
                nx: self.nx,
                ny: self.ny,
            });
        }
        Ok(())
    }
}

impl From<usize> for Resolution {
    fn from(n: usize) -> Self {
        Self::square(n)
    }
}

/// A rectangular mesh of evaluation points.
///
/// Values on the grid are laid out row-major: row `i` runs along x at
/// `y_axis()[i]`, so the point at `(row, col)` is
/// `(x_axis()[col], y_axis()[row])`. This is the `meshgrid` convention used
/// by contour renderers.
///
/// A deserialized grid is rebuilt from its bounds and axis lengths, so it
/// satisfies the same invariants as one from [`build_grid`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Grid {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    x_axis: Vec<f64>,
    y_axis: Vec<f64>,
}

/// Build a grid covering every cloud in `clouds`, padded by `padding`.
///
/// Bounds are `min - padding` and `max + padding` of the union on each axis.
///
/// # Errors
///
/// Returns `Error::EmptyDomain` if `clouds` is empty.
/// Returns `Error::InvalidPadding` if `padding` is negative or not finite.
/// Returns `Error::InvalidResolution` if either axis has fewer than 2 points.
/// Returns `Error::DegenerateDomain` if an axis has zero width.
///
/// # Examples
///
/// ```
/// use kde_contour::{PointCloud, Resolution, build_grid};
///
/// let cloud = PointCloud::from_arrays(&[0.0, 1.0], &[2.0, 4.0]).unwrap();
/// let grid = build_grid(&[&cloud], 0.5, Resolution::square(5)).unwrap();
/// assert_eq!(grid.x_bounds(), (-0.5, 1.5));
/// assert_eq!(grid.y_bounds(), (1.5, 4.5));
/// ```
pub fn build_grid(clouds: &[&PointCloud], padding: f64, resolution: Resolution) -> Result<Grid> {
    let extent = clouds
        .iter()
        .map(|cloud| cloud.extent())
        .reduce(Extent::union)
        .ok_or(Error::EmptyDomain)?;
    Grid::from_extent(extent, padding, resolution)
}

impl Grid {
    /// Build a grid around a single cloud.
    ///
    /// # Errors
    ///
    /// See [`build_grid`].
    pub fn around(cloud: &PointCloud, padding: f64, resolution: Resolution) -> Result<Self> {
        build_grid(&[cloud], padding, resolution)
    }

    /// Build a grid from an explicit extent plus padding.
    ///
    /// # Errors
    ///
    /// Same as [`build_grid`], minus `EmptyDomain`.
    pub fn from_extent(extent: Extent, padding: f64, resolution: Resolution) -> Result<Self> {
        if !padding.is_finite() || padding < 0.0 {
            return Err(Error::InvalidPadding(padding));
        }
        resolution.validate()?;

        let x_min = extent.x_min - padding;
        let x_max = extent.x_max + padding;
        let y_min = extent.y_min - padding;
        let y_max = extent.y_max + padding;

        if !(x_min.is_finite() && x_max.is_finite()) || x_min >= x_max {
            return Err(Error::DegenerateDomain { axis: Axis::X });
        }
        if !(y_min.is_finite() && y_max.is_finite()) || y_min >= y_max {
            return Err(Error::DegenerateDomain { axis: Axis::Y });
        }

        let grid = Self {
            x_min,
            x_max,
            y_min,
            y_max,
            x_axis: linspace(x_min, x_max, resolution.nx),
            y_axis: linspace(y_min, y_max, resolution.ny),
        };
        trace_debug!(
            x_min,
            x_max,
            y_min,
            y_max,
            nx = resolution.nx,
            ny = resolution.ny,
            "grid built"
        );
        Ok(grid)
    }

    /// `(x_min, x_max)` of the domain.
    #[must_use]
    pub fn x_bounds(&self) -> (f64, f64) {
        (self.x_min, self.x_max)
    }

    /// `(y_min, y_max)` of the domain.
    #[must_use]
    pub fn y_bounds(&self) -> (f64, f64) {
        (self.y_min, self.y_max)
    }

    /// Evaluation coordinates along x, ascending, with exact end points.
    #[must_use]
    pub fn x_axis(&self) -> &[f64] {
        &self.x_axis
    }

    /// Evaluation coordinates along y, ascending, with exact end points.
    #[must_use]
    pub fn y_axis(&self) -> &[f64] {
        &self.y_axis
    }

    /// Points per axis.
    #[must_use]
    pub fn resolution(&self) -> Resolution {
        Resolution {
            nx: self.x_axis.len(),
            ny: self.y_axis.len(),
        }
    }

    /// Distance between neighbouring points as `(dx, dy)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn spacing(&self) -> (f64, f64) {
        (
            (self.x_max - self.x_min) / (self.x_axis.len() - 1) as f64,
            (self.y_max - self.y_min) / (self.y_axis.len() - 1) as f64,
        )
    }

    /// Area of one grid cell.
    #[must_use]
    pub fn cell_area(&self) -> f64 {
        let (dx, dy) = self.spacing();
        dx * dy
    }

    /// Whether `(x, y)` lies inside the closed domain.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.x_min..=self.x_max).contains(&x) && (self.y_min..=self.y_max).contains(&y)
    }

    /// `(row, col)` of the grid point nearest `(x, y)`.
    ///
    /// Coordinates outside the domain snap to the closest edge.
    #[must_use]
    pub fn nearest_index(&self, x: f64, y: f64) -> (usize, usize) {
        (nearest(&self.y_axis, y), nearest(&self.x_axis, x))
    }

    /// The x-coordinate matrix, `ny` rows of `nx` columns.
    #[must_use]
    pub fn x_mesh(&self) -> Vec<Vec<f64>> {
        self.y_axis.iter().map(|_| self.x_axis.clone()).collect()
    }

    /// The y-coordinate matrix, `ny` rows of `nx` columns.
    #[must_use]
    pub fn y_mesh(&self) -> Vec<Vec<f64>> {
        self.y_axis
            .iter()
            .map(|&y| vec![y; self.x_axis.len()])
            .collect()
    }

    /// Every grid point as `(x, y)`, row-major.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.y_axis
            .iter()
            .flat_map(move |&y| self.x_axis.iter().map(move |&x| (x, y)))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Grid {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> core::result::Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw {
            x_min: f64,
            x_max: f64,
            y_min: f64,
            y_max: f64,
            x_axis: Vec<f64>,
            y_axis: Vec<f64>,
        }

        let raw = <Raw as serde::Deserialize>::deserialize(deserializer)?;
        let extent = Extent {
            x_min: raw.x_min,
            x_max: raw.x_max,
            y_min: raw.y_min,
            y_max: raw.y_max,
        };
        let resolution = Resolution {
            nx: raw.x_axis.len(),
            ny: raw.y_axis.len(),
        };
        Self::from_extent(extent, 0.0, resolution)
            .map_err(<D::Error as serde::de::Error>::custom)
    }
}

/// `n` evenly spaced values from `low` to `high`, both included.
#[allow(clippy::cast_precision_loss)]
fn linspace(low: f64, high: f64, n: usize) -> Vec<f64> {
    let step = (high - low) / (n - 1) as f64;
    let mut values: Vec<f64> = (0..n).map(|i| low + i as f64 * step).collect();
    // Pin the end point so it matches the bound exactly.
    if let Some(last) = values.last_mut() {
        *last = high;
    }
    values
}

/// Index of the value in ascending `axis` closest to `v`.
fn nearest(axis: &[f64], v: f64) -> usize {
    let upper = axis.partition_point(|&a| a < v);
    if upper == 0 {
        return 0;
    }
    if upper == axis.len() {
        return axis.len() - 1;
    }
    if v - axis[upper - 1] <= axis[upper] - v {
        upper - 1
    } else {
        upper
    }
}
