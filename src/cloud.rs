//! Two-dimensional point clouds in analysis coordinates.

use crate::error::{Error, Result};

/// Minimum number of points a cloud must hold.
pub const MIN_POINTS: usize = 2;

/// An ordered set of finite `(x, y)` coordinates.
///
/// Coordinates are already in the space the density is estimated in (for
/// example `log10` of a physical quantity). A cloud always holds at least
/// [`MIN_POINTS`] finite points and is never modified after construction.
/// With the `serde` feature, deserialization goes through the same checks as
/// [`from_arrays`](Self::from_arrays).
///
/// # Examples
///
/// ```
/// use kde_contour::PointCloud;
///
/// let cloud = PointCloud::from_arrays(&[1.0, 2.0, f64::NAN], &[3.0, 4.0, 5.0]).unwrap();
/// assert_eq!(cloud.len(), 2);
/// assert_eq!(cloud.discarded(), 1);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PointCloud {
    xs: Vec<f64>,
    ys: Vec<f64>,
    discarded: usize,
}

/// Axis-aligned extent of a set of points.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extent {
    /// Smallest x-value.
    pub x_min: f64,
    /// Largest x-value.
    pub x_max: f64,
    /// Smallest y-value.
    pub y_min: f64,
    /// Largest y-value.
    pub y_max: f64,
}

impl Extent {
    /// Smallest extent that covers both `self` and `other`.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            x_min: self.x_min.min(other.x_min),
            x_max: self.x_max.max(other.x_max),
            y_min: self.y_min.min(other.y_min),
            y_max: self.y_max.max(other.y_max),
        }
    }
}

impl PointCloud {
    /// Build a cloud from parallel coordinate arrays.
    ///
    /// Pairs where either coordinate is not finite are treated as masked by
    /// the caller and dropped.
    ///
    /// # Errors
    ///
    /// Returns `Error::LengthMismatch` if `xs` and `ys` differ in length.
    /// Returns `Error::TooFewPoints` if fewer than [`MIN_POINTS`] finite pairs remain.
    pub fn from_arrays(xs: &[f64], ys: &[f64]) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(Error::LengthMismatch {
                x_len: xs.len(),
                y_len: ys.len(),
            });
        }

        let (kept_x, kept_y): (Vec<f64>, Vec<f64>) = xs
            .iter()
            .zip(ys)
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|(&x, &y)| (x, y))
            .unzip();

        Self::from_parts(kept_x, kept_y, xs.len())
    }

    /// Wrap already-filtered coordinates, recording how many of `raw_len`
    /// input pairs were dropped on the way.
    pub(crate) fn from_parts(xs: Vec<f64>, ys: Vec<f64>, raw_len: usize) -> Result<Self> {
        debug_assert_eq!(xs.len(), ys.len());
        debug_assert!(xs.iter().chain(&ys).all(|v| v.is_finite()));

        if xs.len() < MIN_POINTS {
            return Err(Error::TooFewPoints {
                got: xs.len(),
                required: MIN_POINTS,
            });
        }

        let discarded = raw_len - xs.len();
        Ok(Self { xs, ys, discarded })
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Always `false`; a cloud holds at least [`MIN_POINTS`] points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// The x-coordinates, in input order.
    #[must_use]
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// The y-coordinates, in input order.
    #[must_use]
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Number of input pairs excluded while building the cloud.
    #[must_use]
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Iterate over the points as `(x, y)` pairs.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    /// Per-axis minimum and maximum.
    #[must_use]
    pub fn extent(&self) -> Extent {
        let (x_min, x_max) = min_max(&self.xs);
        let (y_min, y_max) = min_max(&self.ys);
        Extent {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Arithmetic mean of each axis.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean(&self) -> (f64, f64) {
        let n = self.len() as f64;
        (
            self.xs.iter().sum::<f64>() / n,
            self.ys.iter().sum::<f64>() / n,
        )
    }

    /// Whether every point has the same coordinates.
    #[must_use]
    pub fn is_coincident(&self) -> bool {
        let (x0, y0) = (self.xs[0], self.ys[0]);
        self.points().all(|(x, y)| x == x0 && y == y0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PointCloud {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> core::result::Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw {
            xs: Vec<f64>,
            ys: Vec<f64>,
            #[serde(default)]
            discarded: usize,
        }

        let raw = <Raw as serde::Deserialize>::deserialize(deserializer)?;
        let mut cloud = Self::from_arrays(&raw.xs, &raw.ys)
            .map_err(<D::Error as serde::de::Error>::custom)?;
        cloud.discarded = cloud.discarded.saturating_add(raw.discarded);
        Ok(cloud)
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}
