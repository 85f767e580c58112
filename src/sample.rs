//! Sample providers: seeded synthetic clouds and transformed catalog data.
//!
//! Every unit conversion happens here, at the provider boundary. Grid
//! building and density estimation only ever see finite coordinates that are
//! already in analysis space, so a raw zero can never turn into a NaN deep
//! inside the density computation.

use crate::cloud::PointCloud;
use crate::error::{Error, Result};
use crate::rng_util;

/// Conversion applied to one raw axis before it enters a [`PointCloud`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AxisTransform {
    /// Use the raw value as is.
    #[default]
    Identity,
    /// Base-10 logarithm. Non-positive raw values are undefined and the
    /// whole pair is excluded.
    Log10,
    /// Subtract a constant offset (`raw - offset`).
    Shift(f64),
}

impl AxisTransform {
    /// Apply the transform, returning `None` where the result is undefined.
    #[must_use]
    pub fn apply(self, raw: f64) -> Option<f64> {
        let value = match self {
            Self::Identity => raw,
            Self::Log10 if raw > 0.0 => raw.log10(),
            Self::Log10 => return None,
            Self::Shift(offset) => raw - offset,
        };
        value.is_finite().then_some(value)
    }
}

/// Draw a synthetic cloud of `n` points around `(center, center)`.
///
/// All `n` x-values are drawn first, then all `n` y-values, each from a
/// normal distribution with mean `center` and standard deviation `spread`.
/// The generator is seeded with `seed` on every call, so identical arguments
/// always give bit-identical clouds.
///
/// # Errors
///
/// Returns `Error::TooFewPoints` if `n < 2`.
/// Returns `Error::InvalidDistribution` if `center` is not finite or
/// `spread` is negative or not finite.
///
/// # Examples
///
/// ```
/// use kde_contour::sample::generate;
///
/// let a = generate(50, 3.0, 0.01, 42).unwrap();
/// let b = generate(50, 3.0, 0.01, 42).unwrap();
/// assert_eq!(a, b);
/// ```
pub fn generate(n: usize, center: f64, spread: f64, seed: u64) -> Result<PointCloud> {
    if !center.is_finite() {
        return Err(Error::InvalidDistribution {
            name: "center",
            value: center,
        });
    }
    if !spread.is_finite() || spread < 0.0 {
        return Err(Error::InvalidDistribution {
            name: "spread",
            value: spread,
        });
    }
    if n < crate::cloud::MIN_POINTS {
        return Err(Error::TooFewPoints {
            got: n,
            required: crate::cloud::MIN_POINTS,
        });
    }

    let mut rng = fastrand::Rng::with_seed(seed);
    let xs: Vec<f64> = (0..n)
        .map(|_| rng_util::normal(&mut rng, center, spread))
        .collect();
    let ys: Vec<f64> = (0..n)
        .map(|_| rng_util::normal(&mut rng, center, spread))
        .collect();

    trace_debug!(n, center, spread, seed, "generated synthetic cloud");
    PointCloud::from_parts(xs, ys, n)
}

/// Build a cloud from raw measurements, transforming each axis first.
///
/// A pair is excluded when either transformed coordinate is undefined, for
/// example `log10(0)`. The number of excluded pairs is reported by
/// [`PointCloud::discarded`].
///
/// # Errors
///
/// Returns `Error::LengthMismatch` if the arrays differ in length.
/// Returns `Error::TooFewPoints` if fewer than two pairs survive.
///
/// # Examples
///
/// ```
/// use kde_contour::sample::{AxisTransform, from_raw};
///
/// let ebv = [0.0, 0.16, 0.17];
/// let f_edd = [0.46, 3.68, 1.89];
/// let cloud = from_raw(&f_edd, &ebv, AxisTransform::Log10, AxisTransform::Log10).unwrap();
/// assert_eq!(cloud.len(), 2);
/// assert_eq!(cloud.discarded(), 1);
/// ```
pub fn from_raw(
    xs: &[f64],
    ys: &[f64],
    x_transform: AxisTransform,
    y_transform: AxisTransform,
) -> Result<PointCloud> {
    let (tx, ty) = transform_pairs(xs, ys, x_transform, y_transform)?;
    PointCloud::from_parts(tx, ty, xs.len())
}

/// Transform parallel raw arrays, keeping only pairs defined on both axes.
pub(crate) fn transform_pairs(
    xs: &[f64],
    ys: &[f64],
    x_transform: AxisTransform,
    y_transform: AxisTransform,
) -> Result<(Vec<f64>, Vec<f64>)> {
    if xs.len() != ys.len() {
        return Err(Error::LengthMismatch {
            x_len: xs.len(),
            y_len: ys.len(),
        });
    }

    Ok(xs
        .iter()
        .zip(ys)
        .filter_map(|(&x, &y)| Some((x_transform.apply(x)?, y_transform.apply(y)?)))
        .unzip())
}
