//! Bandwidth selection for the bivariate Gaussian kernel.

use crate::error::{Error, Result};

/// Dimensionality of the kernel; the estimator is strictly bivariate.
const DIMS: f64 = 2.0;

/// How the kernel width is chosen.
///
/// The covariance-scaled modes ([`Scott`](Self::Scott),
/// [`Silverman`](Self::Silverman), [`Factor`](Self::Factor)) shape each
/// kernel like the data: kernel covariance = `factor² · Σ̂` with `Σ̂` the
/// sample covariance. The automatic rules depend on the sample count, so two
/// catalogs of different size get different smoothing. For visual comparison
/// across datasets use a matched [`Factor`](Self::Factor) or
/// [`Absolute`](Self::Absolute) width instead.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bandwidth {
    /// Scott's rule: `factor = n^(-1/(d+4))`.
    #[default]
    Scott,
    /// Silverman's rule: `factor = (n (d+2) / 4)^(-1/(d+4))`.
    ///
    /// In two dimensions this coincides with Scott's rule.
    Silverman,
    /// Explicit factor multiplying the data covariance.
    Factor(f64),
    /// Explicit isotropic kernel standard deviation in data units,
    /// independent of the data covariance.
    Absolute(f64),
}

impl Bandwidth {
    /// `true` for the data-driven rules, `false` for explicit widths.
    #[must_use]
    pub fn is_automatic(&self) -> bool {
        matches!(self, Self::Scott | Self::Silverman)
    }

    /// Check that an explicit width is positive and finite.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidBandwidth` for a non-positive or non-finite value.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Factor(v) | Self::Absolute(v) if !(v.is_finite() && v > 0.0) => {
                Err(Error::InvalidBandwidth(v))
            }
            _ => Ok(()),
        }
    }

    /// Covariance scale factor for `n` samples, or `None` for
    /// [`Absolute`](Self::Absolute).
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn factor(&self, n: usize) -> Option<f64> {
        let n = n as f64;
        let exponent = -1.0 / (DIMS + 4.0);
        match *self {
            Self::Scott => Some(n.powf(exponent)),
            Self::Silverman => Some((n * (DIMS + 2.0) / 4.0).powf(exponent)),
            Self::Factor(f) => Some(f),
            Self::Absolute(_) => None,
        }
    }
}
