//! Reference broad-line AGN catalogs at z ≈ 4–7.
//!
//! Measurements as tabulated by Maiolino et al. (2023) and Harikane et al.
//! (2023). Each catalog exposes its raw columns and a
//! [`log_eddington_vs_extinction`](Catalog::log_eddington_vs_extinction)
//! cloud in `(log10 f_Edd, log10 E(B-V))` space. Rows whose `E(B-V)` is zero
//! have no logarithm and are excluded from that cloud.

use crate::cloud::PointCloud;
use crate::error::Result;
use crate::sample::{self, AxisTransform};

/// A small catalog of per-object measurements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Catalog {
    /// Short label, e.g. `"2023_Maiolino"`.
    pub label: &'static str,
    /// Spectroscopic redshift.
    pub redshift: &'static [f64],
    /// `log10` of the H-alpha luminosity in erg/s.
    pub log_l_halpha: &'static [f64],
    /// Eddington ratio `f_Edd`.
    pub eddington_ratio: &'static [f64],
    /// Colour excess `E(B-V)` in magnitudes.
    pub extinction: &'static [f64],
}

/// Maiolino et al. (2023).
pub const MAIOLINO_2023: Catalog = Catalog {
    label: "2023_Maiolino",
    redshift: &[
        4.64820, 5.59510, 4.40935, 4.68123, 5.22943, 5.87461, 6.76026, 5.91900, 4.13320, 4.44800,
    ],
    log_l_halpha: &[
        41.91761, 41.85963, 41.86622, 41.99880, 42.09537, 42.14658, 42.98032, 42.09984, 42.68253,
        42.20340,
    ],
    eddington_ratio: &[
        0.16000, 0.20000, 0.20000, 0.18000, 0.38000, 0.32000, 0.42000, 0.25200, 0.63000, 0.16700,
    ],
    extinction: &[0.64, 0.99, 0.68, 0.67, 0.39, 0.69, 0.64, 0.27, 0.45, 0.36],
};

/// Harikane et al. (2023).
pub const HARIKANE_2023: Catalog = Catalog {
    label: "2023_Harikane",
    redshift: &[4.478, 4.015, 4.583, 5.624, 4.483, 5.666, 5.241, 6.000],
    log_l_halpha: &[43.89, 43.08, 42.91, 44.83, 43.83, 44.26, 43.88, 43.41],
    eddington_ratio: &[0.46, 3.68, 1.89, 1.47, 1.93, 0.65, 0.51, 2.02],
    extinction: &[0.00, 0.16, 0.17, 1.38, 0.42, 0.80, 0.28, 0.19],
};

impl Catalog {
    /// Number of objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.redshift.len()
    }

    /// `true` for a catalog without objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.redshift.is_empty()
    }

    /// `(log10 f_Edd, log10 E(B-V))` cloud; rows with a non-positive value
    /// on either axis are excluded.
    ///
    /// # Errors
    ///
    /// Returns `Error::TooFewPoints` if fewer than two rows are usable.
    pub fn log_eddington_vs_extinction(&self) -> Result<PointCloud> {
        sample::from_raw(
            self.eddington_ratio,
            self.extinction,
            AxisTransform::Log10,
            AxisTransform::Log10,
        )
    }
}
