//! Explicit pipeline configuration.
//!
//! Settings travel as a plain value passed to each call. There is no
//! process-wide default state; two presets mirror the two density analyses
//! this crate serves.

use crate::error::{Error, Result};
use crate::grid::Resolution;
use crate::kde::Bandwidth;

/// Settings for building density fields.
///
/// [`Default`] is the synthetic-cloud preset; use
/// [`DensityConfig::catalog_comparison`] for the catalog overlay.
///
/// # Examples
///
/// ```
/// use kde_contour::{DensityConfig, Resolution};
/// use kde_contour::kde::Bandwidth;
///
/// let config = DensityConfig {
///     resolution: Resolution::square(60),
///     bandwidth: Bandwidth::Scott,
///     ..DensityConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DensityConfig {
    /// Number of synthetic points (default: 200).
    pub n_points: usize,
    /// Mean of the synthetic normal distribution on both axes (default: 3.0).
    pub center: f64,
    /// Standard deviation of the synthetic distribution (default: 0.3).
    pub spread: f64,
    /// Seed for synthetic generation (default: 42).
    pub seed: u64,
    /// Absolute grid margin in data units (default: 0.2).
    pub padding: f64,
    /// Grid points per axis (default: 40×40).
    pub resolution: Resolution,
    /// Kernel width mode (default: `Factor(0.15)`).
    pub bandwidth: Bandwidth,
    /// Display-only x-axis clamp for the renderer (default: `(2.0, 4.0)`).
    pub xlim: Option<(f64, f64)>,
    /// Display-only y-axis clamp for the renderer (default: `(2.0, 4.0)`).
    pub ylim: Option<(f64, f64)>,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            n_points: 200,
            center: 3.0,
            spread: 0.3,
            seed: 42,
            padding: 0.2,
            resolution: Resolution::square(40),
            bandwidth: Bandwidth::Factor(0.15),
            xlim: Some((2.0, 4.0)),
            ylim: Some((2.0, 4.0)),
        }
    }
}

impl DensityConfig {
    /// Preset for comparing the `log f_Edd` vs `log E(B-V)` catalogs:
    /// padding 0.5, 100×100 grid, Scott bandwidth, display window `[-3, 1]²`.
    #[must_use]
    pub fn catalog_comparison() -> Self {
        Self {
            padding: 0.5,
            resolution: Resolution::square(100),
            bandwidth: Bandwidth::Scott,
            xlim: Some((-3.0, 1.0)),
            ylim: Some((-3.0, 1.0)),
            ..Self::default()
        }
    }

    /// Check every numeric setting before any work is done.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`validate_estimation`](Self::validate_estimation),
    /// then `Error::InvalidDistribution` or `Error::TooFewPoints` for an
    /// unusable synthetic-cloud setting.
    pub fn validate(&self) -> Result<()> {
        self.validate_estimation()?;
        if !self.center.is_finite() {
            return Err(Error::InvalidDistribution {
                name: "center",
                value: self.center,
            });
        }
        if !self.spread.is_finite() || self.spread < 0.0 {
            return Err(Error::InvalidDistribution {
                name: "spread",
                value: self.spread,
            });
        }
        if self.n_points < crate::cloud::MIN_POINTS {
            return Err(Error::TooFewPoints {
                got: self.n_points,
                required: crate::cloud::MIN_POINTS,
            });
        }
        Ok(())
    }

    /// Check only the settings used to grid and estimate existing clouds:
    /// padding, resolution, bandwidth and display limits. The synthetic-cloud
    /// fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPadding`, `Error::InvalidResolution`,
    /// `Error::InvalidBandwidth` or `Error::InvalidLimits` for the first
    /// unusable setting.
    pub fn validate_estimation(&self) -> Result<()> {
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(Error::InvalidPadding(self.padding));
        }
        self.resolution.validate()?;
        self.bandwidth.validate()?;
        for (name, limits) in [("xlim", self.xlim), ("ylim", self.ylim)] {
            match limits {
                Some((low, high)) if !(low.is_finite() && high.is_finite() && low < high) => {
                    return Err(Error::InvalidLimits { name, low, high });
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(DensityConfig::default().validate().is_ok());
        assert!(DensityConfig::catalog_comparison().validate().is_ok());
    }

    #[test]
    fn catalog_preset_overrides_grid_and_bandwidth() {
        let config = DensityConfig::catalog_comparison();
        assert_eq!(config.resolution, Resolution::square(100));
        assert_eq!(config.bandwidth, Bandwidth::Scott);
        assert!((config.padding - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn validate_catches_bad_settings() {
        let bad_padding = DensityConfig {
            padding: -1.0,
            ..DensityConfig::default()
        };
        assert!(matches!(
            bad_padding.validate(),
            Err(Error::InvalidPadding(_))
        ));

        let bad_resolution = DensityConfig {
            resolution: Resolution { nx: 40, ny: 1 },
            ..DensityConfig::default()
        };
        assert!(matches!(
            bad_resolution.validate(),
            Err(Error::InvalidResolution { nx: 40, ny: 1 })
        ));

        let bad_bandwidth = DensityConfig {
            bandwidth: Bandwidth::Factor(0.0),
            ..DensityConfig::default()
        };
        assert!(matches!(
            bad_bandwidth.validate(),
            Err(Error::InvalidBandwidth(_))
        ));

        let bad_limits = DensityConfig {
            xlim: Some((4.0, 2.0)),
            ..DensityConfig::default()
        };
        assert!(matches!(
            bad_limits.validate(),
            Err(Error::InvalidLimits { name: "xlim", .. })
        ));
    }

    #[test]
    fn estimation_check_ignores_synthetic_fields() {
        let config = DensityConfig {
            n_points: 0,
            spread: -1.0,
            center: f64::NAN,
            ..DensityConfig::catalog_comparison()
        };
        assert!(config.validate_estimation().is_ok());
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidDistribution { name: "center", .. })
        ));

        let bad_padding = DensityConfig {
            padding: f64::INFINITY,
            ..config
        };
        assert!(matches!(
            bad_padding.validate_estimation(),
            Err(Error::InvalidPadding(_))
        ));
    }
}
