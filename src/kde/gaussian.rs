//! Bivariate Gaussian kernel density estimation.
//!
//! Each sample contributes one Gaussian bump with a shared kernel covariance;
//! the density at a point is the mean of all bump contributions:
//!
//! `f(p) = (1/n) Σ_i N(p; s_i, H)`
//!
//! where `H` is the kernel covariance chosen by the [`Bandwidth`] mode.

use super::bandwidth::Bandwidth;
use crate::cloud::PointCloud;
use crate::density::DensityMatrix;
use crate::error::{Error, Result};
use crate::grid::Grid;

/// Smallest accepted `det(H) / (H_xx H_yy)`; below this the kernel is
/// treated as singular (|correlation| within rounding of 1).
const MIN_RELATIVE_DET: f64 = 1e-12;

/// A fitted bivariate Gaussian KDE.
///
/// # Examples
///
/// ```
/// use kde_contour::kde::{Bandwidth, GaussianKde};
/// use kde_contour::PointCloud;
///
/// let cloud = PointCloud::from_arrays(&[0.0, 1.0, 0.5, 0.2], &[0.0, 0.8, 1.0, 0.3]).unwrap();
/// let kde = GaussianKde::fit(&cloud, Bandwidth::Scott).unwrap();
/// assert!(kde.pdf(0.5, 0.5) > kde.pdf(5.0, 5.0));
/// ```
#[derive(Clone, Debug)]
pub struct GaussianKde {
    xs: Vec<f64>,
    ys: Vec<f64>,
    bandwidth: Bandwidth,
    factor: Option<f64>,
    /// Kernel covariance `[[xx, xy], [xy, yy]]`.
    covariance: [[f64; 2]; 2],
    /// Inverse kernel covariance as `(xx, xy, yy)`.
    precision: (f64, f64, f64),
    /// `log(1 / (2π sqrt(det H)))`.
    log_norm: f64,
}

impl GaussianKde {
    /// Fit the estimator to `cloud`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidBandwidth` if an explicit width is not positive.
    /// Returns `Error::CoincidentPoints` if every point is identical.
    /// Returns `Error::SingularCovariance` if the kernel covariance is not
    /// positive definite, e.g. when all points lie on one line.
    pub fn fit(cloud: &PointCloud, bandwidth: Bandwidth) -> Result<Self> {
        bandwidth.validate()?;
        if cloud.is_coincident() {
            return Err(Error::CoincidentPoints);
        }

        let factor = bandwidth.factor(cloud.len());
        let covariance = match (bandwidth, factor) {
            (Bandwidth::Absolute(h), _) => [[h * h, 0.0], [0.0, h * h]],
            (_, Some(f)) => {
                let [[xx, xy], [_, yy]] = sample_covariance(cloud);
                let f2 = f * f;
                [[xx * f2, xy * f2], [xy * f2, yy * f2]]
            }
            (_, None) => return Err(Error::InvalidBandwidth(f64::NAN)),
        };

        let [[cxx, cxy], [_, cyy]] = covariance;
        let determinant = cxx * cyy - cxy * cxy;
        let positive_definite = cxx > 0.0
            && cyy > 0.0
            && determinant.is_finite()
            && determinant > MIN_RELATIVE_DET * cxx * cyy;
        if !positive_definite {
            return Err(Error::SingularCovariance { determinant });
        }

        let precision = (cyy / determinant, -cxy / determinant, cxx / determinant);
        let log_norm = -(2.0 * core::f64::consts::PI).ln() - 0.5 * determinant.ln();

        trace_debug!(
            n = cloud.len(),
            ?bandwidth,
            sigma_x = cxx.sqrt(),
            sigma_y = cyy.sqrt(),
            "kernel fitted"
        );

        Ok(Self {
            xs: cloud.xs().to_vec(),
            ys: cloud.ys().to_vec(),
            bandwidth,
            factor,
            covariance,
            precision,
            log_norm,
        })
    }

    /// Number of kernel centers.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.xs.len()
    }

    /// The bandwidth mode the estimator was fitted with.
    #[must_use]
    pub fn bandwidth(&self) -> Bandwidth {
        self.bandwidth
    }

    /// Covariance scale factor, `None` for [`Bandwidth::Absolute`].
    #[must_use]
    pub fn factor(&self) -> Option<f64> {
        self.factor
    }

    /// Kernel covariance matrix.
    #[must_use]
    pub fn covariance(&self) -> [[f64; 2]; 2] {
        self.covariance
    }

    /// Squared Mahalanobis distance of `(dx, dy)` under the kernel.
    #[inline]
    fn mahalanobis2(&self, dx: f64, dy: f64) -> f64 {
        let (pxx, pxy, pyy) = self.precision;
        dx * dx * pxx + 2.0 * dx * dy * pxy + dy * dy * pyy
    }

    /// Density at `(x, y)`.
    ///
    /// Contributions that underflow are exactly 0, so the result is never
    /// negative. It is always finite: a fitted kernel has `det(H) > 0`, which
    /// bounds the normalization by `1 / (2π sqrt(d))` with `d` the smallest
    /// positive `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pdf(&self, x: f64, y: f64) -> f64 {
        let sum: f64 = self
            .xs
            .iter()
            .zip(&self.ys)
            .map(|(&sx, &sy)| (-0.5 * self.mahalanobis2(x - sx, y - sy)).exp())
            .sum();
        let density = sum * self.log_norm.exp() / self.xs.len() as f64;
        debug_assert!(density.is_finite(), "non-finite density {density}");
        density.max(0.0)
    }

    /// Log density at `(x, y)`, computed with the log-sum-exp trick so that
    /// points far from every sample still get a finite value.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn log_pdf(&self, x: f64, y: f64) -> f64 {
        let exponent = |(&sx, &sy): (&f64, &f64)| -0.5 * self.mahalanobis2(x - sx, y - sy);

        let max = self
            .xs
            .iter()
            .zip(&self.ys)
            .map(exponent)
            .fold(f64::NEG_INFINITY, f64::max);
        if max == f64::NEG_INFINITY {
            return f64::NEG_INFINITY;
        }

        let sum_exp: f64 = self
            .xs
            .iter()
            .zip(&self.ys)
            .map(|p| (exponent(p) - max).exp())
            .sum();

        self.log_norm - (self.xs.len() as f64).ln() + max + sum_exp.ln()
    }

    /// Evaluate the density at every point of `grid`.
    #[must_use]
    pub fn evaluate(&self, grid: &Grid) -> DensityMatrix {
        let values = grid.points().map(|(x, y)| self.pdf(x, y)).collect();
        DensityMatrix::from_values(grid.resolution(), values)
    }
}

/// Fit a kernel to `cloud` and evaluate it on `grid`.
///
/// # Errors
///
/// See [`GaussianKde::fit`].
///
/// # Examples
///
/// ```
/// use kde_contour::kde::{Bandwidth, estimate};
/// use kde_contour::sample::generate;
/// use kde_contour::{Grid, Resolution};
///
/// let cloud = generate(200, 3.0, 0.3, 42).unwrap();
/// let grid = Grid::around(&cloud, 0.2, Resolution::square(40)).unwrap();
/// let density = estimate(&cloud, &grid, Bandwidth::Factor(0.15)).unwrap();
/// assert_eq!(density.shape(), (40, 40));
/// assert!(density.values().iter().all(|v| *v >= 0.0 && v.is_finite()));
/// ```
pub fn estimate(cloud: &PointCloud, grid: &Grid, bandwidth: Bandwidth) -> Result<DensityMatrix> {
    Ok(GaussianKde::fit(cloud, bandwidth)?.evaluate(grid))
}

/// Unbiased sample covariance (`n - 1` denominator).
#[allow(clippy::cast_precision_loss)]
fn sample_covariance(cloud: &PointCloud) -> [[f64; 2]; 2] {
    let (mx, my) = cloud.mean();
    let (mut xx, mut xy, mut yy) = (0.0, 0.0, 0.0);
    for (x, y) in cloud.points() {
        let (dx, dy) = (x - mx, y - my);
        xx += dx * dx;
        xy += dx * dy;
        yy += dy * dy;
    }
    let denom = (cloud.len() - 1) as f64;
    [[xx / denom, xy / denom], [xy / denom, yy / denom]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Resolution;
    use crate::sample::generate;

    fn cloud(xs: &[f64], ys: &[f64]) -> PointCloud {
        PointCloud::from_arrays(xs, ys).unwrap()
    }

    fn square() -> PointCloud {
        cloud(&[0.0, 1.0, 0.0, 1.0, 0.5], &[0.0, 0.0, 1.0, 1.0, 0.5])
    }

    #[test]
    fn sample_covariance_uses_n_minus_one() {
        let c = cloud(&[0.0, 2.0], &[0.0, 4.0]);
        let [[xx, xy], [yx, yy]] = sample_covariance(&c);
        assert!((xx - 2.0).abs() < 1e-12);
        assert!((yy - 8.0).abs() < 1e-12);
        assert!((xy - 4.0).abs() < 1e-12);
        assert!((xy - yx).abs() < f64::EPSILON);
    }

    #[test]
    fn factor_scales_covariance() {
        let c = square();
        let unit = GaussianKde::fit(&c, Bandwidth::Factor(1.0)).unwrap();
        let half = GaussianKde::fit(&c, Bandwidth::Factor(0.5)).unwrap();
        let full = unit.covariance();
        let quarter = half.covariance();
        assert!((quarter[0][0] - 0.25 * full[0][0]).abs() < 1e-12);
        assert!((quarter[1][1] - 0.25 * full[1][1]).abs() < 1e-12);
    }

    #[test]
    fn scott_factor_is_recorded() {
        let c = generate(64, 0.0, 1.0, 3).unwrap();
        let kde = GaussianKde::fit(&c, Bandwidth::Scott).unwrap();
        assert!((kde.factor().unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(kde.n_samples(), 64);
        assert_eq!(kde.bandwidth(), Bandwidth::Scott);
    }

    #[test]
    fn absolute_bandwidth_is_isotropic() {
        let kde = GaussianKde::fit(&square(), Bandwidth::Absolute(0.3)).unwrap();
        let cov = kde.covariance();
        assert!((cov[0][0] - 0.09).abs() < 1e-12);
        assert!((cov[1][1] - 0.09).abs() < 1e-12);
        assert!(cov[0][1].abs() < f64::EPSILON);
        assert_eq!(kde.factor(), None);
    }

    #[test]
    fn absolute_bandwidth_matches_closed_form() {
        let c = cloud(&[0.0, 2.0], &[0.0, 0.0]);
        let kde = GaussianKde::fit(&c, Bandwidth::Absolute(1.0)).unwrap();
        // Two unit bumps at (0,0) and (2,0), evaluated at (0,0).
        let expected = (1.0 + (-2.0_f64).exp()) / (2.0 * 2.0 * core::f64::consts::PI);
        assert!((kde.pdf(0.0, 0.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn rejects_coincident_points() {
        let c = cloud(&[2.0, 2.0, 2.0], &[1.0, 1.0, 1.0]);
        assert!(matches!(
            GaussianKde::fit(&c, Bandwidth::Scott),
            Err(Error::CoincidentPoints)
        ));
        assert!(matches!(
            GaussianKde::fit(&c, Bandwidth::Absolute(0.5)),
            Err(Error::CoincidentPoints)
        ));
    }

    #[test]
    fn rejects_collinear_points() {
        let c = cloud(&[0.0, 1.0, 2.0, 3.0], &[1.0, 3.0, 5.0, 7.0]);
        let err = GaussianKde::fit(&c, Bandwidth::Scott).unwrap_err();
        assert!(matches!(err, Error::SingularCovariance { .. }));
        assert_eq!(err.kind(), crate::ErrorKind::NumericDegeneracy);

        let vertical = cloud(&[1.0, 1.0, 1.0], &[0.0, 1.0, 2.0]);
        assert!(matches!(
            GaussianKde::fit(&vertical, Bandwidth::Factor(0.5)),
            Err(Error::SingularCovariance { .. })
        ));
    }

    #[test]
    fn collinear_points_fit_with_absolute_width() {
        let c = cloud(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0]);
        assert!(GaussianKde::fit(&c, Bandwidth::Absolute(0.2)).is_ok());
    }

    #[test]
    fn rejects_invalid_bandwidth() {
        assert!(matches!(
            GaussianKde::fit(&square(), Bandwidth::Factor(0.0)),
            Err(Error::InvalidBandwidth(_))
        ));
        assert!(matches!(
            GaussianKde::fit(&square(), Bandwidth::Factor(-0.15)),
            Err(Error::InvalidBandwidth(_))
        ));
    }

    #[test]
    fn pdf_is_symmetric() {
        let c = cloud(&[1.0, -1.0, 0.0, 0.0], &[0.0, 0.0, 1.0, -1.0]);
        let kde = GaussianKde::fit(&c, Bandwidth::Scott).unwrap();
        assert!((kde.pdf(0.5, 0.0) - kde.pdf(-0.5, 0.0)).abs() < 1e-12);
        assert!((kde.pdf(0.0, 0.5) - kde.pdf(0.0, -0.5)).abs() < 1e-12);
    }

    #[test]
    fn log_pdf_consistent_with_pdf() {
        let kde = GaussianKde::fit(&square(), Bandwidth::Scott).unwrap();
        for (x, y) in [(0.0, 0.0), (0.5, 0.5), (1.2, -0.3), (2.0, 2.0)] {
            let p = kde.pdf(x, y);
            let lp = kde.log_pdf(x, y);
            assert!((p - lp.exp()).abs() < 1e-10, "pdf={p}, exp(log_pdf)={}", lp.exp());
        }
    }

    #[test]
    fn far_points_underflow_to_zero() {
        let kde = GaussianKde::fit(&square(), Bandwidth::Factor(0.1)).unwrap();
        let p = kde.pdf(1.0e4, -1.0e4);
        assert!(p >= 0.0 && p.is_finite());
        assert!(p < 1e-300);
        assert!(kde.log_pdf(1.0e4, -1.0e4).is_finite());
    }

    #[test]
    fn tiny_kernel_density_stays_finite() {
        let c = generate(20, 0.0, 1e-70, 3).unwrap();
        let kde = GaussianKde::fit(&c, Bandwidth::Scott).unwrap();
        let (sx, sy) = c.points().next().unwrap();
        let p = kde.pdf(sx, sy);
        assert!(p.is_finite() && p > 1e100, "pdf = {p}");
        assert!(kde.log_pdf(sx, sy).is_finite());
    }

    #[test]
    fn density_integrates_to_one() {
        let c = generate(30, 0.0, 1.0, 11).unwrap();
        let kde = GaussianKde::fit(&c, Bandwidth::Scott).unwrap();
        let extent = crate::cloud::Extent {
            x_min: -1.0,
            x_max: 1.0,
            y_min: -1.0,
            y_max: 1.0,
        };
        let grid = Grid::from_extent(extent, 6.0, Resolution::square(200)).unwrap();
        let mass = kde.evaluate(&grid).mass(&grid);
        assert!((mass - 1.0).abs() < 0.02, "mass = {mass}");
    }

    #[test]
    fn smaller_bandwidth_sharpens_peak() {
        let c = generate(100, 0.0, 1.0, 5).unwrap();
        let (mx, my) = c.mean();
        let wide = GaussianKde::fit(&c, Bandwidth::Factor(1.0)).unwrap();
        let narrow = GaussianKde::fit(&c, Bandwidth::Factor(0.05)).unwrap();
        let (sx, sy) = c.points().next().unwrap();
        assert!(narrow.pdf(sx, sy) > wide.pdf(sx, sy));
        assert!(wide.pdf(mx + 6.0, my) > narrow.pdf(mx + 6.0, my));
    }

    #[test]
    fn evaluate_matches_pointwise_pdf() {
        let c = square();
        let grid = Grid::around(&c, 0.5, Resolution { nx: 6, ny: 4 }).unwrap();
        let kde = GaussianKde::fit(&c, Bandwidth::Scott).unwrap();
        let density = kde.evaluate(&grid);
        assert_eq!(density.shape(), (4, 6));
        for (row, &y) in grid.y_axis().iter().enumerate() {
            for (col, &x) in grid.x_axis().iter().enumerate() {
                let v = density.get(row, col).unwrap();
                assert!((v - kde.pdf(x, y)).abs() < f64::EPSILON);
            }
        }
    }

    #[test]
    fn estimate_matches_fit_then_evaluate() {
        let c = square();
        let grid = Grid::around(&c, 0.2, Resolution::square(12)).unwrap();
        let a = estimate(&c, &grid, Bandwidth::Factor(0.4)).unwrap();
        let b = GaussianKde::fit(&c, Bandwidth::Factor(0.4))
            .unwrap()
            .evaluate(&grid);
        assert_eq!(a, b);
    }
}
