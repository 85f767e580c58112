/// Draw a normal variate with the given mean and standard deviation.
///
/// Box-Muller transform on two uniforms; `u1` is taken from `(0, 1]` so the
/// logarithm stays finite.
#[inline]
pub(crate) fn normal(rng: &mut fastrand::Rng, mean: f64, std_dev: f64) -> f64 {
    let u1 = 1.0 - rng.f64();
    let u2 = rng.f64();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * core::f64::consts::PI * u2).cos();
    mean + z * std_dev
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn normal_moments_are_close() {
        let mut rng = fastrand::Rng::with_seed(7);
        let n = 20_000;
        let draws: Vec<f64> = (0..n).map(|_| normal(&mut rng, 2.0, 0.5)).collect();
        let mean = draws.iter().sum::<f64>() / n as f64;
        let var = draws.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
        assert!((mean - 2.0).abs() < 0.02, "mean = {mean}");
        assert!((var.sqrt() - 0.5).abs() < 0.02, "std = {}", var.sqrt());
    }

    #[test]
    fn normal_is_always_finite() {
        let mut rng = fastrand::Rng::with_seed(0);
        for _ in 0..10_000 {
            assert!(normal(&mut rng, 0.0, 1.0).is_finite());
        }
    }

    #[test]
    fn zero_std_returns_mean() {
        let mut rng = fastrand::Rng::with_seed(1);
        assert!((normal(&mut rng, 4.25, 0.0) - 4.25).abs() < f64::EPSILON);
    }
}
