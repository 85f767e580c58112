//! Kernel density estimation over two-dimensional point clouds.
//!
//! - [`bandwidth`] - Kernel width modes (Scott, Silverman, explicit)
//! - [`gaussian`] - The bivariate Gaussian estimator and grid evaluation

pub mod bandwidth;
pub mod gaussian;

pub use bandwidth::Bandwidth;
pub use gaussian::{GaussianKde, estimate};
