#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Two-dimensional kernel density grids for comparing small astrophysical
//! catalogs, such as Eddington ratio against dust extinction for broad-line
//! AGN at high redshift. The crate turns point clouds into a padded
//! evaluation grid and a matching Gaussian KDE density matrix, ready to hand
//! to any contour or heat-map renderer.
//!
//! # Getting Started
//!
//! ```
//! use kde_contour::prelude::*;
//!
//! let cloud = generate(200, 3.0, 0.3, 42).unwrap();
//! let grid = Grid::around(&cloud, 0.2, Resolution::square(40)).unwrap();
//! let density = estimate(&cloud, &grid, Bandwidth::Factor(0.15)).unwrap();
//!
//! let (row, col) = density.argmax();
//! println!(
//!     "peak {:.3} at ({:.2}, {:.2})",
//!     density.max(),
//!     grid.x_axis()[col],
//!     grid.y_axis()[row]
//! );
//! ```
//!
//! # Pipeline
//!
//! | Stage | Entry points | Role |
//! |-------|--------------|------|
//! | Sample provider | [`sample::generate`], [`PointCloud::from_arrays`], [`sample::from_raw`] | Seeded synthetic clouds, or caller data transformed at the boundary (`log10`, offsets) |
//! | Grid builder | [`build_grid`], [`Grid::around`] | Union extent ± absolute padding, linspace mesh |
//! | Density estimator | [`kde::estimate`], [`kde::GaussianKde`] | Bivariate Gaussian KDE evaluated on the mesh |
//! | Composition | [`pipeline::compare`], [`pipeline::synthetic_field`] | Several datasets plus an optional file-backed overlay |
//!
//! # Bandwidth
//!
//! [`Bandwidth::Scott`](kde::Bandwidth::Scott) and
//! [`Bandwidth::Silverman`](kde::Bandwidth::Silverman) scale with sample
//! count, so they smooth a 7-object catalog differently from a 10-object
//! one. Use [`Bandwidth::Factor`](kde::Bandwidth::Factor) or
//! [`Bandwidth::Absolute`](kde::Bandwidth::Absolute) with matched values when
//! densities of different datasets are compared by eye.
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `serde` | `Serialize`/`Deserialize` on public types, [`DensityField::save`](pipeline::DensityField)/`load` as JSON | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) for grids, fits and skipped overlays | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::warn!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_warn {
    ($($arg:tt)*) => { tracing::warn!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_warn {
    ($($arg:tt)*) => {};
}

pub mod catalog;
mod cloud;
mod config;
mod density;
mod error;
mod grid;
pub mod kde;
pub mod overlay;
pub mod pipeline;
mod rng_util;
pub mod sample;

pub use cloud::{Extent, MIN_POINTS, PointCloud};
pub use config::DensityConfig;
pub use density::DensityMatrix;
pub use error::{Axis, Error, ErrorKind, Result};
pub use grid::{Grid, Resolution, build_grid};
pub use kde::{Bandwidth, GaussianKde, estimate};
pub use pipeline::{Comparison, Dataset, DensityField, FramePolicy, compare};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use kde_contour::prelude::*;
/// ```
pub mod prelude {
    pub use crate::catalog::{Catalog, HARIKANE_2023, MAIOLINO_2023};
    pub use crate::cloud::{Extent, PointCloud};
    pub use crate::config::DensityConfig;
    pub use crate::density::DensityMatrix;
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::grid::{Grid, Resolution, build_grid};
    pub use crate::kde::{Bandwidth, GaussianKde, estimate};
    pub use crate::overlay::{OverlayCurve, OverlaySource};
    pub use crate::pipeline::{
        Comparison, Dataset, DensityField, FramePolicy, compare, density_field, synthetic_field,
    };
    pub use crate::sample::{AxisTransform, from_raw, generate};
}
