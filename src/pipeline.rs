//! Cloud → grid → density composition, alone or overlaid.
//!
//! Each [`DensityField`] is computed independently from its own inputs; no
//! state is shared between fields, so callers are free to compute several on
//! different threads.
//!
//! # Example
//!
//! ```
//! use kde_contour::catalog::{HARIKANE_2023, MAIOLINO_2023};
//! use kde_contour::overlay::OverlaySource;
//! use kde_contour::pipeline::{Dataset, FramePolicy, compare};
//! use kde_contour::DensityConfig;
//!
//! let datasets = [
//!     Dataset::from_catalog(&MAIOLINO_2023).unwrap(),
//!     Dataset::from_catalog(&HARIKANE_2023).unwrap(),
//! ];
//! let overlay = OverlaySource::in_dir("/no/such/dir");
//! let config = DensityConfig::catalog_comparison();
//!
//! let comparison = compare(&datasets, Some(&overlay), &config, FramePolicy::PerDataset).unwrap();
//! assert_eq!(comparison.fields().len(), 2);
//! assert!(comparison.overlay().is_none());
//! assert_eq!(comparison.warnings().len(), 1);
//! ```

use crate::catalog::Catalog;
use crate::cloud::PointCloud;
use crate::config::DensityConfig;
use crate::density::DensityMatrix;
use crate::error::{Error, Result};
use crate::grid::{Grid, build_grid};
use crate::kde::{Bandwidth, GaussianKde};
use crate::overlay::{OverlayCurve, OverlaySource};
use crate::sample;

/// A labelled point cloud.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Label carried through to the density field (legend entry).
    pub label: String,
    /// The points, already in analysis coordinates.
    pub cloud: PointCloud,
}

impl Dataset {
    /// Pair a label with a cloud.
    #[must_use]
    pub fn new(label: impl Into<String>, cloud: PointCloud) -> Self {
        Self {
            label: label.into(),
            cloud,
        }
    }

    /// The `(log10 f_Edd, log10 E(B-V))` cloud of a reference catalog.
    ///
    /// # Errors
    ///
    /// Returns `Error::TooFewPoints` if the catalog has fewer than two usable rows.
    pub fn from_catalog(catalog: &Catalog) -> Result<Self> {
        Ok(Self::new(catalog.label, catalog.log_eddington_vs_extinction()?))
    }
}

/// How overlaid datasets share a coordinate frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FramePolicy {
    /// Each dataset gets its own grid around its own points.
    #[default]
    PerDataset,
    /// One grid around the union of every dataset.
    Shared,
}

/// A density matrix together with the grid it was evaluated on.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DensityField {
    label: String,
    grid: Grid,
    density: DensityMatrix,
    bandwidth: Bandwidth,
    factor: Option<f64>,
    n_points: usize,
}

impl DensityField {
    /// Dataset label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Evaluation grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Density values aligned with [`grid`](Self::grid).
    #[must_use]
    pub fn density(&self) -> &DensityMatrix {
        &self.density
    }

    /// Bandwidth mode used for the kernel.
    #[must_use]
    pub fn bandwidth(&self) -> Bandwidth {
        self.bandwidth
    }

    /// Covariance factor the bandwidth resolved to, if covariance-scaled.
    #[must_use]
    pub fn factor(&self) -> Option<f64> {
        self.factor
    }

    /// Number of points the kernel was fitted to.
    #[must_use]
    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// `(x, y)` of the grid point with the highest density.
    #[must_use]
    pub fn peak(&self) -> (f64, f64) {
        let (row, col) = self.density.argmax();
        (self.grid.x_axis()[col], self.grid.y_axis()[row])
    }

    /// Write the field as CSV with columns `x,y,density`, one row per grid
    /// point in row-major order.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if writing fails.
    pub fn to_csv(&self, mut writer: impl std::io::Write) -> std::io::Result<()> {
        writeln!(writer, "x,y,density")?;
        for ((x, y), v) in self.grid.points().zip(self.density.values()) {
            writeln!(writer, "{x},{y},{v}")?;
        }
        writer.flush()
    }

    /// Save the field to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be written and
    /// `Error::Serialization` if encoding fails.
    #[cfg(feature = "serde")]
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|e| Error::from_io(path, e))?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Load a field saved with [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingResource` if the file does not exist,
    /// `Error::Io` for other read failures and `Error::Serialization` if the
    /// contents cannot be decoded or describe an inconsistent field (a grid
    /// with fewer than two points per axis, a density buffer that does not
    /// match the grid, or a negative or non-finite value).
    #[cfg(feature = "serde")]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| Error::from_io(path, e))?;
        serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| Error::Serialization(e.to_string()))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for DensityField {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> core::result::Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw {
            label: String,
            grid: Grid,
            density: DensityMatrix,
            bandwidth: Bandwidth,
            factor: Option<f64>,
            n_points: usize,
        }

        let raw = <Raw as serde::Deserialize>::deserialize(deserializer)?;
        raw.bandwidth.validate().map_err(<D::Error as serde::de::Error>::custom)?;
        let resolution = raw.grid.resolution();
        if raw.density.shape() != (resolution.ny, resolution.nx) {
            let (rows, cols) = raw.density.shape();
            return Err(serde::de::Error::custom(Error::ShapeMismatch {
                rows,
                cols,
                len: resolution.len(),
            }));
        }
        Ok(Self {
            label: raw.label,
            grid: raw.grid,
            density: raw.density,
            bandwidth: raw.bandwidth,
            factor: raw.factor,
            n_points: raw.n_points,
        })
    }
}

/// Fit `bandwidth` to `dataset` and evaluate it on a caller-supplied grid.
///
/// # Errors
///
/// See [`GaussianKde::fit`].
pub fn density_field_on(
    dataset: &Dataset,
    grid: Grid,
    bandwidth: Bandwidth,
) -> Result<DensityField> {
    let kde = GaussianKde::fit(&dataset.cloud, bandwidth)?;
    let density = kde.evaluate(&grid);
    trace_info!(
        label = %dataset.label,
        n_points = dataset.cloud.len(),
        peak = density.max(),
        "density field computed"
    );
    Ok(DensityField {
        label: dataset.label.clone(),
        grid,
        density,
        bandwidth,
        factor: kde.factor(),
        n_points: kde.n_samples(),
    })
}

/// Grid `dataset` with `config.padding` and `config.resolution`, then
/// estimate its density with `config.bandwidth`.
///
/// # Errors
///
/// Returns the grid errors of [`build_grid`] and the fit errors of
/// [`GaussianKde::fit`].
pub fn density_field(dataset: &Dataset, config: &DensityConfig) -> Result<DensityField> {
    let grid = Grid::around(&dataset.cloud, config.padding, config.resolution)?;
    density_field_on(dataset, grid, config.bandwidth)
}

/// Generate the synthetic cloud described by `config` and estimate its density.
///
/// # Errors
///
/// Returns the first error from [`DensityConfig::validate`], generation,
/// gridding or fitting.
pub fn synthetic_field(config: &DensityConfig) -> Result<DensityField> {
    config.validate()?;
    let cloud = sample::generate(config.n_points, config.center, config.spread, config.seed)?;
    density_field(&Dataset::new("synthetic", cloud), config)
}

/// Several density fields prepared for one figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    fields: Vec<DensityField>,
    overlay: Option<OverlayCurve>,
    warnings: Vec<String>,
    xlim: Option<(f64, f64)>,
    ylim: Option<(f64, f64)>,
}

impl Comparison {
    /// One field per input dataset, in input order.
    #[must_use]
    pub fn fields(&self) -> &[DensityField] {
        &self.fields
    }

    /// The overlay curve, if its files were available.
    #[must_use]
    pub fn overlay(&self) -> Option<&OverlayCurve> {
        self.overlay.as_ref()
    }

    /// Non-fatal problems encountered, such as a skipped overlay.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Display-only x clamp from the configuration.
    #[must_use]
    pub fn xlim(&self) -> Option<(f64, f64)> {
        self.xlim
    }

    /// Display-only y clamp from the configuration.
    #[must_use]
    pub fn ylim(&self) -> Option<(f64, f64)> {
        self.ylim
    }
}

/// Compute a density field per dataset and attach the optional overlay.
///
/// A missing overlay file never fails the comparison: the overlay is left
/// out and a warning is recorded (and logged when the `tracing` feature is
/// enabled). Any other error, for a dataset or for an overlay file that
/// exists but cannot be used, is returned.
///
/// # Errors
///
/// Returns `Error::EmptyDomain` if `datasets` is empty, the errors of
/// [`DensityConfig::validate_estimation`], and the first dataset or overlay
/// error. The synthetic-cloud fields of `config` are not read.
pub fn compare(
    datasets: &[Dataset],
    overlay: Option<&OverlaySource>,
    config: &DensityConfig,
    frame: FramePolicy,
) -> Result<Comparison> {
    config.validate_estimation()?;
    if datasets.is_empty() {
        return Err(Error::EmptyDomain);
    }

    let fields = match frame {
        FramePolicy::PerDataset => datasets
            .iter()
            .map(|dataset| density_field(dataset, config))
            .collect::<Result<Vec<_>>>()?,
        FramePolicy::Shared => {
            let clouds: Vec<&PointCloud> = datasets.iter().map(|d| &d.cloud).collect();
            let grid = build_grid(&clouds, config.padding, config.resolution)?;
            datasets
                .iter()
                .map(|dataset| density_field_on(dataset, grid.clone(), config.bandwidth))
                .collect::<Result<Vec<_>>>()?
        }
    };

    let mut warnings = Vec::new();
    let overlay = match overlay.map(OverlaySource::load) {
        None => None,
        Some(Ok(curve)) => Some(curve),
        Some(Err(err)) if err.is_recoverable() => {
            let message = format!("overlay skipped: {err}");
            trace_warn!(%err, "overlay data not found, skipping");
            warnings.push(message);
            None
        }
        Some(Err(err)) => return Err(err),
    };

    Ok(Comparison {
        fields,
        overlay,
        warnings,
        xlim: config.xlim,
        ylim: config.ylim,
    })
}
