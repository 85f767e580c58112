//! Optional overlay series read from single-line numeric files.
//!
//! Overlay files are auxiliary: their absence is reported as
//! [`Error::MissingResource`], which the pipeline recovers from by skipping the
//! overlay. Anything else wrong with a file that does exist is surfaced.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::sample::{self, AxisTransform};

/// Default file holding Eddington ratios.
pub const DEFAULT_EDDINGTON_FILE: &str = "eddington_ratios.txt";
/// Default file holding extinction values.
pub const DEFAULT_EXTINCTION_FILE: &str = "extinctions.txt";
/// Default offset subtracted from raw extinction values to get `E(B-V)`.
pub const DEFAULT_EXTINCTION_OFFSET: f64 = 22.8;

/// Read the first line of `path` as comma-separated floats.
///
/// Surrounding whitespace of each token is ignored; empty tokens are skipped.
///
/// # Errors
///
/// Returns `Error::MissingResource` if the file does not exist.
/// Returns `Error::Io` for any other read failure.
/// Returns `Error::ParseValue` if a token is not a number.
pub fn read_series(path: impl AsRef<Path>) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| Error::from_io(path, e))?;
    parse_series(contents.lines().next().unwrap_or_default(), path)
}

fn parse_series(line: &str, path: &Path) -> Result<Vec<f64>> {
    line.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<f64>().map_err(|_| Error::ParseValue {
                path: path.to_path_buf(),
                token: token.to_owned(),
            })
        })
        .collect()
}

/// Where to find the overlay series and how to convert them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlaySource {
    /// File with raw Eddington ratios (x axis, plotted as `log10`).
    pub eddington_path: PathBuf,
    /// File with raw extinction values (y axis, shifted by `extinction_offset`).
    pub extinction_path: PathBuf,
    /// Offset subtracted from raw extinctions (default: 22.8).
    pub extinction_offset: f64,
}

impl Default for OverlaySource {
    fn default() -> Self {
        Self {
            eddington_path: PathBuf::from(DEFAULT_EDDINGTON_FILE),
            extinction_path: PathBuf::from(DEFAULT_EXTINCTION_FILE),
            extinction_offset: DEFAULT_EXTINCTION_OFFSET,
        }
    }
}

impl OverlaySource {
    /// Default file names resolved inside `dir`.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            eddington_path: dir.join(DEFAULT_EDDINGTON_FILE),
            extinction_path: dir.join(DEFAULT_EXTINCTION_FILE),
            ..Self::default()
        }
    }

    /// Read both files and build the overlay curve.
    ///
    /// Pairs whose Eddington ratio is not positive are dropped, since their
    /// logarithm is undefined.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingResource` if either file is absent, and the
    /// other errors of [`read_series`]. Returns `Error::LengthMismatch` if
    /// the two series differ in length.
    pub fn load(&self) -> Result<OverlayCurve> {
        let eddington = read_series(&self.eddington_path)?;
        let extinction = read_series(&self.extinction_path)?;
        let (xs, ys) = sample::transform_pairs(
            &eddington,
            &extinction,
            AxisTransform::Log10,
            AxisTransform::Shift(self.extinction_offset),
        )?;
        Ok(OverlayCurve { xs, ys })
    }
}

/// An overlay series in analysis coordinates, kept in file order so the
/// renderer can draw it as a line.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlayCurve {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl OverlayCurve {
    /// The x-coordinates.
    #[must_use]
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// The y-coordinates.
    #[must_use]
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// `true` when no vertex survived the transform.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}
