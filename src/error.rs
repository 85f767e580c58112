use std::path::PathBuf;

/// Coarse classification of an [`Error`].
///
/// Callers decide per kind whether a failure is fatal for a dataset or can be
/// recovered locally (only [`ErrorKind::MissingResource`] is).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or degenerate input: bad cloud, bandwidth, grid or file content.
    InvalidInput,
    /// An optional resource such as an overlay file is absent.
    MissingResource,
    /// The kernel fit is undefined because the covariance is not invertible.
    NumericDegeneracy,
    /// An I/O failure other than a missing file.
    Io,
}

/// Which coordinate axis an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// The horizontal axis.
    X,
    /// The vertical axis.
    Y,
}

impl core::fmt::Display for Axis {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the x and y sequences have different lengths.
    #[error("length mismatch: {x_len} x-values but {y_len} y-values")]
    LengthMismatch {
        /// Number of x-values supplied.
        x_len: usize,
        /// Number of y-values supplied.
        y_len: usize,
    },

    /// Returned when fewer usable points remain than required.
    #[error("too few points: need at least {required} finite points, got {got}")]
    TooFewPoints {
        /// Number of usable points.
        got: usize,
        /// Minimum number of points required.
        required: usize,
    },

    /// Returned when every point of a cloud sits at the same coordinates.
    #[error("all points are coincident; kernel fit is undefined")]
    CoincidentPoints,

    /// Returned when a bandwidth factor or width is not positive and finite.
    #[error("invalid bandwidth: {0} must be positive and finite")]
    InvalidBandwidth(f64),

    /// Returned when a grid axis has fewer than two divisions.
    #[error("invalid resolution: {nx}x{ny}, each axis needs at least 2 divisions")]
    InvalidResolution {
        /// Divisions along x.
        nx: usize,
        /// Divisions along y.
        ny: usize,
    },

    /// Returned when the grid padding is negative or not finite.
    #[error("invalid padding: {0} must be finite and non-negative")]
    InvalidPadding(f64),

    /// Returned when a synthetic distribution parameter is unusable.
    #[error("invalid distribution parameter '{name}': {value}")]
    InvalidDistribution {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    /// Returned when display limits are not an increasing finite pair.
    #[error("invalid {name}: ({low}, {high}) must be finite with low < high")]
    InvalidLimits {
        /// Setting name (`xlim` or `ylim`).
        name: &'static str,
        /// Lower limit.
        low: f64,
        /// Upper limit.
        high: f64,
    },

    /// Returned when a grid is requested over zero clouds.
    #[error("cannot build a grid from an empty set of clouds")]
    EmptyDomain,

    /// Returned when a grid axis collapses to a single value.
    #[error("degenerate domain: {axis} axis has zero width")]
    DegenerateDomain {
        /// The collapsed axis.
        axis: Axis,
    },

    /// Returned when a flat value buffer does not match its declared shape.
    #[error("shape mismatch: {rows}x{cols} matrix cannot hold {len} values")]
    ShapeMismatch {
        /// Declared number of rows.
        rows: usize,
        /// Declared number of columns.
        cols: usize,
        /// Number of values supplied.
        len: usize,
    },

    /// Returned when a density value is negative or not finite.
    #[error("invalid density value: {0}")]
    InvalidDensityValue(f64),

    /// Returned when a numeric file contains a token that is not a number.
    #[error("cannot parse '{token}' in {} as a number", .path.display())]
    ParseValue {
        /// File being read.
        path: PathBuf,
        /// Offending token.
        token: String,
    },

    /// Returned when the kernel covariance is not positive definite.
    #[error("singular kernel covariance (determinant {determinant:e})")]
    SingularCovariance {
        /// Determinant of the kernel covariance.
        determinant: f64,
    },

    /// Returned when an optional input file does not exist.
    #[error("missing resource: {}", .path.display())]
    MissingResource {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Returned when reading or writing a file fails.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Returned when a saved field cannot be serialized or deserialized.
    #[cfg(feature = "serde")]
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::LengthMismatch { .. }
            | Self::TooFewPoints { .. }
            | Self::CoincidentPoints
            | Self::InvalidBandwidth(_)
            | Self::InvalidResolution { .. }
            | Self::InvalidPadding(_)
            | Self::InvalidDistribution { .. }
            | Self::InvalidLimits { .. }
            | Self::EmptyDomain
            | Self::DegenerateDomain { .. }
            | Self::ShapeMismatch { .. }
            | Self::InvalidDensityValue(_)
            | Self::ParseValue { .. } => ErrorKind::InvalidInput,
            #[cfg(feature = "serde")]
            Self::Serialization(_) => ErrorKind::InvalidInput,
            Self::SingularCovariance { .. } => ErrorKind::NumericDegeneracy,
            Self::MissingResource { .. } => ErrorKind::MissingResource,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// Whether the pipeline may skip the affected dataset and carry on.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        self.kind() == ErrorKind::MissingResource
    }

    /// Map an I/O error on `path`, turning `NotFound` into [`Error::MissingResource`].
    #[must_use]
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::MissingResource { path }
        } else {
            Self::Io { path, source }
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_variants() {
        assert_eq!(Error::CoincidentPoints.kind(), ErrorKind::InvalidInput);
        assert_eq!(Error::InvalidBandwidth(0.0).kind(), ErrorKind::InvalidInput);
        assert_eq!(
            Error::SingularCovariance { determinant: 0.0 }.kind(),
            ErrorKind::NumericDegeneracy
        );
        assert_eq!(
            Error::MissingResource {
                path: PathBuf::from("a.txt")
            }
            .kind(),
            ErrorKind::MissingResource
        );
    }

    #[test]
    fn only_missing_resource_is_recoverable() {
        assert!(
            Error::MissingResource {
                path: PathBuf::from("a.txt")
            }
            .is_recoverable()
        );
        assert!(!Error::EmptyDomain.is_recoverable());
        assert!(!Error::SingularCovariance { determinant: 0.0 }.is_recoverable());
    }

    #[test]
    fn not_found_becomes_missing_resource() {
        let err = Error::from_io(
            "gone.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "nope"),
        );
        assert!(matches!(err, Error::MissingResource { .. }));

        let err = Error::from_io(
            "locked.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"),
        );
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn display_mentions_values() {
        let msg = Error::LengthMismatch { x_len: 3, y_len: 2 }.to_string();
        assert!(msg.contains('3') && msg.contains('2'));
        assert_eq!(Axis::Y.to_string(), "y");
    }
}
