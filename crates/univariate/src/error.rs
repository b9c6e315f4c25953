use uot_core::Probability;

/// Which point cloud of a problem an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Target => write!(f, "target"),
        }
    }
}

/// Errors that can occur while building or solving a univariate problem.
///
/// Everything here is a precondition violation the caller has to fix, except
/// [`Error::Unavailable`], which signals that a derived quantity was never
/// recorded. Slow convergence of the dual solve is not an error; see
/// [`Convergence`](uot_transport::Convergence).
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A point cloud without points.
    Empty(Side),
    /// Rows (or slices) of a point cloud have different lengths.
    Ragged {
        index: usize,
        expected: usize,
        found: usize,
    },
    /// The two clouds live in different dimensions, or in none.
    Dimension { source: usize, target: usize },
    /// Weight vector length differs from the number of points.
    Length {
        side: Side,
        points: usize,
        weights: usize,
    },
    /// A weight is negative or not finite.
    Weight {
        side: Side,
        index: usize,
        value: Probability,
    },
    /// Weights do not sum to 1.
    Unnormalized { side: Side, total: Probability },
    /// The ground cost is not of the form `h(x - y)`.
    Variant,
    /// Quantile approximation needs uniform marginals.
    Uniformity,
    /// Quantile grid of zero levels, or an empty level list.
    Levels,
    /// Quantile level outside `[0, 1]`.
    Level(Probability),
    /// Subsampling to zero points.
    Subsamples,
    /// No transport plan was recorded for this output.
    Unavailable,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(side) => write!(f, "{} point cloud is empty", side),
            Self::Ragged {
                index,
                expected,
                found,
            } => write!(f, "entry {} has length {}, expected {}", index, found, expected),
            Self::Dimension { source, target } => {
                write!(f, "dimension mismatch: source {} vs target {}", source, target)
            }
            Self::Length {
                side,
                points,
                weights,
            } => write!(f, "{} has {} points but {} weights", side, points, weights),
            Self::Weight { side, index, value } => {
                write!(f, "{} weight {} is invalid: {}", side, index, value)
            }
            Self::Unnormalized { side, total } => {
                write!(f, "{} weights sum to {} instead of 1", side, total)
            }
            Self::Variant => write!(f, "ground cost must be translation invariant"),
            Self::Uniformity => write!(f, "quantile approximation requires uniform marginals"),
            Self::Levels => write!(f, "quantile specification has no levels"),
            Self::Level(q) => write!(f, "quantile level {} outside [0, 1]", q),
            Self::Subsamples => write!(f, "subsample count must be positive"),
            Self::Unavailable => write!(
                f,
                "transport plan unavailable, likely because an approximate method was used"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// Result type for univariate transport operations.
pub type Result<T> = std::result::Result<T, Error>;
