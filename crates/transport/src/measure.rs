use uot_core::Coordinate;
use uot_core::Energy;

/// Ground cost between two points on the real line.
///
/// Defines the cost of transporting one unit of mass from `x` in the source
/// slice to `y` in the target slice. This is the "ground cost" that optimal
/// transport algorithms minimize over.
///
/// Every univariate engine additionally needs the cost to be translation
/// invariant, `c(x, y) = h(x - y)`. Costs that have this structure expose it
/// through [`invariant`](Measure::invariant); costs that don't are still valid
/// measures but get rejected by the solvers.
///
/// # Implementations
///
/// - Blanket over every [`Invariant`] cost
/// - Arbitrary user costs that only know `c(x, y)`
pub trait Measure: Send + Sync {
    /// Returns the cost of transporting mass from `x` to `y`.
    fn distance(&self, x: Coordinate, y: Coordinate) -> Energy;
    /// Translation-invariant view of this cost, if it has one.
    fn invariant(&self) -> Option<&dyn Invariant> {
        None
    }
}

/// Translation-invariant scalar cost `c(x, y) = h(x - y)`.
///
/// The 1-D closed forms (monotone rearrangement, CDF inversion, north-west
/// corner) are exact for convex `h`.
pub trait Invariant: Send + Sync {
    /// The scalar kernel `h`.
    fn h(&self, z: Coordinate) -> Energy;
    /// Separable lift of `h` to two equal-length vectors, `Σ h(x_k - y_k)`.
    fn pairwise(&self, x: &[Coordinate], y: &[Coordinate]) -> Energy {
        debug_assert!(x.len() == y.len(), "pairwise lengths differ");
        x.iter().zip(y.iter()).map(|(x, y)| self.h(x - y)).sum()
    }
}

impl<T> Measure for T
where
    T: Invariant,
{
    fn distance(&self, x: Coordinate, y: Coordinate) -> Energy {
        self.h(x - y)
    }
    fn invariant(&self) -> Option<&dyn Invariant> {
        Some(self)
    }
}

/// Squared Euclidean cost, `h(t) = t²`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SqEuclidean;

impl Invariant for SqEuclidean {
    fn h(&self, z: Coordinate) -> Energy {
        z * z
    }
}

/// Euclidean cost, `h(t) = |t|`. Its transport cost is the Earth Mover's Distance.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Euclidean;

impl Invariant for Euclidean {
    fn h(&self, z: Coordinate) -> Energy {
        z.abs()
    }
}

/// Power cost, `h(t) = |t|^p` with `p ≥ 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PNorm(f64);

impl PNorm {
    /// Exponent must be at least 1 for the kernel to stay convex.
    pub fn new(p: f64) -> Option<Self> {
        (p >= 1.).then_some(Self(p))
    }
    pub fn p(&self) -> f64 {
        self.0
    }
}

impl Invariant for PNorm {
    fn h(&self, z: Coordinate) -> Energy {
        z.abs().powf(self.0)
    }
}
