use super::support::Support;
use uot_core::Coordinate;
use uot_core::Probability;
use uot_core::UNIFORM_TOLERANCE;

/// A weighted point collection restricted to one coordinate slice.
///
/// Borrowed view over the positions and weights of one side of a transport
/// problem. Weights are expected to be non-negative and to sum to 1; the
/// owning problem validates that once, so engines never re-check it.
#[derive(Debug, Clone, Copy)]
pub struct Empirical<'a> {
    points: &'a [Coordinate],
    weights: &'a [Probability],
}

impl<'a> Empirical<'a> {
    pub fn points(&self) -> &'a [Coordinate] {
        self.points
    }
    pub fn weights(&self) -> &'a [Probability] {
        self.weights
    }
    pub fn len(&self) -> usize {
        self.points.len()
    }
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
    /// Probability mass at the i-th point.
    pub fn density(&self, i: usize) -> Probability {
        self.weights[i]
    }
    /// Whether every point carries mass `1/n`.
    pub fn is_uniform(&self) -> bool {
        uniform(self.weights)
    }
    /// Sorted positions with their sorting permutation.
    pub fn support(&self) -> Support {
        Support::from(self.points)
    }
}

impl<'a> From<(&'a [Coordinate], &'a [Probability])> for Empirical<'a> {
    fn from((points, weights): (&'a [Coordinate], &'a [Probability])) -> Self {
        debug_assert!(points.len() == weights.len(), "points and weights differ");
        Self { points, weights }
    }
}

/// Whether a weight vector is `1/n` everywhere, up to [`UNIFORM_TOLERANCE`].
pub fn uniform(weights: &[Probability]) -> bool {
    let n = weights.len() as Probability;
    weights
        .iter()
        .all(|w| (w - 1. / n).abs() <= UNIFORM_TOLERANCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_detection() {
        assert!(uniform(&[0.25; 4]));
        assert!(uniform(&[1. / 3.; 3]));
        assert!(!uniform(&[0.2, 0.3, 0.5]));
    }

    #[test]
    fn empirical_view() {
        let points = [2., 0., 1.];
        let weights = [0.5, 0.25, 0.25];
        let empirical = Empirical::from((&points[..], &weights[..]));
        assert_eq!(empirical.len(), 3);
        assert_eq!(empirical.density(0), 0.5);
        assert!(!empirical.is_uniform());
        assert_eq!(empirical.support().values(), &[0., 1., 2.]);
    }
}
