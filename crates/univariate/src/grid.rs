use uot_core::Coordinate;
use uot_core::Energy;
use uot_core::Probability;
use uot_transport::*;

/// Approximate transport cost from the quantile functions sampled on a grid.
///
/// Both slices are read through their empirical quantile function
/// `Q(t) = x_(⌈t·n⌉)` (with `Q(0)` the minimum) at every level, and the
/// cost is the mean of `h(Q_x(t) - Q_y(t))` over the levels. This only makes
/// sense for uniform marginals. The estimate is biased for coarse grids. Its
/// error against the exact cost is at most `(n + m)·h_max / (k - 1)` for a
/// uniform grid of `k` levels, so it vanishes as the grid is refined, though
/// not monotonically: a coarse grid can land exactly on the breakpoints that
/// a finer one straddles. No plan or duals.
pub struct Grid<'a, C: ?Sized> {
    x: &'a [Coordinate],
    y: &'a [Coordinate],
    cost: &'a C,
    levels: &'a [Probability],
    total: Energy,
}

impl<C> Grid<'_, C>
where
    C: Invariant + ?Sized,
{
    /// Empirical quantile of sorted values at level `t`.
    fn quantile(sorted: &[Coordinate], t: Probability) -> Coordinate {
        let n = sorted.len();
        let rank = (t * n as Probability).ceil() as usize;
        sorted[rank.saturating_sub(1).min(n - 1)]
    }
    fn quantiles(&self, points: &[Coordinate]) -> Vec<Coordinate> {
        let ref support = Support::from(points);
        self.levels
            .iter()
            .map(|&t| Self::quantile(support.values(), t))
            .collect()
    }
}

impl<C> Coupling for Grid<'_, C>
where
    C: Invariant + ?Sized,
{
    fn minimize(mut self) -> Self {
        let ref qx = self.quantiles(self.x);
        let ref qy = self.quantiles(self.y);
        self.total = self.cost.pairwise(qx, qy) / self.levels.len() as Energy;
        self
    }
    fn cost(&self) -> Energy {
        self.total
    }
    fn plan(&self) -> Option<&Plan> {
        None
    }
    fn potential(&self) -> Option<&Potential> {
        None
    }
    fn solution(self) -> Solution {
        Solution {
            cost: self.total,
            plan: None,
            potential: None,
        }
    }
}

impl<'a, C> From<(&'a [Coordinate], &'a [Coordinate], &'a C, &'a [Probability])> for Grid<'a, C>
where
    C: Invariant + ?Sized,
{
    fn from(
        (x, y, cost, levels): (&'a [Coordinate], &'a [Coordinate], &'a C, &'a [Probability]),
    ) -> Self {
        Self {
            x,
            y,
            cost,
            levels,
            total: 0.,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Quantiles;

    fn estimate(x: &[Coordinate], y: &[Coordinate], k: usize) -> Energy {
        let ref levels = Quantiles::Grid(k).levels();
        Grid::from((x, y, &SqEuclidean, &levels[..])).minimize().cost()
    }

    #[test]
    fn step_quantile_edges() {
        let sorted = [1., 2., 3., 4.];
        assert_eq!(Grid::<SqEuclidean>::quantile(&sorted, 0.), 1.);
        assert_eq!(Grid::<SqEuclidean>::quantile(&sorted, 0.25), 1.);
        assert_eq!(Grid::<SqEuclidean>::quantile(&sorted, 0.26), 2.);
        assert_eq!(Grid::<SqEuclidean>::quantile(&sorted, 1.), 4.);
    }

    #[test]
    fn translation_is_exact_on_any_grid() {
        let x = [3., 0., 2., 1.];
        let y = [1., 2., 3., 4.];
        for k in [1, 2, 7, 50] {
            assert!((estimate(&x, &y, k) - 1.).abs() < 1e-12);
        }
    }

    #[test]
    fn refinement_approaches_exact_cost() {
        let x = [0., 1., 2.];
        let y = [0., 2.];
        let exact = 1. / 3.;
        let coarse = estimate(&x, &y, 11);
        let fine = estimate(&x, &y, 1001);
        assert!((fine - exact).abs() < 1e-3);
        assert!((fine - exact).abs() < (coarse - exact).abs());
    }

    #[test]
    fn error_shrinks_with_grid_spacing() {
        let x = [0., 1., 2.];
        let y = [0., 2.];
        let exact = 1. / 3.;
        // worst squared gap between any two points
        let bound = (x.len() + y.len()) as Energy * 4.;
        for k in [2, 3, 5, 11, 101, 1001, 10001] {
            let error = (estimate(&x, &y, k) - exact).abs();
            assert!(error <= bound / (k - 1) as Energy, "k = {} error {}", k, error);
        }
    }

    #[test]
    fn refinement_is_not_monotone() {
        // levels 0, 1/2, 1 hit the breakpoints, 0, 1/4, .., 1 straddle them
        let x = [0., 1., 2.];
        let y = [0., 2.];
        let exact = 1. / 3.;
        assert!((estimate(&x, &y, 3) - exact).abs() < 1e-12);
        assert!((estimate(&x, &y, 5) - exact).abs() > 0.1);
    }

    #[test]
    fn never_records_plan_or_duals() {
        let x = [0.];
        let y = [1.];
        let levels = [0.5];
        let coupling = Grid::from((&x[..], &y[..], &Euclidean, &levels[..])).minimize();
        assert_eq!(coupling.cost(), 1.);
        assert!(coupling.plan().is_none());
        assert!(coupling.potential().is_none());
    }
}
