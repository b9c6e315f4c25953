use super::*;
use uot_core::Energy;
use uot_core::Probability;
use uot_transport::*;

/// Exact transport between two arbitrarily weighted slices by CDF inversion.
///
/// On the line, the optimal coupling for a convex `h(x - y)` pushes the
/// uniform measure on `[0, 1]` through both quantile functions at once. The
/// quantile functions are step functions that only jump at the cumulative
/// masses of either side, so merging both sets of cumulative levels splits
/// `[0, 1]` into intervals on which `(Q_x(t), Q_y(t))` is a single pair of
/// points. Each interval contributes `h(Q_x - Q_y)·(hi - lo)` to the cost and
/// one `(i, j, hi - lo)` entry to the plan.
///
/// Dual potentials are recovered afterwards by solving the complementary
/// slackness system over the mass-carrying pairs; see [`Slackness`].
///
/// # Complexity
///
/// O((n + m) log(n + m)) for the sorts and the merge, plus the dual solve.
pub struct Inversion<'a, C: ?Sized> {
    source: Empirical<'a>,
    target: Empirical<'a>,
    cost: &'a C,
    transport: bool,
    duals: bool,
    total: Energy,
    plan: Option<Plan>,
    potential: Option<Potential>,
}

/// One interval of the merged quantile levels, in sorted index space.
struct Interval {
    i: usize,
    j: usize,
    mass: Probability,
    cost: Energy,
}

impl<C> Inversion<'_, C>
where
    C: Invariant + ?Sized,
{
    /// Whether to record the sparse plan.
    pub fn transport(mut self, transport: bool) -> Self {
        self.transport = transport;
        self
    }
    /// Whether to solve for dual potentials.
    pub fn duals(mut self, duals: bool) -> Self {
        self.duals = duals;
        self
    }

    /// Running sums of the weights in sorted order, capped at 1 and ending
    /// exactly at 1 so both sides share their final level.
    fn cumulative(support: &Support, weights: &[Probability]) -> Vec<Probability> {
        let mut cdf = support
            .permute(weights)
            .into_iter()
            .scan(0., |acc, w| {
                *acc += w;
                Some(acc.min(1.))
            })
            .collect::<Vec<Probability>>();
        if let Some(last) = cdf.last_mut() {
            *last = 1.;
        }
        cdf
    }

    /// First sorted index whose cumulative mass reaches `level`.
    fn invert(cdf: &[Probability], level: Probability) -> usize {
        cdf.partition_point(|&c| c < level).min(cdf.len() - 1)
    }

    /// Splits `[0, 1]` at every cumulative level of either side and inverts
    /// both CDFs on each non-degenerate interval.
    fn intervals(&self, sx: &Support, sy: &Support) -> Vec<Interval> {
        let ref cx = Self::cumulative(sx, self.source.weights());
        let ref cy = Self::cumulative(sy, self.target.weights());
        let mut levels = std::iter::once(0.)
            .chain(cx.iter().copied())
            .chain(cy.iter().copied())
            .collect::<Vec<Probability>>();
        levels.sort_by(|p, q| p.total_cmp(q));
        levels
            .windows(2)
            .map(|w| (w[0], w[1]))
            .filter(|(lo, hi)| hi - lo > 0.)
            .map(|(lo, hi)| {
                let i = Self::invert(cx, hi);
                let j = Self::invert(cy, hi);
                Interval {
                    i,
                    j,
                    mass: hi - lo,
                    cost: self.cost.h(sx.value(i) - sy.value(j)),
                }
            })
            .collect()
    }

    /// Potentials satisfying `α_i + β_j = c_ij` on every interval's pair.
    fn certify(&self, sx: &Support, sy: &Support, intervals: &[Interval]) -> Potential {
        let edges = intervals.iter().map(|e| (e.i, e.j)).collect::<Vec<_>>();
        let costs = intervals.iter().map(|e| e.cost).collect::<Vec<_>>();
        let ref system = Slackness::new(sx.len(), sy.len(), &edges);
        let ref rhs = system.rhs(&costs);
        let guess = system.propagate(&costs);
        let (solution, convergence) =
            cgls(system, rhs, Some(guess), CglsOptions::sized(system.cols()));
        if !convergence.converged {
            log::warn!(
                "dual solve stopped after {} iterations with residual {:.3e}",
                convergence.iterations,
                convergence.residual
            );
        }
        let (alpha, beta) = solution.split_at(sx.len());
        Potential::new(sx.unpermute(alpha), sy.unpermute(beta), convergence)
    }
}

impl<C> Coupling for Inversion<'_, C>
where
    C: Invariant + ?Sized,
{
    fn minimize(mut self) -> Self {
        let ref sx = self.source.support();
        let ref sy = self.target.support();
        let intervals = self.intervals(sx, sy);
        self.total = intervals.iter().map(|e| e.cost * e.mass).sum::<Energy>();
        self.plan = self.transport.then(|| {
            intervals
                .iter()
                .map(|e| (sx.index(e.i), sy.index(e.j), e.mass))
                .collect::<Plan>()
        });
        self.potential = self.duals.then(|| self.certify(sx, sy, &intervals));
        self
    }
    fn cost(&self) -> Energy {
        self.total
    }
    fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }
    fn potential(&self) -> Option<&Potential> {
        self.potential.as_ref()
    }
    fn solution(self) -> Solution {
        Solution {
            cost: self.total,
            plan: self.plan,
            potential: self.potential,
        }
    }
}

impl<'a, C> From<(Empirical<'a>, Empirical<'a>, &'a C)> for Inversion<'a, C>
where
    C: Invariant + ?Sized,
{
    fn from((source, target, cost): (Empirical<'a>, Empirical<'a>, &'a C)) -> Self {
        Self {
            source,
            target,
            cost,
            transport: true,
            duals: true,
            total: 0.,
            plan: None,
            potential: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uot_core::Coordinate;

    fn solve<'a>(
        x: &'a [Coordinate],
        a: &'a [Probability],
        y: &'a [Coordinate],
        b: &'a [Probability],
        cost: &'a dyn Invariant,
    ) -> Inversion<'a, dyn Invariant + 'a> {
        Inversion::from((Empirical::from((x, a)), Empirical::from((y, b)), cost)).minimize()
    }

    fn certified<'a>(coupling: &Inversion<'a, dyn Invariant + 'a>, x: &[Coordinate], y: &[Coordinate]) {
        let plan = coupling.plan().expect("plan requested");
        let potential = coupling.potential().expect("duals requested");
        for (i, j, _) in plan.active() {
            let slack = potential.slack(i, j, coupling.cost.h(x[i] - y[j]));
            assert!(slack.abs() < 1e-9, "slack {} on ({}, {})", slack, i, j);
        }
    }

    #[test]
    fn staircase_costs_one() {
        let x = [0., 3.];
        let y = [1., 2.];
        let w = [0.5, 0.5];
        let coupling = solve(&x, &w, &y, &w, &Euclidean);
        assert!((coupling.cost() - 1.).abs() < 1e-12);
        assert_eq!(
            coupling.plan().expect("plan requested").pairs(),
            &[(0, 0), (1, 1)]
        );
        certified(&coupling, &x, &y);
        let potential = coupling.potential().expect("duals requested");
        assert!(potential.convergence().converged);
        assert!((potential.objective(&w, &w) - 1.).abs() < 1e-9);
        assert!(potential.a().iter().sum::<Energy>().abs() < 1e-9);
    }

    #[test]
    fn unequal_sizes_split_mass() {
        let x = [0., 1.];
        let a = [0.25, 0.75];
        let y = [0., 1., 2.];
        let b = [1. / 3.; 3];
        let coupling = solve(&x, &a, &y, &b, &SqEuclidean);
        assert!((coupling.cost() - 5. / 12.).abs() < 1e-12);
        let plan = coupling.plan().expect("plan requested");
        assert_eq!(plan.pairs(), &[(0, 0), (1, 0), (1, 1), (1, 2)]);
        assert!((plan.total() - 1.).abs() < 1e-12);
        assert!((plan.flow(1, 0) - 1. / 12.).abs() < 1e-12);
        certified(&coupling, &x, &y);
        let potential = coupling.potential().expect("duals requested");
        assert!((potential.objective(&a, &b) - 5. / 12.).abs() < 1e-9);
    }

    #[test]
    fn plan_uses_original_indices() {
        let x = [3., 0.];
        let y = [2., 1.];
        let w = [0.5, 0.5];
        let coupling = solve(&x, &w, &y, &w, &Euclidean);
        assert_eq!(
            coupling.plan().expect("plan requested").pairs(),
            &[(1, 1), (0, 0)]
        );
        assert!((coupling.flow(1, 1) - 0.5).abs() < 1e-15);
        certified(&coupling, &x, &y);
    }

    #[test]
    fn massless_points_receive_nothing() {
        let x = [0., 5., 1.];
        let a = [0.5, 0., 0.5];
        let y = [1., 2.];
        let b = [0.5, 0.5];
        let coupling = solve(&x, &a, &y, &b, &SqEuclidean);
        assert!((coupling.cost() - 1.).abs() < 1e-12);
        let plan = coupling.plan().expect("plan requested");
        assert!(plan.pairs().iter().all(|&(i, _)| i != 1));
        certified(&coupling, &x, &y);
    }

    #[test]
    fn outputs_are_optional() {
        let x = [0., 1.];
        let y = [2.];
        let a = [0.5, 0.5];
        let b = [1.];
        let coupling = Inversion::from((
            Empirical::from((&x[..], &a[..])),
            Empirical::from((&y[..], &b[..])),
            &Euclidean,
        ))
        .transport(false)
        .duals(false)
        .minimize();
        assert!((coupling.cost() - 1.5).abs() < 1e-12);
        assert!(coupling.plan().is_none());
        assert!(coupling.potential().is_none());
        assert_eq!(coupling.flow(0, 0), 0.);
    }

    #[test]
    fn rounded_totals_share_the_final_level() {
        // ten tenths sum to 0.9999999999999999, three thirds to 1.0
        let x = (0..10).map(|i| i as Coordinate).collect::<Vec<Coordinate>>();
        let a = [0.1; 10];
        let y = [0.5, 4.5, 8.5];
        let b = [1. / 3.; 3];
        let coupling = solve(&x, &a, &y, &b, &SqEuclidean);
        let plan = coupling.plan().expect("plan requested");
        assert!(plan.len() <= x.len() + y.len() - 1);
        assert!(plan.mass().iter().all(|&m| m > 1e-12));
        assert!((plan.total() - 1.).abs() < 1e-12);
        certified(&coupling, &x, &y);
    }

    #[test]
    fn duals_certify_hundreds_of_points() {
        use rand::Rng;
        use uot_core::Seed;
        let ref mut rng = Seed::from(7).rng();
        let mut simplex = |n: usize| {
            let raw = (0..n)
                .map(|_| rng.random_range(0.1..1.0))
                .collect::<Vec<Probability>>();
            let sum = raw.iter().sum::<Probability>();
            raw.into_iter().map(|w| w / sum).collect::<Vec<Probability>>()
        };
        let a = simplex(300);
        let b = simplex(200);
        let x = (0..300)
            .map(|_| rng.random_range(-2.0..2.0))
            .collect::<Vec<Coordinate>>();
        let y = (0..200)
            .map(|_| rng.random_range(-1.0..3.0))
            .collect::<Vec<Coordinate>>();
        let coupling = solve(&x, &a, &y, &b, &SqEuclidean);
        let plan = coupling.plan().expect("plan requested");
        let potential = coupling.potential().expect("duals requested");
        let convergence = potential.convergence();
        assert!(convergence.converged);
        assert!(convergence.residual <= 1e-6);
        let scale = plan
            .active()
            .map(|(i, j, _)| SqEuclidean.h(x[i] - y[j]))
            .fold(1., Energy::max);
        for (i, j, _) in plan.active() {
            let slack = potential.slack(i, j, SqEuclidean.h(x[i] - y[j]));
            assert!(slack.abs() <= 1e-6 * scale, "slack {} on ({}, {})", slack, i, j);
        }
        assert!((potential.objective(&a, &b) - coupling.cost()).abs() <= 1e-6 * scale);
        assert!(plan.len() <= x.len() + y.len() - 1);
    }
}
