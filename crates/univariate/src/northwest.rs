use uot_core::Energy;
use uot_transport::*;

/// Exact transport by the north-west corner rule, with dual bookkeeping.
///
/// After sorting, the optimal 1-D coupling is the staircase that starts at
/// the smallest pair and greedily saturates whichever side runs out first.
/// The sweep takes exactly `n + m - 1` steps and emits one plan entry per
/// step. Potentials are filled in along the way: every time the pointer moves
/// to a fresh row or column, its potential is fixed by making the new edge
/// tight, `α_i + β_j = c_ij`. Strong duality then gives the cost as
/// `Σ a_i·α_i + Σ b_j·β_j` without a separate pass over the plan.
///
/// When the remaining masses tie exactly, the target pointer advances. The
/// resulting zero-mass edge stays in the plan.
///
/// Each step depends on the residual masses left by the previous one, so a
/// single slice is strictly sequential.
pub struct NorthWest<'a, C: ?Sized> {
    source: Empirical<'a>,
    target: Empirical<'a>,
    cost: &'a C,
    total: Energy,
    plan: Option<Plan>,
    potential: Option<Potential>,
}

impl<C> NorthWest<'_, C>
where
    C: Invariant + ?Sized,
{
    fn sweep(&self, sx: &Support, sy: &Support) -> (Plan, Vec<Energy>, Vec<Energy>) {
        let n = sx.len();
        let m = sy.len();
        let mut a = sx.permute(self.source.weights());
        let mut b = sy.permute(self.target.weights());
        let mut alpha = vec![0.; n];
        let mut beta = vec![0.; m];
        let mut plan = Plan::with_capacity(n + m - 1);
        let c = |i: usize, j: usize| self.cost.h(sx.value(i) - sy.value(j));
        let (mut i, mut j) = (0, 0);
        beta[0] = c(0, 0);
        for _ in 0..n + m - 2 {
            let mass = a[i].min(b[j]);
            let row = i + 1 < n && (j + 1 == m || a[i] < b[j]);
            plan.push(sx.index(i), sy.index(j), mass);
            a[i] -= mass;
            b[j] -= mass;
            if row {
                i += 1;
                alpha[i] = c(i, j) - beta[j];
            } else {
                j += 1;
                beta[j] = c(i, j) - alpha[i];
            }
        }
        plan.push(sx.index(i), sy.index(j), a[i].max(b[j]));
        (plan, alpha, beta)
    }
}

impl<C> Coupling for NorthWest<'_, C>
where
    C: Invariant + ?Sized,
{
    fn minimize(mut self) -> Self {
        let ref sx = self.source.support();
        let ref sy = self.target.support();
        let (plan, alpha, beta) = self.sweep(sx, sy);
        let potential = Potential::exact(sx.unpermute(&alpha), sy.unpermute(&beta));
        self.total = potential.objective(self.source.weights(), self.target.weights());
        self.plan = Some(plan);
        self.potential = Some(potential);
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

impl<'a, C> From<(Empirical<'a>, Empirical<'a>, &'a C)> for NorthWest<'a, C>
where
    C: Invariant + ?Sized,
{
    fn from((source, target, cost): (Empirical<'a>, Empirical<'a>, &'a C)) -> Self {
        Self {
            source,
            target,
            cost,
            total: 0.,
            plan: None,
            potential: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uot_core::Probability;

    /// Largest marginal violation of a plan.
    fn residual(plan: &Plan, a: &[Probability], b: &[Probability]) -> Probability {
        let mut rows = a.to_vec();
        let mut cols = b.to_vec();
        for (i, j, m) in plan.iter() {
            rows[i] -= m;
            cols[j] -= m;
        }
        rows.iter().chain(cols.iter()).map(|r| r.abs()).fold(0., f64::max)
    }

    #[test]
    fn staircase_ties_advance_target() {
        let x = [0., 3.];
        let y = [1., 2.];
        let w = [0.5, 0.5];
        let coupling = NorthWest::from((
            Empirical::from((&x[..], &w[..])),
            Empirical::from((&y[..], &w[..])),
            &Euclidean,
        ))
        .minimize();
        assert_eq!(coupling.cost(), 1.);
        let plan = coupling.plan().expect("always recorded");
        assert_eq!(plan.pairs(), &[(0, 0), (0, 1), (1, 1)]);
        assert_eq!(plan.mass(), &[0.5, 0., 0.5]);
        let potential = coupling.potential().expect("always recorded");
        assert_eq!(potential.a(), &[0., -1.]);
        assert_eq!(potential.b(), &[1., 2.]);
        assert!(potential.convergence().converged);
    }

    #[test]
    fn unequal_sizes_match_closed_form() {
        let x = [1., 0.];
        let a = [0.75, 0.25];
        let y = [2., 0., 1.];
        let b = [1. / 3.; 3];
        let coupling = NorthWest::from((
            Empirical::from((&x[..], &a[..])),
            Empirical::from((&y[..], &b[..])),
            &SqEuclidean,
        ))
        .minimize();
        assert!((coupling.cost() - 5. / 12.).abs() < 1e-12);
        let plan = coupling.plan().expect("always recorded");
        assert_eq!(plan.len(), x.len() + y.len() - 1);
        assert_eq!(plan.pairs(), &[(1, 1), (0, 1), (0, 2), (0, 0)]);
        assert!(residual(plan, &a, &b) < 1e-12);
        let potential = coupling.potential().expect("always recorded");
        for (i, j, _) in plan.iter() {
            assert!(potential.slack(i, j, SqEuclidean.h(x[i] - y[j])).abs() < 1e-12);
        }
    }

    #[test]
    fn single_points_carry_all_mass() {
        let x = [4.];
        let y = [1.];
        let w = [1.];
        let coupling = NorthWest::from((
            Empirical::from((&x[..], &w[..])),
            Empirical::from((&y[..], &w[..])),
            &SqEuclidean,
        ))
        .minimize();
        assert_eq!(coupling.cost(), 9.);
        assert_eq!(coupling.flow(0, 0), 1.);
    }
}
