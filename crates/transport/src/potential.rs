use uot_core::Energy;
use uot_core::Probability;

/// Dual potentials certifying an optimal coupling.
///
/// In the Kantorovich dual, the transport cost equals
/// `Σ a_i·α_i + Σ b_j·β_j` for potentials satisfying `α_i + β_j ≤ c(x_i, y_j)`,
/// with equality on every edge that carries mass (complementary slackness).
/// `a` is indexed like the source points and `b` like the target points, in
/// original order.
///
/// Potentials recovered by an iterative solve also record how well they
/// satisfy the slackness system, so callers can decide whether to trust them.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Potential {
    a: Vec<Energy>,
    b: Vec<Energy>,
    convergence: Convergence,
}

/// Outcome of the solve that produced a [`Potential`].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Convergence {
    /// Euclidean norm of the slackness residual at the returned iterate.
    pub residual: Energy,
    /// Iterations spent (0 for closed-form potentials).
    pub iterations: usize,
    /// Whether the slackness residual itself met the requested tolerance.
    pub converged: bool,
}

impl Convergence {
    /// Exact, closed-form outcome.
    pub const fn exact() -> Self {
        Self {
            residual: 0.,
            iterations: 0,
            converged: true,
        }
    }
}

impl Potential {
    /// Potentials computed in closed form.
    pub fn exact(a: Vec<Energy>, b: Vec<Energy>) -> Self {
        Self::new(a, b, Convergence::exact())
    }
    pub fn new(a: Vec<Energy>, b: Vec<Energy>, convergence: Convergence) -> Self {
        Self { a, b, convergence }
    }
    /// Source-side potential `α`.
    pub fn a(&self) -> &[Energy] {
        &self.a
    }
    /// Target-side potential `β`.
    pub fn b(&self) -> &[Energy] {
        &self.b
    }
    pub fn convergence(&self) -> Convergence {
        self.convergence
    }
    /// Dual objective `Σ a_i·α_i + Σ b_j·β_j` for the given marginals.
    pub fn objective(&self, a: &[Probability], b: &[Probability]) -> Energy {
        let lhs = self.a.iter().zip(a.iter()).map(|(u, w)| u * w).sum::<Energy>();
        let rhs = self.b.iter().zip(b.iter()).map(|(v, w)| v * w).sum::<Energy>();
        lhs + rhs
    }
    /// Reduced cost `c - α_i - β_j` of an edge whose ground cost is `cost`.
    pub fn slack(&self, i: usize, j: usize, cost: Energy) -> Energy {
        cost - self.a[i] - self.b[j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objective_weights_both_sides() {
        let potential = Potential::exact(vec![0., -1.], vec![1., 2.]);
        assert_eq!(potential.objective(&[0.5, 0.5], &[0.5, 0.5]), 1.);
        assert!(potential.convergence().converged);
    }

    #[test]
    fn slack_vanishes_on_tight_edges() {
        let potential = Potential::exact(vec![0., -1.], vec![1., 2.]);
        assert_eq!(potential.slack(0, 0, 1.), 0.);
        assert_eq!(potential.slack(1, 1, 1.), 0.);
        assert_eq!(potential.slack(1, 0, 2.), 2.);
    }
}
