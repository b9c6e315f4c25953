use super::*;
use uot_core::Energy;
use uot_core::Probability;
use uot_transport::*;

/// Result of a univariate solve: one cost per slice, plus whatever plan and
/// dual information the selected engine recorded.
///
/// The record is immutable. Dense matrices are materialized on request from
/// the sparse plans and never cached.
#[derive(Debug, Clone)]
pub struct Output<'a, M> {
    problem: &'a Problem<M>,
    strategy: Strategy,
    costs: Vec<Energy>,
    plans: Option<Vec<Plan>>,
    potentials: Option<Vec<Potential>>,
}

impl<'a, M> Output<'a, M> {
    /// The problem this output solves.
    pub fn problem(&self) -> &'a Problem<M> {
        self.problem
    }
    /// The engine that produced it.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }
    /// Transport cost of every slice.
    pub fn costs(&self) -> &[Energy] {
        &self.costs
    }
    /// Sum of the per-slice costs, the usual sliced distance.
    pub fn total(&self) -> Energy {
        self.costs.iter().sum()
    }
    /// Sparse plan of every slice, in original point indices.
    pub fn plans(&self) -> Option<&[Plan]> {
        self.plans.as_deref()
    }
    /// Dual potentials of every slice, in original point indices.
    pub fn potentials(&self) -> Option<&[Potential]> {
        self.potentials.as_deref()
    }

    /// Dense `[n, m]` coupling of every slice.
    ///
    /// For equal-size uniform problems every plan is a permutation, so each
    /// entry lands in its own cell. Otherwise the same pair may show up in
    /// several plan entries and their masses are summed.
    pub fn transport_matrices(&self) -> Result<Vec<Matrix>> {
        let plans = self.plans.as_ref().ok_or(Error::Unavailable)?;
        let (n, m) = self.problem.shape();
        let bijective = self.problem.is_uniform() && self.problem.is_equal_size();
        Ok(plans
            .iter()
            .map(|plan| {
                let mut matrix = Matrix::zeros(n, m);
                for (i, j, mass) in plan.iter() {
                    match bijective {
                        true => matrix.set(i, j, mass),
                        false => matrix.add(i, j, mass),
                    }
                }
                matrix
            })
            .collect())
    }

    /// Average of [`transport_matrices`](Self::transport_matrices) over slices.
    pub fn mean_transport_matrix(&self) -> Result<Matrix> {
        let matrices = self.transport_matrices()?;
        let (n, m) = self.problem.shape();
        let scale = 1. / matrices.len() as Probability;
        Ok(matrices
            .iter()
            .fold(Matrix::zeros(n, m), |mut mean, matrix| {
                mean.axpy(scale, matrix);
                mean
            }))
    }
}

/// Assembles an output from per-slice solutions given in slice order.
///
/// Plans (or potentials) are kept only if every slice recorded one.
impl<'a, M> From<(&'a Problem<M>, Strategy, Vec<Solution>)> for Output<'a, M> {
    fn from((problem, strategy, solutions): (&'a Problem<M>, Strategy, Vec<Solution>)) -> Self {
        let costs = solutions.iter().map(|s| s.cost).collect();
        let (plans, potentials) = solutions
            .into_iter()
            .map(|s| (s.plan, s.potential))
            .unzip::<_, _, Vec<_>, Vec<_>>();
        Self {
            problem,
            strategy,
            costs,
            plans: plans.into_iter().collect(),
            potentials: potentials.into_iter().collect(),
        }
    }
}
