use super::plan::Plan;
use super::potential::Potential;
use uot_core::Energy;
use uot_core::Probability;

/// A transport plan (coupling) between two weighted point collections on a line.
///
/// In optimal transport theory, a coupling is a joint distribution π(x,y) whose
/// marginals match the source distribution P and target distribution Q. The
/// transport cost is the expected ground cost under this joint distribution.
///
/// # Algorithm Contract
///
/// Implementations must ensure that after [`minimize`](Coupling::minimize) is called,
/// [`cost`](Coupling::cost) returns the optimal transport cost, or the
/// engine's documented approximation of it.
///
/// Engines that do not record which points exchange mass return `None` from
/// [`plan`](Coupling::plan); engines that do not certify optimality return
/// `None` from [`potential`](Coupling::potential).
pub trait Coupling: Sized {
    /// Optimizes the coupling to minimize total transport cost.
    fn minimize(self) -> Self;
    /// Returns the total transport cost of this coupling.
    fn cost(&self) -> Energy;
    /// Sparse list of mass-carrying index pairs, if recorded.
    fn plan(&self) -> Option<&Plan>;
    /// Dual potentials certifying the cost, if computed.
    fn potential(&self) -> Option<&Potential>;
    /// Consumes the engine into its owned results.
    fn solution(self) -> Solution;
    /// Returns the mass transported from point `i` to point `j`.
    fn flow(&self, i: usize, j: usize) -> Probability {
        self.plan().map(|plan| plan.flow(i, j)).unwrap_or(0.)
    }
}

/// Owned result of minimizing one slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub cost: Energy,
    pub plan: Option<Plan>,
    pub potential: Option<Potential>,
}

impl Solution {
    /// Drops whatever the caller did not ask for.
    pub fn retain(self, transport: bool, duals: bool) -> Self {
        Self {
            cost: self.cost,
            plan: self.plan.filter(|_| transport),
            potential: self.potential.filter(|_| duals),
        }
    }
}
