use uot_core::Coordinate;
use uot_core::Energy;
use uot_core::Probability;
use uot_transport::*;

/// Exact transport between two equal-size, uniformly weighted slices.
///
/// For convex translation-invariant costs on the line, the optimal coupling
/// of two uniform empirical measures of equal size is the monotone
/// rearrangement: the k-th smallest source point is matched to the k-th
/// smallest target point. No iteration, just two sorts.
///
/// # Complexity
///
/// O(n log n), dominated by sorting.
pub struct Monotone<'a, C: ?Sized> {
    x: &'a [Coordinate],
    y: &'a [Coordinate],
    cost: &'a C,
    transport: bool,
    total: Energy,
    plan: Option<Plan>,
}

impl<C> Monotone<'_, C>
where
    C: Invariant + ?Sized,
{
    /// Whether to record the matching as a sparse plan.
    pub fn transport(mut self, transport: bool) -> Self {
        self.transport = transport;
        self
    }
}

impl<C> Coupling for Monotone<'_, C>
where
    C: Invariant + ?Sized,
{
    fn minimize(mut self) -> Self {
        debug_assert!(self.x.len() == self.y.len(), "monotone matching needs n == m");
        let ref sx = Support::from(self.x);
        let ref sy = Support::from(self.y);
        let n = sx.len();
        let mass = 1. / n as Probability;
        self.total = sx
            .values()
            .iter()
            .zip(sy.values().iter())
            .map(|(x, y)| self.cost.h(x - y))
            .sum::<Energy>()
            * mass;
        self.plan = self.transport.then(|| {
            (0..n)
                .map(|k| (sx.index(k), sy.index(k), mass))
                .collect::<Plan>()
        });
        self
    }
    fn cost(&self) -> Energy {
        self.total
    }
    fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }
    fn potential(&self) -> Option<&Potential> {
        None
    }
    fn solution(self) -> Solution {
        Solution {
            cost: self.total,
            plan: self.plan,
            potential: None,
        }
    }
}

impl<'a, C> From<(&'a [Coordinate], &'a [Coordinate], &'a C)> for Monotone<'a, C>
where
    C: Invariant + ?Sized,
{
    fn from((x, y, cost): (&'a [Coordinate], &'a [Coordinate], &'a C)) -> Self {
        Self {
            x,
            y,
            cost,
            transport: true,
            total: 0.,
            plan: None,
        }
    }
}
