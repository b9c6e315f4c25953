use uot_core::Probability;

/// Sparse transport plan on one slice.
///
/// A list of `(i, j)` index pairs, each carrying the mass that point `i` of
/// the source sends to point `j` of the target. Indices refer to the original
/// (unsorted) point order. A 1-D optimal plan is supported on a monotone
/// staircase, so it never needs more than `n + m - 1` entries. The same pair
/// may appear more than once; its masses then add up.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Plan {
    pairs: Vec<(usize, usize)>,
    mass: Vec<Probability>,
}

impl Plan {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pairs: Vec::with_capacity(capacity),
            mass: Vec::with_capacity(capacity),
        }
    }
    /// Records that `i` sends `mass` to `j`.
    pub fn push(&mut self, i: usize, j: usize, mass: Probability) {
        self.pairs.push((i, j));
        self.mass.push(mass);
    }
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }
    pub fn mass(&self) -> &[Probability] {
        &self.mass
    }
    pub fn len(&self) -> usize {
        self.pairs.len()
    }
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
    /// Iterates `(i, j, mass)` entries in plan order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Probability)> + '_ {
        self.pairs
            .iter()
            .zip(self.mass.iter())
            .map(|(&(i, j), &m)| (i, j, m))
    }
    /// Entries that actually move mass.
    pub fn active(&self) -> impl Iterator<Item = (usize, usize, Probability)> + '_ {
        self.iter().filter(|&(_, _, m)| m > 0.)
    }
    /// Total transported mass (1 for a complete plan).
    pub fn total(&self) -> Probability {
        self.mass.iter().sum()
    }
    /// Mass sent from `i` to `j`, summed over repeated entries.
    pub fn flow(&self, i: usize, j: usize) -> Probability {
        self.iter()
            .filter(|&(x, y, _)| x == i && y == j)
            .map(|(_, _, m)| m)
            .sum()
    }
}

impl FromIterator<(usize, usize, Probability)> for Plan {
    fn from_iter<I: IntoIterator<Item = (usize, usize, Probability)>>(iter: I) -> Self {
        let mut plan = Self::default();
        iter.into_iter().for_each(|(i, j, m)| plan.push(i, j, m));
        plan
    }
}
