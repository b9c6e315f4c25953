use uot_core::Coordinate;

/// Sorted support of a 1-D point collection, with the permutation that sorts it.
///
/// Every univariate engine starts by sorting each slice. The permutation is
/// carried along so that plans and dual vectors can be reported against the
/// caller's original point indices. Sorting is stable and uses
/// [`f64::total_cmp`], so ties keep their input order and the result is
/// reproducible across runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Support {
    values: Vec<Coordinate>,
    order: Vec<usize>,
}

impl Support {
    /// Sorted coordinates.
    pub fn values(&self) -> &[Coordinate] {
        &self.values
    }
    /// `order[k]` is the original index of the k-th smallest coordinate.
    pub fn order(&self) -> &[usize] {
        &self.order
    }
    /// The k-th smallest coordinate.
    pub fn value(&self, k: usize) -> Coordinate {
        self.values[k]
    }
    /// Original index of the k-th smallest coordinate.
    pub fn index(&self, k: usize) -> usize {
        self.order[k]
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    /// Gathers a per-point quantity into sorted order.
    pub fn permute<T: Copy>(&self, xs: &[T]) -> Vec<T> {
        self.order.iter().map(|&i| xs[i]).collect()
    }
    /// Scatters a quantity given in sorted order back to original order.
    pub fn unpermute<T: Copy + Default>(&self, xs: &[T]) -> Vec<T> {
        let mut original = vec![T::default(); xs.len()];
        self.order
            .iter()
            .zip(xs.iter())
            .for_each(|(&i, &x)| original[i] = x);
        original
    }
}

impl From<&[Coordinate]> for Support {
    fn from(points: &[Coordinate]) -> Self {
        let mut order = (0..points.len()).collect::<Vec<usize>>();
        order.sort_by(|&i, &j| points[i].total_cmp(&points[j]));
        let values = order.iter().map(|&i| points[i]).collect();
        Self { values, order }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_and_tracks_indices() {
        let support = Support::from(&[3., 1., 2.][..]);
        assert_eq!(support.values(), &[1., 2., 3.]);
        assert_eq!(support.order(), &[1, 2, 0]);
    }

    #[test]
    fn ties_keep_input_order() {
        let support = Support::from(&[1., 0., 1., 0.][..]);
        assert_eq!(support.order(), &[1, 3, 0, 2]);
    }

    #[test]
    fn permute_unpermute_inverse() {
        let support = Support::from(&[0.5, -1., 2., 0.][..]);
        let weights = [0.1, 0.2, 0.3, 0.4];
        let sorted = support.permute(&weights);
        assert_eq!(sorted, vec![0.2, 0.4, 0.1, 0.3]);
        assert_eq!(support.unpermute(&sorted), weights.to_vec());
    }
}
