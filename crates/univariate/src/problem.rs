use super::*;
use uot_core::Arbitrary;
use uot_core::MASS_TOLERANCE;
use uot_core::Probability;
use uot_transport::*;

/// Transport problem between two weighted `[n, d]` and `[m, d]` point clouds.
///
/// Both clouds share the same dimension `d`; the univariate solver treats each
/// of the `d` coordinate slices as an independent 1-D problem with marginals
/// `a` and `b`. Construction validates the marginals once, so every engine can
/// assume non-negative weights summing to 1.
#[derive(Debug, Clone)]
pub struct Problem<M> {
    x: Cloud,
    y: Cloud,
    a: Vec<Probability>,
    b: Vec<Probability>,
    cost: M,
    uniform: bool,
}

impl<M> Problem<M>
where
    M: Measure,
{
    /// Problem with uniform marginals on both clouds.
    pub fn new(x: Cloud, y: Cloud, cost: M) -> Result<Self> {
        let a = vec![1. / x.len().max(1) as Probability; x.len()];
        let b = vec![1. / y.len().max(1) as Probability; y.len()];
        Self::weighted(x, y, a, b, cost)
    }
    /// Problem with explicit marginals.
    pub fn weighted(
        x: Cloud,
        y: Cloud,
        a: Vec<Probability>,
        b: Vec<Probability>,
        cost: M,
    ) -> Result<Self> {
        Self::validate(&x, &a, Side::Source)?;
        Self::validate(&y, &b, Side::Target)?;
        if x.dims() != y.dims() || x.dims() == 0 {
            return Err(Error::Dimension {
                source: x.dims(),
                target: y.dims(),
            });
        }
        let uniform = uniform(&a) && uniform(&b);
        Ok(Self {
            x,
            y,
            a,
            b,
            cost,
            uniform,
        })
    }

    fn validate(cloud: &Cloud, weights: &[Probability], side: Side) -> Result<()> {
        if cloud.is_empty() {
            return Err(Error::Empty(side));
        }
        if cloud.len() != weights.len() {
            return Err(Error::Length {
                side,
                points: cloud.len(),
                weights: weights.len(),
            });
        }
        if let Some((index, &value)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.)
        {
            return Err(Error::Weight { side, index, value });
        }
        let total = weights.iter().sum::<Probability>();
        if (total - 1.).abs() > MASS_TOLERANCE {
            return Err(Error::Unnormalized { side, total });
        }
        Ok(())
    }
}

impl<M> Problem<M> {
    /// Source point cloud.
    pub fn x(&self) -> &Cloud {
        &self.x
    }
    /// Target point cloud.
    pub fn y(&self) -> &Cloud {
        &self.y
    }
    /// Source marginal.
    pub fn a(&self) -> &[Probability] {
        &self.a
    }
    /// Target marginal.
    pub fn b(&self) -> &[Probability] {
        &self.b
    }
    /// Ground cost.
    pub fn cost(&self) -> &M {
        &self.cost
    }
    /// Number of points `(n, m)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.x.len(), self.y.len())
    }
    /// Number of coordinate slices `d`.
    pub fn dims(&self) -> usize {
        self.x.dims()
    }
    /// Whether both marginals are uniform.
    pub fn is_uniform(&self) -> bool {
        self.uniform
    }
    /// Whether both clouds have the same number of points.
    pub fn is_equal_size(&self) -> bool {
        self.x.len() == self.y.len()
    }
    /// Source marginal restricted to slice `k`.
    pub fn source(&self, k: usize) -> Empirical<'_> {
        Empirical::from((self.x.column(k), self.a()))
    }
    /// Target marginal restricted to slice `k`.
    pub fn target(&self, k: usize) -> Empirical<'_> {
        Empirical::from((self.y.column(k), self.b()))
    }
}

/// Random weighted problem with up to 12 points per side in up to 3 dimensions.
impl Arbitrary for Problem<SqEuclidean> {
    fn random() -> Self {
        let n = rand::random_range(1..=12usize);
        let m = rand::random_range(1..=12usize);
        let d = rand::random_range(1..=3usize);
        let cloud = |n: usize| {
            Cloud::from_columns(
                (0..d)
                    .map(|_| (0..n).map(|_| rand::random_range(-1.0..1.0)).collect())
                    .collect(),
            )
            .expect("rectangular columns")
        };
        let simplex = |n: usize| {
            let raw = (0..n)
                .map(|_| rand::random_range(0.1..1.0))
                .collect::<Vec<Probability>>();
            let sum = raw.iter().sum::<Probability>();
            raw.into_iter().map(|w| w / sum).collect()
        };
        Self::weighted(cloud(n), cloud(m), simplex(n), simplex(m), SqEuclidean)
            .expect("valid random problem")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(points: &[f64]) -> Cloud {
        Cloud::from(points.to_vec())
    }

    #[test]
    fn uniform_by_default() {
        let problem = Problem::new(line(&[0., 1., 2.]), line(&[0., 1.]), SqEuclidean)
            .expect("valid problem");
        assert!(problem.is_uniform());
        assert!(!problem.is_equal_size());
        assert_eq!(problem.shape(), (3, 2));
        assert_eq!(problem.dims(), 1);
    }

    #[test]
    fn explicit_uniform_weights_count_as_uniform() {
        let problem = Problem::weighted(
            line(&[0., 1.]),
            line(&[3., 4.]),
            vec![0.5, 0.5],
            vec![0.5, 0.5],
            Euclidean,
        )
        .expect("valid problem");
        assert!(problem.is_uniform());
        assert!(problem.is_equal_size());
    }

    #[test]
    fn rejects_empty_cloud() {
        let result = Problem::new(line(&[]), line(&[1.]), SqEuclidean);
        assert_eq!(result.err(), Some(Error::Empty(Side::Source)));
    }

    #[test]
    fn rejects_unnormalized_weights() {
        let result = Problem::weighted(
            line(&[0., 1.]),
            line(&[0.]),
            vec![0.5, 0.6],
            vec![1.],
            SqEuclidean,
        );
        assert!(matches!(
            result.err(),
            Some(Error::Unnormalized {
                side: Side::Source,
                ..
            })
        ));
    }

    #[test]
    fn rejects_negative_weights() {
        let result = Problem::weighted(
            line(&[0.]),
            line(&[0., 1.]),
            vec![1.],
            vec![1.5, -0.5],
            SqEuclidean,
        );
        assert_eq!(
            result.err(),
            Some(Error::Weight {
                side: Side::Target,
                index: 1,
                value: -0.5
            })
        );
    }

    #[test]
    fn rejects_dimension_mismatch() {
        let x = Cloud::from_columns(vec![vec![0., 1.], vec![0., 1.]]).expect("rectangular");
        let result = Problem::new(x, line(&[0., 1.]), SqEuclidean);
        assert_eq!(
            result.err(),
            Some(Error::Dimension {
                source: 2,
                target: 1
            })
        );
    }

    #[test]
    fn rejects_weight_length_mismatch() {
        let result = Problem::weighted(
            line(&[0., 1.]),
            line(&[0.]),
            vec![1.],
            vec![1.],
            SqEuclidean,
        );
        assert_eq!(
            result.err(),
            Some(Error::Length {
                side: Side::Source,
                points: 2,
                weights: 1
            })
        );
    }
}
