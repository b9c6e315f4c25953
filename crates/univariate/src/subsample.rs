use super::*;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use uot_core::Coordinate;
use uot_core::Probability;
use uot_core::Seed;
use uot_transport::Support;

/// Reduces both clouds of a problem to `k` points each.
///
/// Uniform marginals are thinned deterministically: every slice is sorted and
/// `k` evenly spaced order statistics are kept. Weighted marginals are
/// resampled `k` times with replacement, with probabilities given by the
/// weights, from two independent streams split off the caller's seed.
///
/// Either way the result is a pair of equal-size clouds with implicit uniform
/// weights, so the downstream engine is always the monotone matching.
pub struct Subsample<'a, M> {
    problem: &'a Problem<M>,
    k: usize,
    seed: Seed,
}

impl<M> Subsample<'_, M> {
    pub fn draw(&self) -> Result<(Cloud, Cloud)> {
        if self.k == 0 {
            return Err(Error::Subsamples);
        }
        if self.problem.is_uniform() {
            log::debug!("{:<32}{:<32}", "thinning to order statistics", self.k);
            Ok((self.thin(self.problem.x())?, self.thin(self.problem.y())?))
        } else {
            log::debug!("{:<32}{:<32}", "resampling by weight", self.k);
            let (lhs, rhs) = self.seed.split();
            let x = self.resample(self.problem.x(), self.problem.a(), lhs, Side::Source)?;
            let y = self.resample(self.problem.y(), self.problem.b(), rhs, Side::Target)?;
            Ok((x, y))
        }
    }

    /// Ranks `⌊t·n / (k - 1)⌋` for `t` in `0..k`, clamped to the last point.
    fn ranks(&self, n: usize) -> Vec<usize> {
        match self.k {
            1 => vec![0],
            k => (0..k).map(|t| (t * n / (k - 1)).min(n - 1)).collect(),
        }
    }

    fn thin(&self, cloud: &Cloud) -> Result<Cloud> {
        let ref ranks = self.ranks(cloud.len());
        let columns = cloud
            .columns()
            .map(|column| {
                let ref support = Support::from(column);
                ranks
                    .iter()
                    .map(|&r| support.value(r))
                    .collect::<Vec<Coordinate>>()
            })
            .collect();
        Cloud::from_columns(columns)
    }

    fn resample(
        &self,
        cloud: &Cloud,
        weights: &[Probability],
        seed: Seed,
        side: Side,
    ) -> Result<Cloud> {
        let distribution = WeightedIndex::<Probability>::new(weights).map_err(|_| Error::Unnormalized {
            side,
            total: weights.iter().sum(),
        })?;
        let mut rng = seed.rng();
        let rows = (0..self.k)
            .map(|_| distribution.sample(&mut rng))
            .collect::<Vec<usize>>();
        Ok(cloud.gather(&rows))
    }
}

impl<'a, M> From<(&'a Problem<M>, usize, Seed)> for Subsample<'a, M> {
    fn from((problem, k, seed): (&'a Problem<M>, usize, Seed)) -> Self {
        Self { problem, k, seed }
    }
}
