use super::*;
use rayon::iter::IntoParallelIterator;
use rayon::iter::ParallelIterator;
use uot_core::Probability;
use uot_core::Seed;
use uot_transport::*;

/// Which engine a solve ran on every slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Strategy {
    /// Quantile functions compared on a fixed grid of levels. Cost only.
    Quantiles,
    /// Monotone matching of sorted, equal-size, uniform slices.
    Sorted,
    /// North-west corner sweep with closed-form potentials.
    Sequential,
    /// CDF inversion with least-squares dual certification.
    Inversion,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quantiles => f.pad("quantiles"),
            Self::Sorted => f.pad("sorted"),
            Self::Sequential => f.pad("sequential"),
            Self::Inversion => f.pad("inversion"),
        }
    }
}

/// Sliced univariate optimal transport solver.
///
/// Treats each of the `d` coordinate slices of a [`Problem`] as an
/// independent 1-D transport problem and picks one engine for all of them:
///
/// 1. quantile levels configured: [`Grid`] (uniform marginals required)
/// 2. subsampled, or equal-size with uniform marginals: [`Monotone`]
/// 3. sequential mode: [`NorthWest`]
/// 4. otherwise: [`Inversion`]
///
/// Slices are solved in parallel. Plans are never reported for subsampled
/// problems, since their indices would refer to the subsample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Univariate {
    config: Config,
}

impl Univariate {
    pub fn config(&self) -> &Config {
        &self.config
    }
    /// Resolved quantile levels, if the solver approximates on a grid.
    pub fn quantiles(&self) -> Option<Vec<Probability>> {
        self.config.quantiles.as_ref().map(Quantiles::levels)
    }
    /// Number of quantile levels, 0 when solving exactly.
    pub fn num_quantiles(&self) -> usize {
        self.config.quantiles.as_ref().map_or(0, Quantiles::len)
    }

    /// Solves every slice of `problem`.
    ///
    /// Weighted subsampling draws from the default seed; use
    /// [`solve_seeded`](Self::solve_seeded) to control it.
    pub fn solve<'a, M>(&self, problem: &'a Problem<M>) -> Result<Output<'a, M>>
    where
        M: Measure,
    {
        self.solve_seeded(problem, Seed::default())
    }

    /// Solves every slice of `problem`, subsampling from `seed` if configured.
    pub fn solve_seeded<'a, M>(&self, problem: &'a Problem<M>, seed: Seed) -> Result<Output<'a, M>>
    where
        M: Measure,
    {
        let cost = problem.cost().invariant().ok_or(Error::Variant)?;
        self.config.validate()?;
        let subsample = match self.config.subsamples {
            Some(k) => Some(Subsample::from((problem, k, seed)).draw()?),
            None => None,
        };
        let (x, y) = match subsample {
            Some((ref x, ref y)) => (x, y),
            None => (problem.x(), problem.y()),
        };
        let strategy = self.strategy(problem, subsample.is_some())?;
        let transport = self.config.transport && subsample.is_none();
        let duals = self.config.duals;
        let levels = self.quantiles().unwrap_or_default();
        log::debug!("{:<32}{:<32}", "univariate strategy", strategy);
        log::debug!("{:<32}{:<32}", "univariate slices", problem.dims());
        let solutions = (0..problem.dims())
            .into_par_iter()
            .map(|k| {
                let solution = match strategy {
                    Strategy::Quantiles => Grid::from((x.column(k), y.column(k), cost, &levels[..]))
                        .minimize()
                        .solution(),
                    Strategy::Sorted => Monotone::from((x.column(k), y.column(k), cost))
                        .transport(transport)
                        .minimize()
                        .solution(),
                    Strategy::Sequential => {
                        NorthWest::from((problem.source(k), problem.target(k), cost))
                            .minimize()
                            .solution()
                    }
                    Strategy::Inversion => {
                        Inversion::from((problem.source(k), problem.target(k), cost))
                            .transport(transport)
                            .duals(duals)
                            .minimize()
                            .solution()
                    }
                };
                log::trace!("{:<32}{:<32}", format!("slice {}", k), solution.cost);
                solution.retain(transport, duals)
            })
            .collect::<Vec<Solution>>();
        Ok(Output::from((problem, strategy, solutions)))
    }

    fn strategy<M>(&self, problem: &Problem<M>, subsampled: bool) -> Result<Strategy> {
        if self.config.quantiles.is_some() {
            match problem.is_uniform() {
                true => Ok(Strategy::Quantiles),
                false => Err(Error::Uniformity),
            }
        } else if subsampled || (problem.is_uniform() && problem.is_equal_size()) {
            Ok(Strategy::Sorted)
        } else if self.config.sequential {
            Ok(Strategy::Sequential)
        } else {
            Ok(Strategy::Inversion)
        }
    }
}

impl From<Config> for Univariate {
    fn from(config: Config) -> Self {
        Self { config }
    }
}
