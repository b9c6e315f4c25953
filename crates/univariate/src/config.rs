use super::*;
use uot_core::Probability;

/// Quantile levels at which the approximate distance compares two marginals.
///
/// Deserializes from either a bare count (`8`) or an explicit list
/// (`[0.1, 0.5, 0.9]`).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Quantiles {
    /// `k` evenly spaced levels from 0 to 1 inclusive.
    Grid(usize),
    /// Explicit levels in `[0, 1]`.
    Levels(Vec<Probability>),
}

impl Quantiles {
    /// Resolved quantile levels.
    pub fn levels(&self) -> Vec<Probability> {
        match self {
            Self::Grid(1) => vec![0.],
            Self::Grid(k) => (0..*k)
                .map(|i| i as Probability / (*k - 1) as Probability)
                .collect(),
            Self::Levels(levels) => levels.clone(),
        }
    }
    /// Number of levels.
    pub fn len(&self) -> usize {
        match self {
            Self::Grid(k) => *k,
            Self::Levels(levels) => levels.len(),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Rejects empty grids and levels outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::Levels);
        }
        match self {
            Self::Grid(_) => Ok(()),
            Self::Levels(levels) => levels
                .iter()
                .find(|q| !(0. ..=1.).contains(*q))
                .map_or(Ok(()), |&q| Err(Error::Level(q))),
        }
    }
}

/// Solver configuration.
///
/// # Fields
///
/// - `subsamples` — reduce both clouds to this many points before solving
/// - `quantiles` — approximate the distance on a grid of quantile levels
/// - `sequential` — use the north-west corner engine instead of CDF inversion
/// - `transport` — record sparse transport plans
/// - `duals` — record dual potentials
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    pub subsamples: Option<usize>,
    pub quantiles: Option<Quantiles>,
    pub sequential: bool,
    pub transport: bool,
    pub duals: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            subsamples: None,
            quantiles: None,
            sequential: false,
            transport: true,
            duals: true,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.subsamples == Some(0) {
            return Err(Error::Subsamples);
        }
        self.quantiles.as_ref().map_or(Ok(()), Quantiles::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_inclusive_linspace() {
        assert_eq!(Quantiles::Grid(5).levels(), vec![0., 0.25, 0.5, 0.75, 1.]);
        assert_eq!(Quantiles::Grid(1).levels(), vec![0.]);
        assert_eq!(Quantiles::Grid(3).len(), 3);
    }

    #[test]
    fn invalid_quantiles_rejected() {
        assert_eq!(Quantiles::Grid(0).validate(), Err(Error::Levels));
        assert_eq!(Quantiles::Levels(vec![]).validate(), Err(Error::Levels));
        assert_eq!(
            Quantiles::Levels(vec![0.5, 1.5]).validate(),
            Err(Error::Level(1.5))
        );
        assert_eq!(Quantiles::Levels(vec![0., 1.]).validate(), Ok(()));
    }

    #[test]
    fn zero_subsamples_rejected() {
        let config = Config {
            subsamples: Some(0),
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(Error::Subsamples));
    }

    #[test]
    fn deserializes_partial_config() {
        let config = serde_json::from_str::<Config>(r#"{ "quantiles": 8 }"#).expect("valid json");
        assert_eq!(config.quantiles, Some(Quantiles::Grid(8)));
        assert!(config.transport);
        assert!(config.duals);
        assert!(!config.sequential);
        let config = serde_json::from_str::<Config>(r#"{ "quantiles": [0.25, 0.75], "sequential": true }"#)
            .expect("valid json");
        assert_eq!(config.quantiles, Some(Quantiles::Levels(vec![0.25, 0.75])));
        assert!(config.sequential);
    }
}
