//! Core type aliases, traits, and constants for univariate optimal transport.
//!
//! This crate provides the foundational scalar types, solver tolerances, and
//! the splittable randomness source used throughout the workspace.
#![allow(dead_code)]

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Scalar position of a point along one coordinate slice.
pub type Coordinate = f64;
/// Transport costs, dual potentials, and residual norms.
pub type Energy = f64;
/// Marginal weights, transported mass, and quantile levels.
pub type Probability = f64;

// ============================================================================
// TRAITS
// ============================================================================
/// Random instance generation for testing and benchmarking.
pub trait Arbitrary {
    /// Generate a uniformly random instance.
    fn random() -> Self;
}

// ============================================================================
// RANDOMNESS
// ============================================================================
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::hash::DefaultHasher;
use std::hash::Hash;
use std::hash::Hasher;

/// Deterministic, splittable source of randomness.
///
/// Subsampling draws from two independent streams (one per point cloud).
/// Both streams are derived from a single caller-provided seed so that a
/// replay with the same seed reproduces the same draws bit for bit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Seed(u64);

impl Seed {
    /// Derives two uncorrelated child seeds.
    pub fn split(&self) -> (Self, Self) {
        (self.branch(0), self.branch(1))
    }
    /// Pseudo-random generator seeded from this value.
    pub fn rng(&self) -> SmallRng {
        SmallRng::seed_from_u64(self.0)
    }
    fn branch(&self, index: u64) -> Self {
        let ref mut hasher = DefaultHasher::default();
        self.0.hash(hasher);
        index.hash(hasher);
        Self(hasher.finish())
    }
}

impl From<u64> for Seed {
    fn from(seed: u64) -> Self {
        Self(seed)
    }
}

impl From<Seed> for u64 {
    fn from(seed: Seed) -> Self {
        seed.0
    }
}

impl Arbitrary for Seed {
    fn random() -> Self {
        Self(rand::random())
    }
}

// ============================================================================
// MARGINAL VALIDATION
// Weights are normalized probability vectors up to floating tolerance.
// ============================================================================
/// Allowed deviation of a weight vector's total from 1.
pub const MASS_TOLERANCE: Probability = 1e-6;
/// Allowed deviation of each weight from 1/n for a marginal to count as uniform.
pub const UNIFORM_TOLERANCE: Probability = 1e-12;

// ============================================================================
// DUAL CERTIFICATION
// Least-squares solve of the complementary slackness system on active edges.
// ============================================================================
/// Absolute residual tolerance of the dual solve.
pub const DUAL_ATOL: Energy = 1e-6;
/// Relative residual tolerance of the dual solve.
pub const DUAL_RTOL: Energy = 1e-6;
/// Minimum iteration budget of the dual solve (scaled up with problem size).
pub const DUAL_ITERATIONS: usize = 256;
/// Curvature below which conjugate directions are considered degenerate.
pub const BREAKDOWN: Energy = 1e-300;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
