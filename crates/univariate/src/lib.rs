//! Sliced univariate optimal transport.
//!
//! Solves the 1-D optimal transport problem independently on every coordinate
//! slice of two weighted point clouds, under a translation-invariant ground
//! cost `c(x, y) = h(x - y)`.
//!
//! ## Engines
//!
//! - [`Monotone`] — Sort-and-match for equal-size uniform slices
//! - [`Inversion`] — Merged-CDF inversion for arbitrary weights, with duals
//! - [`Grid`] — Quantile-grid approximation, cost only
//! - [`NorthWest`] — Sequential north-west corner sweep, with duals
//!
//! ## Orchestration
//!
//! - [`Univariate`] — Picks an engine from [`Config`] and the problem shape
//! - [`Subsample`] — Optional thinning or weighted resampling
//! - [`Output`] — Per-slice costs, sparse plans, dual potentials
//! - [`Matrix`] — Dense transport matrices materialized from plans
mod cgls;
mod cloud;
mod config;
mod error;
mod grid;
mod inversion;
mod matrix;
mod monotone;
mod northwest;
mod output;
mod problem;
mod solver;
mod subsample;

pub use cgls::*;
pub use cloud::*;
pub use config::*;
pub use error::*;
pub use grid::*;
pub use inversion::*;
pub use matrix::*;
pub use monotone::*;
pub use northwest::*;
pub use output::*;
pub use problem::*;
pub use solver::*;
pub use subsample::*;
