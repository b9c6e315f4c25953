//! Optimal transport contracts shared by the univariate engines.
//!
//! This crate defines what a 1-D transport engine consumes and produces,
//! independently of how any particular engine solves the problem.
//!
//! ## Core Types
//!
//! - [`Measure`]: Ground cost between two points
//! - [`Invariant`]: Translation-invariant ground cost `h(x - y)`
//! - [`Empirical`]: A weighted point collection on one slice
//! - [`Support`]: Sorted positions plus the sorting permutation
//! - [`Coupling`]: A transport plan between two collections
//! - [`Plan`]: Sparse (index pair, mass) representation of a coupling
//! - [`Potential`]: Dual potentials certifying optimality
//!
//! ## Costs
//!
//! - [`SqEuclidean`]: `h(t) = t²`
//! - [`Euclidean`]: `h(t) = |t|`
//! - [`PNorm`]: `h(t) = |t|^p`
mod coupling;
mod density;
mod measure;
mod plan;
mod potential;
mod support;

pub use coupling::*;
pub use density::*;
pub use measure::*;
pub use plan::*;
pub use potential::*;
pub use support::*;
