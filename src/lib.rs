//! Sliced univariate optimal transport.
//!
//! This facade crate re-exports all public uot crates for convenient access.
//!
//! ## Crate Organization
//!
//! - [`core`]: Type aliases, solver constants, splittable seeds
//! - [`transport`]: Cost contracts, couplings, sparse plans, dual potentials
//! - [`univariate`]: The four 1-D engines and the sliced dispatcher

pub use uot_core        as core;
pub use uot_transport   as transport;
pub use uot_univariate  as univariate;
