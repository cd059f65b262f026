//! Deterministic random number generation.
//!
//! All stochastic decisions in the simulation (seed placement, infection
//! draws) flow through [`RngManager`]. Same seed → same run.

mod xorshift;

pub use xorshift::RngManager;
