//! Sampling, proximity fan-out, duration filtering, validation and target lists.

pub mod aggregate;
pub mod filter;
pub mod lst;
pub mod proximity;
pub mod sampler;
pub mod validation;
