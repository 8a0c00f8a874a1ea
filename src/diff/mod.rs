//! Differentiation
//!
//! - [`Differentiability`]: the grade lattice and its reduction
//! - `engine`: the recursive derivative protocol for function nodes

pub(crate) mod engine;
mod lattice;

pub use lattice::Differentiability;
