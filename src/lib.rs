//! Formula Term Evaluation Core
//!
//! The computational core of a formula-tree calculator: evaluates a tree of
//! function nodes to a real or complex value, differentiates it analytically
//! with respect to a named variable, and reports per node whether such a
//! derivative exists at all.
//!
//! # Features
//! - Real/complex [`Scalar`] with explicit, absorbing error states
//! - Catalog of functions: power, square and n-th root, factorial, absolute
//!   value, conjugate, real/imaginary part, conditional, plus the arithmetic
//!   operators
//! - Closed-form derivative rules and a [`Differentiability`] lattice
//! - Cooperative cancellation through a shared [`CancelToken`]
//! - **Builder pattern API** ([`Calc`]) for one-off passes
//! - Parallel batch evaluation behind the `parallel` feature
//!
//! # Usage Examples
//!
//! ```
//! use formula_terms::{Calc, Differentiability, ErrorKind, CalcError, Term};
//!
//! let x = Term::var("x");
//! let calc = Calc::new().var("x", 4.0);
//!
//! // d/dx sqrt(x) = 1 / (2 sqrt(x))
//! let d = calc.derivative(&x.clone().sqrt(), "x").unwrap();
//! assert_eq!(d.get_real(), 0.25);
//!
//! // factorial is only differentiable where it does not depend on x
//! let f = x.factorial();
//! assert_eq!(calc.differentiability(&f, "x"), Differentiability::None);
//! assert_eq!(
//!     calc.derivative(&f, "x"),
//!     Err(CalcError::Value(ErrorKind::NotANumber))
//! );
//! ```

mod ast;
mod builder;
mod diff;
mod error;
pub mod functions;
mod evaluator;
mod math;
pub mod traits;

#[cfg(feature = "parallel")]
pub mod parallel;

#[cfg(test)]
mod tests;

// Re-export key types for easier usage
pub use ast::{ExternalTerm, FunctionTerm, Term};
pub use builder::{Calc, derivative_in, value_in};
pub use diff::Differentiability;
pub use error::{CalcError, Cancelled, ErrorCode, ErrorKind};
pub use evaluator::{CancelToken, EvalContext};
pub use functions::{FunctionKind, MAX_ARITY};
pub use math::{Scalar, ValueType, eval_factorial};
pub use traits::Calculatable;

/// Default number of scratch frames allocated per evaluation context
pub const DEFAULT_SCRATCH_DEPTH: usize = 32;
