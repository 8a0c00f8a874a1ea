//! Parallel batch evaluation using Rayon
//!
//! Evaluates one tree, or its derivative, at many values of a variable.
//! Each worker thread owns its own [`EvalContext`](crate::EvalContext), so
//! scratch frames are never shared between concurrent passes; the tree
//! itself is only read.
//!
//! Enable with the `parallel` feature:
//! ```toml
//! formula_terms = { version = "0.1", features = ["parallel"] }
//! ```

use crate::builder::{derivative_in, value_in};
use crate::{Calc, CalcError, Calculatable, Scalar};
use rayon::prelude::*;

/// Evaluate `term` with `var` bound to each of `points`.
///
/// Other bindings and the cancellation token come from `calc`. Results are
/// returned in the order of `points`.
///
/// # Example
/// ```ignore
/// use formula_terms::{Calc, Scalar, Term, parallel::evaluate_points};
///
/// let points: Vec<Scalar> = (0..100).map(|i| Scalar::real(i as f64)).collect();
/// let values = evaluate_points(&Calc::new(), &Term::var("x").sqrt(), "x", &points);
/// ```
pub fn evaluate_points<T>(
    calc: &Calc,
    term: &T,
    var: &str,
    points: &[Scalar],
) -> Vec<Result<Scalar, CalcError>>
where
    T: Calculatable + Sync + ?Sized,
{
    points
        .par_iter()
        .map_init(
            || calc.context(),
            |ctx, point| {
                ctx.bind(var, *point);
                value_in(term, ctx)
            },
        )
        .collect()
}

/// Differentiate `term` with respect to `var` at each of `points`
pub fn derivative_points<T>(
    calc: &Calc,
    term: &T,
    var: &str,
    points: &[Scalar],
) -> Vec<Result<Scalar, CalcError>>
where
    T: Calculatable + Sync + ?Sized,
{
    points
        .par_iter()
        .map_init(
            || calc.context(),
            |ctx, point| {
                ctx.bind(var, *point);
                derivative_in(term, var, ctx)
            },
        )
        .collect()
}
