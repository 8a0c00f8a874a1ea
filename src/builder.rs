//! Builder pattern API for evaluation and differentiation
//!
//! Provides a fluent interface for configuring and running a pass over a
//! formula tree.
//!
//! # Example
//! ```
//! use formula_terms::{Calc, Term};
//!
//! let x = Term::var("x");
//! let expr = x.clone().pow(Term::number(2.0));
//!
//! let calc = Calc::new().var("x", 3.0);
//! assert_eq!(calc.value(&expr).unwrap().get_real(), 9.0);
//! assert_eq!(calc.derivative(&expr, "x").unwrap().get_real(), 6.0);
//! ```

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::diff::Differentiability;
use crate::error::{CalcError, Cancelled};
use crate::evaluator::{CancelToken, EvalContext};
use crate::math::{Scalar, ValueType};
use crate::traits::Calculatable;

/// Builder for evaluation passes
#[derive(Debug, Clone, Default)]
pub struct Calc {
    bindings: FxHashMap<String, Scalar>,
    cancel: CancelToken,
    scratch_depth: Option<usize>,
}

impl Calc {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a variable to a real value
    pub fn var(self, name: impl Into<String>, value: f64) -> Self {
        self.bind(name, Scalar::real(value))
    }

    /// Bind a variable to a complex value
    pub fn complex_var(self, name: impl Into<String>, re: f64, im: f64) -> Self {
        self.bind(name, Scalar::complex(re, im))
    }

    pub fn bind(mut self, name: impl Into<String>, value: Scalar) -> Self {
        self.bindings.insert(name.into(), value);
        self
    }

    /// Use a caller-held token so a pass can be aborted from another thread
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Pre-allocate scratch frames for trees up to `depth` deep
    pub fn scratch_depth(mut self, depth: usize) -> Self {
        self.scratch_depth = Some(depth);
        self
    }

    pub fn token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Build an evaluation context carrying this configuration.
    ///
    /// Reuse one context across repeated passes to keep its scratch frames.
    pub fn context(&self) -> EvalContext {
        let depth = self.scratch_depth.unwrap_or(crate::DEFAULT_SCRATCH_DEPTH);
        let mut ctx = EvalContext::with_scratch_depth(self.cancel.clone(), depth);
        ctx.set_bindings(self.bindings.clone());
        ctx
    }

    /// Evaluate `term`
    pub fn value<T>(&self, term: &T) -> Result<Scalar, CalcError>
    where
        T: Calculatable + ?Sized,
    {
        value_in(term, &mut self.context())
    }

    /// Differentiate `term` with respect to `var` at the bound point
    pub fn derivative<T>(&self, term: &T, var: &str) -> Result<Scalar, CalcError>
    where
        T: Calculatable + ?Sized,
    {
        derivative_in(term, var, &mut self.context())
    }

    pub fn differentiability<T>(&self, term: &T, var: &str) -> Differentiability
    where
        T: Calculatable + ?Sized,
    {
        term.differentiability(var)
    }
}

/// Evaluate `term` in an existing context
pub fn value_in<T>(term: &T, ctx: &mut EvalContext) -> Result<Scalar, CalcError>
where
    T: Calculatable + ?Sized,
{
    debug!("value pass");
    let mut out = Scalar::default();
    let state = term.value(ctx, &mut out);
    finish("value", state, out)
}

/// Differentiate `term` with respect to `var` in an existing context
pub fn derivative_in<T>(term: &T, var: &str, ctx: &mut EvalContext) -> Result<Scalar, CalcError>
where
    T: Calculatable + ?Sized,
{
    debug!(var, "derivative pass");
    let mut out = Scalar::default();
    let state = term.derivative(var, ctx, &mut out);
    finish("derivative", state, out)
}

fn finish(
    pass: &'static str,
    state: Result<ValueType, Cancelled>,
    out: Scalar,
) -> Result<Scalar, CalcError> {
    match state {
        Err(cancelled) => {
            debug!(pass, "pass cancelled");
            Err(cancelled.into())
        }
        Ok(ValueType::Invalid(kind)) => {
            debug!(pass, error = %kind, "pass produced an invalid result");
            Err(kind.into())
        }
        Ok(_) => {
            debug!(pass, complex = out.is_complex(), "pass finished");
            Ok(out)
        }
    }
}
