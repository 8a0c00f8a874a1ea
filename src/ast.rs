//! Formula tree handed to the core by the tree-editing layer.
//!
//! The core only reads the tree. The one exception is the diagnostic slot
//! on each function node, which records the variable a derivative failed
//! for so the editor can display it next to the node.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::trace;

use crate::diff::Differentiability;
use crate::diff::engine::{derive_function, function_differentiability};
use crate::error::{Cancelled, ErrorCode, ErrorKind};
use crate::evaluator::{EvalContext, evaluate_function};
use crate::functions::FunctionKind;
use crate::math::{Scalar, ValueType};
use crate::traits::Calculatable;

/// A node of a formula tree
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Term {
    /// Argument slot the user has not filled yet
    #[default]
    Empty,

    /// Literal real or complex number
    Constant(Scalar),

    /// Named variable, resolved from the evaluation context
    Variable(String),

    /// Catalog function applied to its arguments
    Function(FunctionTerm),

    /// Node implemented outside this crate
    External(ExternalTerm),
}

/// Function node: a catalog tag and its ordered arguments
#[derive(Debug)]
pub struct FunctionTerm {
    kind: FunctionKind,
    args: Vec<Term>,
    error_code: Mutex<ErrorCode>,
}

/// Shared handle to a node type defined by the caller
#[derive(Clone)]
pub struct ExternalTerm(Arc<dyn Calculatable + Send + Sync>);

// ===== Term constructors =====

impl Term {
    pub fn empty() -> Self {
        Term::Empty
    }

    pub fn number(value: f64) -> Self {
        Term::Constant(Scalar::real(value))
    }

    pub fn complex(re: f64, im: f64) -> Self {
        Term::Constant(Scalar::complex(re, im))
    }

    pub fn var(name: impl Into<String>) -> Self {
        Term::Variable(name.into())
    }

    pub fn call(kind: FunctionKind, args: Vec<Term>) -> Self {
        Term::Function(FunctionTerm::new(kind, args))
    }

    pub fn external<T>(node: T) -> Self
    where
        T: Calculatable + Send + Sync + 'static,
    {
        Term::External(ExternalTerm::new(node))
    }

    pub fn pow(self, exponent: Term) -> Self {
        Term::call(FunctionKind::Power, vec![self, exponent])
    }

    pub fn sqrt(self) -> Self {
        Term::call(FunctionKind::Sqrt, vec![self])
    }

    /// `degree`-th root of `radicand`; the degree is truncated to an integer
    pub fn nth_root(degree: Term, radicand: Term) -> Self {
        Term::call(FunctionKind::NthRoot, vec![degree, radicand])
    }

    pub fn abs(self) -> Self {
        Term::call(FunctionKind::Abs, vec![self])
    }

    pub fn conj(self) -> Self {
        Term::call(FunctionKind::Conjugate, vec![self])
    }

    pub fn re(self) -> Self {
        Term::call(FunctionKind::Re, vec![self])
    }

    pub fn im(self) -> Self {
        Term::call(FunctionKind::Im, vec![self])
    }

    pub fn factorial(self) -> Self {
        Term::call(FunctionKind::Factorial, vec![self])
    }

    /// `then` when the real part of `condition` is positive, `otherwise` if not
    pub fn if_then_else(condition: Term, then: Term, otherwise: Term) -> Self {
        Term::call(FunctionKind::If, vec![condition, then, otherwise])
    }

    pub fn as_function(&self) -> Option<&FunctionTerm> {
        match self {
            Term::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_function_mut(&mut self) -> Option<&mut FunctionTerm> {
        match self {
            Term::Function(f) => Some(f),
            _ => None,
        }
    }
}

impl From<f64> for Term {
    fn from(value: f64) -> Self {
        Term::number(value)
    }
}

impl From<Scalar> for Term {
    fn from(value: Scalar) -> Self {
        Term::Constant(value)
    }
}

impl Add for Term {
    type Output = Term;
    fn add(self, rhs: Term) -> Term {
        Term::call(FunctionKind::Add, vec![self, rhs])
    }
}

impl Sub for Term {
    type Output = Term;
    fn sub(self, rhs: Term) -> Term {
        Term::call(FunctionKind::Subtract, vec![self, rhs])
    }
}

impl Mul for Term {
    type Output = Term;
    fn mul(self, rhs: Term) -> Term {
        Term::call(FunctionKind::Multiply, vec![self, rhs])
    }
}

impl Div for Term {
    type Output = Term;
    fn div(self, rhs: Term) -> Term {
        Term::call(FunctionKind::Divide, vec![self, rhs])
    }
}

impl Neg for Term {
    type Output = Term;
    fn neg(self) -> Term {
        Term::call(FunctionKind::Negate, vec![self])
    }
}

// ===== FunctionTerm =====

impl FunctionTerm {
    pub fn new(kind: FunctionKind, args: Vec<Term>) -> Self {
        FunctionTerm {
            kind,
            args,
            error_code: Mutex::new(ErrorCode::NoError),
        }
    }

    pub fn kind(&self) -> FunctionKind {
        self.kind
    }

    pub fn args(&self) -> &[Term] {
        &self.args
    }

    /// Mutable access for the tree editor. Must not be used while a pass
    /// over this tree is in flight.
    pub fn args_mut(&mut self) -> &mut Vec<Term> {
        &mut self.args
    }

    /// True when the node holds exactly as many arguments as its function takes
    pub fn is_complete(&self) -> bool {
        self.kind.definition().validate_arity(self.args.len())
    }

    /// Diagnostic left by the last differentiability query on this node
    pub fn error_code(&self) -> ErrorCode {
        self.lock_error_code().clone()
    }

    pub fn set_error_code(&self, code: ErrorCode) {
        *self.lock_error_code() = code;
    }

    pub(crate) fn record_differentiability(&self, grade: Differentiability, var: &str) {
        let code = if grade == Differentiability::None {
            trace!(function = %self.kind, var, "not differentiable");
            ErrorCode::NotDifferentiable(var.to_string())
        } else {
            ErrorCode::NoError
        };
        self.set_error_code(code);
    }

    fn lock_error_code(&self) -> MutexGuard<'_, ErrorCode> {
        // the slot holds plain data, a poisoned lock is still usable
        self.error_code
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clone for FunctionTerm {
    fn clone(&self) -> Self {
        FunctionTerm {
            kind: self.kind,
            args: self.args.clone(),
            error_code: Mutex::new(self.error_code()),
        }
    }
}

// Structural equality; diagnostics are not part of the tree's identity
impl PartialEq for FunctionTerm {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.args == other.args
    }
}

impl ExternalTerm {
    pub fn new<T>(node: T) -> Self
    where
        T: Calculatable + Send + Sync + 'static,
    {
        ExternalTerm(Arc::new(node))
    }
}

impl fmt::Debug for ExternalTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExternalTerm(..)")
    }
}

impl PartialEq for ExternalTerm {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

// ===== Calculatable =====

impl Calculatable for Term {
    fn value(&self, ctx: &mut EvalContext, out: &mut Scalar) -> Result<ValueType, Cancelled> {
        ctx.check_cancelled()?;
        match self {
            Term::Empty => Ok(out.invalidate(ErrorKind::TermNotReady)),
            Term::Constant(value) => Ok(out.assign(value)),
            Term::Variable(name) => Ok(match ctx.binding(name) {
                Some(value) => out.assign(value),
                None => out.invalidate(ErrorKind::TermNotReady),
            }),
            Term::Function(f) => f.value(ctx, out),
            Term::External(node) => node.0.value(ctx, out),
        }
    }

    fn derivative(
        &self,
        var: &str,
        ctx: &mut EvalContext,
        out: &mut Scalar,
    ) -> Result<ValueType, Cancelled> {
        ctx.check_cancelled()?;
        match self {
            Term::Empty => Ok(out.invalidate(ErrorKind::TermNotReady)),
            Term::Constant(value) => Ok(match value.error() {
                Some(kind) => out.invalidate(kind),
                None => out.set_real(0.0),
            }),
            Term::Variable(name) => Ok(match ctx.binding(name) {
                Some(_) => out.set_real(if name == var { 1.0 } else { 0.0 }),
                None => out.invalidate(ErrorKind::TermNotReady),
            }),
            Term::Function(f) => f.derivative(var, ctx, out),
            Term::External(node) => node.0.derivative(var, ctx, out),
        }
    }

    fn differentiability(&self, var: &str) -> Differentiability {
        match self {
            Term::Empty => Differentiability::None,
            Term::Constant(_) => Differentiability::Independent,
            Term::Variable(name) if name == var => Differentiability::Analytical,
            Term::Variable(_) => Differentiability::Independent,
            Term::Function(f) => f.differentiability(var),
            Term::External(node) => node.0.differentiability(var),
        }
    }
}

impl Calculatable for FunctionTerm {
    fn value(&self, ctx: &mut EvalContext, out: &mut Scalar) -> Result<ValueType, Cancelled> {
        evaluate_function(self, ctx, out)
    }

    fn derivative(
        &self,
        var: &str,
        ctx: &mut EvalContext,
        out: &mut Scalar,
    ) -> Result<ValueType, Cancelled> {
        derive_function(self, var, ctx, out)
    }

    fn differentiability(&self, var: &str) -> Differentiability {
        function_differentiability(self, var)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let x = Term::var("x");
        let t = x.clone().pow(Term::number(2.0));
        let f = t.as_function().expect("power is a function node");
        assert_eq!(f.kind(), FunctionKind::Power);
        assert_eq!(f.args(), &[x, Term::number(2.0)]);
        assert!(f.is_complete());
    }

    #[test]
    fn test_operators_build_calls() {
        let t = Term::var("x") + Term::number(1.0);
        assert_eq!(t.as_function().map(FunctionTerm::kind), Some(FunctionKind::Add));
        let t = -Term::var("x");
        assert_eq!(t.as_function().map(FunctionTerm::kind), Some(FunctionKind::Negate));
    }

    #[test]
    fn test_incomplete_node() {
        let mut t = Term::call(FunctionKind::If, vec![Term::number(1.0)]);
        let f = t.as_function_mut().expect("function node");
        assert!(!f.is_complete());
        f.args_mut().extend([Term::number(2.0), Term::number(3.0)]);
        assert!(f.is_complete());
    }

    #[test]
    fn test_diagnostics_ignored_by_equality_but_cloned() {
        let a = FunctionTerm::new(FunctionKind::Factorial, vec![Term::var("x")]);
        a.set_error_code(ErrorCode::NotDifferentiable("x".into()));
        let b = a.clone();
        assert_eq!(b.error_code(), ErrorCode::NotDifferentiable("x".into()));

        let c = FunctionTerm::new(FunctionKind::Factorial, vec![Term::var("x")]);
        assert_eq!(a, c);
    }

    #[test]
    fn test_external_equality_is_identity() {
        struct One;
        impl Calculatable for One {
            fn value(&self, _: &mut EvalContext, out: &mut Scalar) -> Result<ValueType, Cancelled> {
                Ok(out.set_real(1.0))
            }
            fn derivative(
                &self,
                _: &str,
                _: &mut EvalContext,
                out: &mut Scalar,
            ) -> Result<ValueType, Cancelled> {
                Ok(out.set_real(0.0))
            }
            fn differentiability(&self, _: &str) -> Differentiability {
                Differentiability::Independent
            }
        }

        let a = ExternalTerm::new(One);
        let b = a.clone();
        assert_eq!(Term::External(a), Term::External(b));
        assert_ne!(Term::external(One), Term::external(One));
    }
}
