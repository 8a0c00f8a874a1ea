//! Catalog of supported functions
//!
//! Every [`FunctionKind`] maps to exactly one definition holding its arity,
//! value rule and derivative rule. The mapping is an exhaustive `match`, so
//! a new function cannot be added without its rules.

use std::fmt;

pub(crate) mod definitions;
pub(crate) mod registry;

pub(crate) use registry::{Derivative, FunctionDefinition};

/// Largest arity among the catalog functions
pub const MAX_ARITY: usize = 3;

/// Function tag of a [`FunctionTerm`](crate::FunctionTerm).
///
/// Argument order is fixed per function: `Power(base, exponent)`,
/// `NthRoot(degree, radicand)`, `If(condition, then, else)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    // Arithmetic operators
    Add,
    Subtract,
    Multiply,
    Divide,
    Negate,

    // Common functions
    Power,
    Sqrt,
    NthRoot,
    Abs,
    Conjugate,
    Re,
    Im,
    If,
    Factorial,
}

impl FunctionKind {
    pub const ALL: [FunctionKind; 14] = [
        FunctionKind::Add,
        FunctionKind::Subtract,
        FunctionKind::Multiply,
        FunctionKind::Divide,
        FunctionKind::Negate,
        FunctionKind::Power,
        FunctionKind::Sqrt,
        FunctionKind::NthRoot,
        FunctionKind::Abs,
        FunctionKind::Conjugate,
        FunctionKind::Re,
        FunctionKind::Im,
        FunctionKind::If,
        FunctionKind::Factorial,
    ];

    pub fn name(self) -> &'static str {
        self.definition().name
    }

    pub fn arity(self) -> usize {
        self.definition().arity
    }

    pub(crate) fn definition(self) -> &'static FunctionDefinition {
        definitions::definition(self)
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
