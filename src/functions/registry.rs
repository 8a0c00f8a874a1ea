use crate::math::{Scalar, ValueType};

/// Value rule: (argument values, output) -> resulting state
pub(crate) type ValueRule = fn(&[Scalar], &mut Scalar) -> ValueType;

/// Derivative rule: (argument values, argument derivatives, output) -> resulting state
pub(crate) type DerivativeRule = fn(&[Scalar], &[Scalar], &mut Scalar) -> ValueType;

/// How a function is differentiated
#[derive(Clone, Copy)]
pub(crate) enum Derivative {
    /// Closed-form rule over the argument values and their derivatives
    Analytic(DerivativeRule),
    /// Zero where no argument depends on the variable, undefined otherwise
    ConstantOnly,
}

/// Definition of a catalog function including its evaluation and differentiation logic
pub(crate) struct FunctionDefinition {
    /// Canonical name of the function (e.g., "sqrt", "nthrt")
    pub name: &'static str,

    /// Exact argument count
    pub arity: usize,

    /// Numerical evaluation; arguments are guaranteed valid
    pub eval: ValueRule,

    /// Differentiation logic
    pub derivative: Derivative,

    /// Arguments the derivative rule treats as constants. Their derivatives
    /// are not computed, and the whole call is not differentiable unless
    /// each of them is independent of the variable.
    pub constant_args: &'static [usize],
}

impl FunctionDefinition {
    pub(crate) fn validate_arity(&self, args: usize) -> bool {
        self.arity == args
    }

    pub(crate) fn is_constant_arg(&self, index: usize) -> bool {
        self.constant_args.contains(&index)
    }

    /// Whether the derivative rule must consult the differentiability of
    /// the arguments before it can run
    pub(crate) fn needs_independence_check(&self) -> bool {
        matches!(self.derivative, Derivative::ConstantOnly) || !self.constant_args.is_empty()
    }
}

