use crate::diff::Differentiability;
use crate::error::Cancelled;
use crate::evaluator::EvalContext;
use crate::math::{Scalar, ValueType};

/// The capability set every node of a formula tree provides.
///
/// Function nodes consume the same three operations from their children,
/// so any type implementing this trait can be plugged into a tree through
/// [`Term::External`](crate::Term::External).
///
/// `value` and `derivative` write their result into `out` and return its
/// state. A cancelled pass returns `Err(Cancelled)` and leaves `out`
/// unspecified.
pub trait Calculatable {
    fn value(&self, ctx: &mut EvalContext, out: &mut Scalar) -> Result<ValueType, Cancelled>;

    fn derivative(
        &self,
        var: &str,
        ctx: &mut EvalContext,
        out: &mut Scalar,
    ) -> Result<ValueType, Cancelled>;

    fn differentiability(&self, var: &str) -> Differentiability;
}
