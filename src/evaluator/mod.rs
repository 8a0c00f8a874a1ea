//! Recursive value evaluation.
//!
//! A function node checks the cancellation token, verifies its child count,
//! evaluates its children into its scratch frame and applies its value rule.
//! The first invalid child (in argument order) is returned verbatim; later
//! children are not evaluated.

mod context;

pub use context::{CancelToken, EvalContext};

use crate::ast::FunctionTerm;
use crate::error::{Cancelled, ErrorKind};
use crate::math::{Scalar, ValueType};
use crate::traits::Calculatable;

/// Evaluate every argument of `term` into the value slots of frame `depth`.
///
/// Returns the first argument error, if any.
pub(crate) fn evaluate_args(
    term: &FunctionTerm,
    ctx: &mut EvalContext,
    depth: usize,
) -> Result<Option<ErrorKind>, Cancelled> {
    for (i, arg) in term.args().iter().enumerate() {
        let mut slot = Scalar::default();
        arg.value(ctx, &mut slot)?;
        if let Some(kind) = slot.error() {
            return Ok(Some(kind));
        }
        ctx.frame(depth).values[i] = slot;
    }
    Ok(None)
}

pub(crate) fn evaluate_function(
    term: &FunctionTerm,
    ctx: &mut EvalContext,
    out: &mut Scalar,
) -> Result<ValueType, Cancelled> {
    ctx.check_cancelled()?;
    if !term.is_complete() {
        return Ok(out.invalidate(ErrorKind::TermNotReady));
    }
    let def = term.kind().definition();
    ctx.with_frame(|ctx, depth| -> Result<ValueType, Cancelled> {
        if let Some(kind) = evaluate_args(term, ctx, depth)? {
            return Ok(out.invalidate(kind));
        }
        let frame = ctx.frame(depth);
        Ok((def.eval)(&frame.values[..def.arity], out))
    })
}
