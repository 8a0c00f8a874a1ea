//! Recursive differentiation and differentiability propagation.
//!
//! A function node evaluates its arguments first (their values feed most
//! rules, and their errors win over any derivative error), then the
//! derivatives of the arguments the rule needs, then applies its rule.

use super::Differentiability;
use crate::ast::FunctionTerm;
use crate::error::{Cancelled, ErrorKind};
use crate::evaluator::{EvalContext, evaluate_args};
use crate::functions::{Derivative, MAX_ARITY};
use crate::math::{Scalar, ValueType};
use crate::traits::Calculatable;

pub(crate) fn derive_function(
    term: &FunctionTerm,
    var: &str,
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

        if def.needs_independence_check()
            && function_differentiability(term, var) == Differentiability::None
        {
            return Ok(out.invalidate(ErrorKind::NotANumber));
        }

        let rule = match def.derivative {
            Derivative::ConstantOnly => return Ok(out.set_real(0.0)),
            Derivative::Analytic(rule) => rule,
        };

        for (i, arg) in term.args().iter().enumerate() {
            let mut slot = Scalar::ZERO;
            if !def.is_constant_arg(i) {
                arg.derivative(var, ctx, &mut slot)?;
                if let Some(kind) = slot.error() {
                    return Ok(out.invalidate(kind));
                }
            }
            ctx.frame(depth).derivatives[i] = slot;
        }

        let frame = ctx.frame(depth);
        Ok(rule(
            &frame.values[..def.arity],
            &frame.derivatives[..def.arity],
            out,
        ))
    })
}

/// Differentiability of a function node with respect to `var`.
///
/// Records the outcome on the node so the UI can point at the offending
/// function.
pub(crate) fn function_differentiability(term: &FunctionTerm, var: &str) -> Differentiability {
    let result = if term.is_complete() {
        let def = term.kind().definition();
        let grades: [Differentiability; MAX_ARITY] = std::array::from_fn(|i| {
            term.args()
                .get(i)
                .map_or(Differentiability::Independent, |arg| arg.differentiability(var))
        });
        let reduced = Differentiability::reduce(grades);
        let constants_independent = def
            .constant_args
            .iter()
            .all(|&i| grades[i].is_independent());
        match def.derivative {
            Derivative::Analytic(_) if constants_independent => reduced,
            Derivative::Analytic(_) => Differentiability::None,
            Derivative::ConstantOnly if reduced.is_independent() => Differentiability::Independent,
            Derivative::ConstantOnly => Differentiability::None,
        }
    } else {
        Differentiability::None
    };
    term.record_differentiability(result, var);
    result
}
