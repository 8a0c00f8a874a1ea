//! Per-pass evaluation state: cancellation, variable bindings and scratch
//! slots.

use crate::error::Cancelled;
use crate::functions::MAX_ARITY;
use crate::math::Scalar;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared cancellation flag.
///
/// Clones share the same flag, so the caller keeps one handle and passes
/// another to the evaluation. Raising it aborts the pass at the next node
/// boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Lower the flag so the token can be reused for the next pass
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Scratch slots for one function node: its argument values and the
/// derivatives of those arguments
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Frame {
    pub values: [Scalar; MAX_ARITY],
    pub derivatives: [Scalar; MAX_ARITY],
}

/// Context threaded through every recursive `value`/`derivative` call.
///
/// Scratch frames are keyed by recursion depth: the node at depth `d`
/// owns frame `d` for the duration of its call. Frames are allocated once
/// and reused by every later pass through the same context.
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    cancel: CancelToken,
    bindings: FxHashMap<String, Scalar>,
    frames: Vec<Frame>,
    depth: usize,
}

impl EvalContext {
    pub fn new(cancel: CancelToken) -> Self {
        Self::with_scratch_depth(cancel, crate::DEFAULT_SCRATCH_DEPTH)
    }

    /// Create a context with frames pre-allocated for trees up to `depth` deep
    pub fn with_scratch_depth(cancel: CancelToken, depth: usize) -> Self {
        EvalContext {
            cancel,
            bindings: FxHashMap::default(),
            frames: vec![Frame::default(); depth],
            depth: 0,
        }
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Bind a variable, replacing any previous value
    pub fn bind(&mut self, name: impl Into<String>, value: Scalar) {
        self.bindings.insert(name.into(), value);
    }

    pub fn unbind(&mut self, name: &str) -> Option<Scalar> {
        self.bindings.remove(name)
    }

    pub fn binding(&self, name: &str) -> Option<&Scalar> {
        self.bindings.get(name)
    }

    pub(crate) fn set_bindings(&mut self, bindings: FxHashMap<String, Scalar>) {
        self.bindings = bindings;
    }

    /// Fail with [`Cancelled`] once the token has been raised
    pub fn check_cancelled(&self) -> Result<(), Cancelled> {
        if self.cancel.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    /// Number of scratch frames currently allocated
    pub fn scratch_depth(&self) -> usize {
        self.frames.len()
    }

    /// Run `f` one recursion level deeper, handing it the depth of the
    /// frame it owns. The level is released on every exit path.
    pub(crate) fn with_frame<R>(&mut self, f: impl FnOnce(&mut Self, usize) -> R) -> R {
        let depth = self.depth;
        if self.frames.len() <= depth {
            self.frames.push(Frame::default());
        }
        self.depth += 1;
        let result = f(self, depth);
        self.depth -= 1;
        result
    }

    pub(crate) fn frame(&mut self, depth: usize) -> &mut Frame {
        &mut self.frames[depth]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let ctx = EvalContext::new(token.clone());
        assert!(ctx.check_cancelled().is_ok());

        token.cancel();
        assert_eq!(ctx.check_cancelled(), Err(Cancelled));

        token.reset();
        assert!(ctx.check_cancelled().is_ok());
    }

    #[test]
    fn test_bindings() {
        let mut ctx = EvalContext::default();
        ctx.bind("x", Scalar::real(2.0));
        assert_eq!(ctx.binding("x"), Some(&Scalar::real(2.0)));
        ctx.bind("x", Scalar::real(3.0));
        assert_eq!(ctx.binding("x"), Some(&Scalar::real(3.0)));
        assert_eq!(ctx.unbind("x"), Some(Scalar::real(3.0)));
        assert_eq!(ctx.binding("x"), None);
    }

    #[test]
    fn test_frames_grow_and_release() {
        let mut ctx = EvalContext::with_scratch_depth(CancelToken::new(), 1);
        let depths = ctx.with_frame(|ctx, outer| {
            let inner = ctx.with_frame(|_, inner| inner);
            (outer, inner)
        });
        assert_eq!(depths, (0, 1));
        assert_eq!(ctx.scratch_depth(), 2);

        // released levels are reused
        let again = ctx.with_frame(|_, depth| depth);
        assert_eq!(again, 0);
        assert_eq!(ctx.scratch_depth(), 2);
    }
}
