use thiserror::Error;

/// Error states a [`Scalar`](crate::Scalar) can carry.
///
/// Errors are absorbing: once an operand is invalid, every result computed
/// from it is invalid too, carrying the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ErrorKind {
    /// Domain violation: division by zero, factorial of a negative number,
    /// undefined derivative, NaN produced by the underlying arithmetic
    #[error("result is not a number")]
    NotANumber,
    /// A function that only accepts real input was given a complex operand
    #[error("complex argument passed to a real-only function")]
    PassedComplex,
    /// The tree is incomplete: an empty argument slot, a wrong child count
    /// or an unbound variable
    #[error("term is not ready for evaluation")]
    TermNotReady,
}

/// Control signal raised when an evaluation pass is cancelled.
///
/// This is not a value error: a cancelled pass produces no result at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Error)]
#[error("evaluation cancelled")]
pub struct Cancelled;

/// Errors returned by the top-level [`Calc`](crate::Calc) entry points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalcError {
    /// The pass was aborted through its cancellation token
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
    /// The pass completed but the result is invalid
    #[error("{0}")]
    Value(#[from] ErrorKind),
}

impl CalcError {
    /// The value error kind, if the pass was not cancelled
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            CalcError::Cancelled(_) => None,
            CalcError::Value(kind) => Some(*kind),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, CalcError::Cancelled(_))
    }
}

/// Diagnostic code attached to function nodes for display by the UI layer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ErrorCode {
    #[default]
    NoError,
    /// The node has no analytic derivative with respect to this variable
    NotDifferentiable(String),
}

impl ErrorCode {
    pub fn is_error(&self) -> bool {
        !matches!(self, ErrorCode::NoError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_error_conversions() {
        let err: CalcError = Cancelled.into();
        assert!(err.is_cancelled());
        assert_eq!(err.kind(), None);

        let err: CalcError = ErrorKind::PassedComplex.into();
        assert!(!err.is_cancelled());
        assert_eq!(err.kind(), Some(ErrorKind::PassedComplex));
    }

    #[test]
    fn test_display() {
        assert_eq!(Cancelled.to_string(), "evaluation cancelled");
        assert_eq!(
            CalcError::Value(ErrorKind::NotANumber).to_string(),
            "result is not a number"
        );
        assert_eq!(
            CalcError::Cancelled(Cancelled).to_string(),
            "evaluation cancelled"
        );
    }

    #[test]
    fn test_error_code() {
        assert!(!ErrorCode::default().is_error());
        assert!(ErrorCode::NotDifferentiable("x".into()).is_error());
    }
}
