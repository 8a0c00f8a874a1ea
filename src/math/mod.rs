//! Numeric primitives
//!
//! [`Scalar`] carries all real/complex arithmetic used by the function
//! rules. Helpers for discrete functions live here as well.

mod scalar;

pub use scalar::{Scalar, ValueType};

/// Largest `n` whose factorial is finite in `f64`
const MAX_FACTORIAL: u32 = 170;

/// Factorial of `x` rounded to the nearest integer.
///
/// Returns `None` for negative or NaN input. Values above 170 overflow to
/// positive infinity.
pub fn eval_factorial(x: f64) -> Option<f64> {
    let n = x.round();
    if n.is_nan() || n < 0.0 {
        return None;
    }
    if n > MAX_FACTORIAL as f64 {
        return Some(f64::INFINITY);
    }
    let mut result = 1.0;
    for k in 2..=(n as u32) {
        result *= k as f64;
    }
    Some(result)
}
