//! Real-or-complex scalar with an explicit error state.
//!
//! All arithmetic is done in place: the receiver is overwritten with the
//! result and the resulting [`ValueType`] is returned. Recursive evaluation
//! reuses the same output slots on every step instead of allocating.

use crate::error::ErrorKind;
use num_complex::Complex64;
use num_traits::{One, Zero};
use std::f64::consts::PI;

/// State of a [`Scalar`] after an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Real,
    Complex,
    Invalid(ErrorKind),
}

impl ValueType {
    pub fn is_valid(&self) -> bool {
        !matches!(self, ValueType::Invalid(_))
    }

    pub fn error(&self) -> Option<ErrorKind> {
        match self {
            ValueType::Invalid(kind) => Some(*kind),
            _ => None,
        }
    }
}

/// A real or complex number, or an error.
///
/// The imaginary part is only meaningful when the value is complex, and
/// neither part is meaningful once an error is set.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Scalar {
    re: f64,
    im: f64,
    complex: bool,
    error: Option<ErrorKind>,
}

impl Scalar {
    pub const ZERO: Scalar = Scalar::real(0.0);
    pub const ONE: Scalar = Scalar::real(1.0);

    pub const fn real(re: f64) -> Self {
        Scalar {
            re,
            im: 0.0,
            complex: false,
            error: None,
        }
    }

    pub const fn complex(re: f64, im: f64) -> Self {
        Scalar {
            re,
            im,
            complex: true,
            error: None,
        }
    }

    pub const fn invalid(kind: ErrorKind) -> Self {
        Scalar {
            re: f64::NAN,
            im: 0.0,
            complex: false,
            error: Some(kind),
        }
    }

    // ===== Accessors =====

    pub fn state(&self) -> ValueType {
        match self.error {
            Some(kind) => ValueType::Invalid(kind),
            None if self.complex => ValueType::Complex,
            None => ValueType::Real,
        }
    }

    pub fn error(&self) -> Option<ErrorKind> {
        self.error
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    pub fn is_complex(&self) -> bool {
        self.error.is_none() && self.complex
    }

    /// True for a valid exact zero (both parts for complex values)
    pub fn is_zero(&self) -> bool {
        self.error.is_none() && self.re == 0.0 && (!self.complex || self.im == 0.0)
    }

    pub fn get_real(&self) -> f64 {
        self.re
    }

    /// Imaginary part, `0.0` for real values
    pub fn get_imaginary(&self) -> f64 {
        if self.complex { self.im } else { 0.0 }
    }

    /// Real part truncated towards zero, used for discrete parameters
    /// such as a root degree. NaN maps to zero, infinities saturate.
    pub fn get_integer(&self) -> i64 {
        self.re as i64
    }

    pub fn to_complex(&self) -> Complex64 {
        Complex64::new(self.re, self.get_imaginary())
    }

    // ===== Setters =====

    pub fn set_real(&mut self, re: f64) -> ValueType {
        *self = Scalar::real(re);
        ValueType::Real
    }

    pub fn set_complex(&mut self, re: f64, im: f64) -> ValueType {
        *self = Scalar::complex(re, im);
        ValueType::Complex
    }

    pub fn invalidate(&mut self, kind: ErrorKind) -> ValueType {
        *self = Scalar::invalid(kind);
        ValueType::Invalid(kind)
    }

    /// Copy another scalar verbatim, including its error state
    pub fn assign(&mut self, other: &Scalar) -> ValueType {
        *self = *other;
        self.state()
    }

    /// Store a computed real result; NaN is a domain error
    fn store_real(&mut self, re: f64) -> ValueType {
        if re.is_nan() {
            return self.invalidate(ErrorKind::NotANumber);
        }
        self.set_real(re)
    }

    /// Store a computed complex result, collapsing to real when the
    /// imaginary part vanishes exactly
    fn store_complex(&mut self, c: Complex64) -> ValueType {
        if c.re.is_nan() || c.im.is_nan() {
            return self.invalidate(ErrorKind::NotANumber);
        }
        if c.im == 0.0 {
            self.set_real(c.re)
        } else {
            self.set_complex(c.re, c.im)
        }
    }

    // ===== Arithmetic =====

    pub fn add(&mut self, a: &Scalar, b: &Scalar) -> ValueType {
        if let Some(kind) = a.error.or(b.error) {
            return self.invalidate(kind);
        }
        if a.complex || b.complex {
            self.store_complex(a.to_complex() + b.to_complex())
        } else {
            self.store_real(a.re + b.re)
        }
    }

    pub fn subtract(&mut self, a: &Scalar, b: &Scalar) -> ValueType {
        if let Some(kind) = a.error.or(b.error) {
            return self.invalidate(kind);
        }
        if a.complex || b.complex {
            self.store_complex(a.to_complex() - b.to_complex())
        } else {
            self.store_real(a.re - b.re)
        }
    }

    pub fn multiply(&mut self, a: &Scalar, b: &Scalar) -> ValueType {
        if let Some(kind) = a.error.or(b.error) {
            return self.invalidate(kind);
        }
        if a.complex || b.complex {
            self.store_complex(a.to_complex() * b.to_complex())
        } else {
            self.store_real(a.re * b.re)
        }
    }

    pub fn divide(&mut self, a: &Scalar, b: &Scalar) -> ValueType {
        if let Some(kind) = a.error.or(b.error) {
            return self.invalidate(kind);
        }
        if b.is_zero() {
            return self.invalidate(ErrorKind::NotANumber);
        }
        if a.complex || b.complex {
            self.store_complex(a.to_complex() / b.to_complex())
        } else {
            self.store_real(a.re / b.re)
        }
    }

    /// Multiply the stored value by a real factor
    pub fn scale(&mut self, factor: f64) -> ValueType {
        if self.error.is_some() {
            return self.state();
        }
        if self.complex {
            self.store_complex(self.to_complex() * factor)
        } else {
            self.store_real(self.re * factor)
        }
    }

    pub fn negate(&mut self, a: &Scalar) -> ValueType {
        if let Some(kind) = a.error {
            return self.invalidate(kind);
        }
        if a.complex {
            self.store_complex(-a.to_complex())
        } else {
            self.store_real(-a.re)
        }
    }

    /// `base ^ exponent`, switching to the principal complex branch when
    /// either operand is complex or a negative base meets a fractional
    /// exponent
    pub fn pow(&mut self, base: &Scalar, exponent: &Scalar) -> ValueType {
        if let Some(kind) = base.error.or(exponent.error) {
            return self.invalidate(kind);
        }
        let negative_fractional = !base.complex
            && !exponent.complex
            && base.re < 0.0
            && exponent.re.fract() != 0.0;
        if base.complex || exponent.complex || negative_fractional {
            self.store_complex(complex_pow(base.to_complex(), exponent.to_complex()))
        } else {
            self.store_real(base.re.powf(exponent.re))
        }
    }

    /// Principal square root; negative reals give `i·sqrt(|a|)`
    pub fn sqrt(&mut self, a: &Scalar) -> ValueType {
        if let Some(kind) = a.error {
            return self.invalidate(kind);
        }
        if a.complex {
            self.store_complex(a.to_complex().sqrt())
        } else if a.re < 0.0 {
            self.store_complex(Complex64::new(0.0, (-a.re).sqrt()))
        } else {
            self.store_real(a.re.sqrt())
        }
    }

    /// `radicand ^ (1/n)` following the rules of [`Scalar::pow`]
    pub fn nth_root(&mut self, radicand: &Scalar, n: i64) -> ValueType {
        if let Some(kind) = radicand.error {
            return self.invalidate(kind);
        }
        if n == 0 {
            return self.invalidate(ErrorKind::NotANumber);
        }
        let exponent = Scalar::real(1.0 / n as f64);
        self.pow(radicand, &exponent)
    }

    /// Magnitude; always real
    pub fn abs(&mut self, a: &Scalar) -> ValueType {
        if let Some(kind) = a.error {
            return self.invalidate(kind);
        }
        if a.complex {
            self.store_real(a.to_complex().norm())
        } else {
            self.store_real(a.re.abs())
        }
    }

    pub fn conj(&mut self, a: &Scalar) -> ValueType {
        if let Some(kind) = a.error {
            return self.invalidate(kind);
        }
        if a.complex {
            self.store_complex(a.to_complex().conj())
        } else {
            self.store_real(a.re)
        }
    }

    /// Natural logarithm on the principal branch
    pub fn log(&mut self, a: &Scalar) -> ValueType {
        if let Some(kind) = a.error {
            return self.invalidate(kind);
        }
        if a.complex {
            self.store_complex(a.to_complex().ln())
        } else if a.re < 0.0 {
            self.store_complex(Complex64::new((-a.re).ln(), PI))
        } else {
            self.store_real(a.re.ln())
        }
    }
}

fn complex_pow(base: Complex64, exponent: Complex64) -> Complex64 {
    if base.is_zero() {
        return if exponent.is_zero() {
            Complex64::one()
        } else if exponent.re > 0.0 {
            Complex64::zero()
        } else {
            Complex64::new(f64::NAN, f64::NAN)
        };
    }
    (exponent * base.ln()).exp()
}

impl From<f64> for Scalar {
    fn from(re: f64) -> Self {
        Scalar::real(re)
    }
}

impl From<Complex64> for Scalar {
    fn from(c: Complex64) -> Self {
        Scalar::complex(c.re, c.im)
    }
}
