//! Value and derivative rules for every catalog function
//!
//! Rules receive argument values that are already known to be valid; error
//! propagation from the arguments happens before a rule runs.
//!
//! Derivative rules receive `(args, arg_primes)` where `arg_primes[i]` is
//! the derivative of `args[i]`. Arguments listed in `constant_args` get a
//! zero in `arg_primes`.

use super::FunctionKind;
use super::registry::{Derivative, FunctionDefinition};
use crate::error::ErrorKind;
use crate::math::{Scalar, ValueType, eval_factorial};

pub(crate) fn definition(kind: FunctionKind) -> &'static FunctionDefinition {
    match kind {
        FunctionKind::Add => &ADD,
        FunctionKind::Subtract => &SUBTRACT,
        FunctionKind::Multiply => &MULTIPLY,
        FunctionKind::Divide => &DIVIDE,
        FunctionKind::Negate => &NEGATE,
        FunctionKind::Power => &POWER,
        FunctionKind::Sqrt => &SQRT,
        FunctionKind::NthRoot => &NTH_ROOT,
        FunctionKind::Abs => &ABS,
        FunctionKind::Conjugate => &CONJUGATE,
        FunctionKind::Re => &RE,
        FunctionKind::Im => &IM,
        FunctionKind::If => &IF,
        FunctionKind::Factorial => &FACTORIAL,
    }
}

// ===== Arithmetic operators =====

static ADD: FunctionDefinition = FunctionDefinition {
    name: "add",
    arity: 2,
    eval: |args, out| out.add(&args[0], &args[1]),
    // (u + v)' = u' + v'
    derivative: Derivative::Analytic(|_, primes, out| out.add(&primes[0], &primes[1])),
    constant_args: &[],
};

static SUBTRACT: FunctionDefinition = FunctionDefinition {
    name: "subtract",
    arity: 2,
    eval: |args, out| out.subtract(&args[0], &args[1]),
    derivative: Derivative::Analytic(|_, primes, out| out.subtract(&primes[0], &primes[1])),
    constant_args: &[],
};

static MULTIPLY: FunctionDefinition = FunctionDefinition {
    name: "multiply",
    arity: 2,
    eval: |args, out| out.multiply(&args[0], &args[1]),
    derivative: Derivative::Analytic(product_rule),
    constant_args: &[],
};

static DIVIDE: FunctionDefinition = FunctionDefinition {
    name: "divide",
    arity: 2,
    eval: |args, out| out.divide(&args[0], &args[1]),
    derivative: Derivative::Analytic(quotient_rule),
    constant_args: &[],
};

static NEGATE: FunctionDefinition = FunctionDefinition {
    name: "negate",
    arity: 1,
    eval: |args, out| out.negate(&args[0]),
    derivative: Derivative::Analytic(|_, primes, out| out.negate(&primes[0])),
    constant_args: &[],
};

/// (u * v)' = u' * v + u * v'
fn product_rule(args: &[Scalar], primes: &[Scalar], out: &mut Scalar) -> ValueType {
    let mut left = Scalar::default();
    left.multiply(&primes[0], &args[1]);
    let mut right = Scalar::default();
    right.multiply(&args[0], &primes[1]);
    out.add(&left, &right)
}

/// (u / v)' = (u' * v - u * v') / v^2
fn quotient_rule(args: &[Scalar], primes: &[Scalar], out: &mut Scalar) -> ValueType {
    let mut left = Scalar::default();
    left.multiply(&primes[0], &args[1]);
    let mut right = Scalar::default();
    right.multiply(&args[0], &primes[1]);
    let mut numerator = Scalar::default();
    numerator.subtract(&left, &right);
    let mut denominator = Scalar::default();
    denominator.multiply(&args[1], &args[1]);
    out.divide(&numerator, &denominator)
}

// ===== Common functions =====

static POWER: FunctionDefinition = FunctionDefinition {
    name: "power",
    arity: 2,
    eval: |args, out| out.pow(&args[0], &args[1]),
    derivative: Derivative::Analytic(power_rule),
    constant_args: &[],
};

/// Derivative of `f^g`, split by which side varies so that `log(f)` is
/// only taken when the exponent actually depends on the variable
fn power_rule(args: &[Scalar], primes: &[Scalar], out: &mut Scalar) -> ValueType {
    let (f, g) = (&args[0], &args[1]);
    let (df, dg) = (&primes[0], &primes[1]);
    match (df.is_zero(), dg.is_zero()) {
        // a^b
        (true, true) => out.set_real(0.0),
        // f^b: b * f^(b-1) * f'
        (false, true) => {
            let mut exponent = Scalar::default();
            exponent.subtract(g, &Scalar::ONE);
            let mut power = Scalar::default();
            power.pow(f, &exponent);
            let mut factor = Scalar::default();
            factor.multiply(g, &power);
            out.multiply(&factor, df)
        }
        // a^g: a^g * log(a) * g'
        (true, false) => {
            let mut log = Scalar::default();
            log.log(f);
            let mut power = Scalar::default();
            power.pow(f, g);
            let mut factor = Scalar::default();
            factor.multiply(&power, &log);
            out.multiply(&factor, dg)
        }
        // f^g: f^g * (f' * g / f + g' * log(f))
        (false, false) => {
            let mut first = Scalar::default();
            first.multiply(df, g);
            let mut first_over_f = Scalar::default();
            first_over_f.divide(&first, f);
            let mut log = Scalar::default();
            log.log(f);
            let mut second = Scalar::default();
            second.multiply(dg, &log);
            let mut sum = Scalar::default();
            sum.add(&first_over_f, &second);
            let mut power = Scalar::default();
            power.pow(f, g);
            out.multiply(&power, &sum)
        }
    }
}

static SQRT: FunctionDefinition = FunctionDefinition {
    name: "sqrt",
    arity: 1,
    eval: |args, out| out.sqrt(&args[0]),
    derivative: Derivative::Analytic(|args, primes, out| {
        // d/dx sqrt(u) = u' / (2 sqrt(u))
        let mut denominator = Scalar::default();
        denominator.sqrt(&args[0]);
        denominator.scale(2.0);
        out.divide(&primes[0], &denominator)
    }),
    constant_args: &[],
};

static NTH_ROOT: FunctionDefinition = FunctionDefinition {
    name: "nthrt",
    arity: 2,
    eval: |args, out| out.nth_root(&args[1], args[0].get_integer()),
    derivative: Derivative::Analytic(|args, primes, out| {
        // d/dx u^(1/n) = u' / (n * (u^(n-1))^(1/n))
        let n = args[0].get_integer();
        let mut power = Scalar::default();
        power.pow(&args[1], &Scalar::real(n as f64 - 1.0));
        let mut denominator = Scalar::default();
        denominator.nth_root(&power, n);
        denominator.scale(n as f64);
        out.divide(&primes[1], &denominator)
    }),
    constant_args: &[0],
};

static ABS: FunctionDefinition = FunctionDefinition {
    name: "abs",
    arity: 1,
    eval: |args, out| out.abs(&args[0]),
    derivative: Derivative::Analytic(|args, primes, out| {
        if args[0].is_complex() {
            return out.invalidate(ErrorKind::PassedComplex);
        }
        let sign = if args[0].get_real() >= 0.0 { 1.0 } else { -1.0 };
        out.assign(&primes[0]);
        out.scale(sign)
    }),
    constant_args: &[],
};

static CONJUGATE: FunctionDefinition = FunctionDefinition {
    name: "conjugate",
    arity: 1,
    eval: |args, out| out.conj(&args[0]),
    // anti-holomorphic
    derivative: Derivative::ConstantOnly,
    constant_args: &[],
};

static RE: FunctionDefinition = FunctionDefinition {
    name: "re",
    arity: 1,
    eval: |args, out| out.set_real(args[0].get_real()),
    derivative: Derivative::Analytic(|_, primes, out| out.set_real(primes[0].get_real())),
    constant_args: &[],
};

static IM: FunctionDefinition = FunctionDefinition {
    name: "im",
    arity: 1,
    eval: |args, out| out.set_real(args[0].get_imaginary()),
    derivative: Derivative::Analytic(|_, primes, out| out.set_real(primes[0].get_imaginary())),
    constant_args: &[],
};

static IF: FunctionDefinition = FunctionDefinition {
    name: "if",
    arity: 3,
    eval: |args, out| {
        if args[0].is_complex() {
            return out.invalidate(ErrorKind::PassedComplex);
        }
        let branch = if args[0].get_real() > 0.0 {
            &args[1]
        } else {
            &args[2]
        };
        out.assign(branch)
    },
    // the branch switch is a discontinuity; no branch is ever differentiated
    derivative: Derivative::ConstantOnly,
    constant_args: &[],
};

static FACTORIAL: FunctionDefinition = FunctionDefinition {
    name: "factorial",
    arity: 1,
    eval: |args, out| {
        if args[0].is_complex() {
            return out.invalidate(ErrorKind::PassedComplex);
        }
        match eval_factorial(args[0].get_real()) {
            Some(value) => out.set_real(value),
            None => out.invalidate(ErrorKind::NotANumber),
        }
    },
    derivative: Derivative::ConstantOnly,
    constant_args: &[],
};
