use crate::{Calc, CalcError, ErrorCode, ErrorKind, Scalar, Term};

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON * a.abs().max(b.abs()).max(1.0)
}

fn n(v: f64) -> Term {
    Term::number(v)
}

fn x() -> Term {
    Term::var("x")
}

fn d_at(term: &Term, at: f64) -> Result<Scalar, CalcError> {
    Calc::new().var("x", at).derivative(term, "x")
}

fn d_real(term: &Term, at: f64) -> f64 {
    d_at(term, at).expect("derivative should exist").get_real()
}

fn d_error(term: &Term, at: f64) -> Option<ErrorKind> {
    d_at(term, at).err().and_then(|e| e.kind())
}

#[test]
fn test_leaves() {
    assert_eq!(d_real(&x(), 5.0), 1.0);
    assert_eq!(d_real(&n(3.0), 5.0), 0.0);
    assert_eq!(d_error(&Term::empty(), 5.0), Some(ErrorKind::TermNotReady));

    let calc = Calc::new().var("x", 5.0).var("y", 1.0);
    assert_eq!(calc.derivative(&Term::var("y"), "x").unwrap().get_real(), 0.0);
}

#[test]
fn test_unbound_variable_agrees_with_value_pass() {
    let calc = Calc::new().var("x", 5.0);
    for var in ["x", "y"] {
        assert_eq!(
            calc.derivative(&Term::var("y"), var),
            Err(CalcError::Value(ErrorKind::TermNotReady))
        );
    }
    assert_eq!(
        calc.value(&Term::var("y")),
        Err(CalcError::Value(ErrorKind::TermNotReady))
    );
}

#[test]
fn test_sqrt() {
    let expr = x().sqrt();
    for at in [0.25, 1.0, 2.0, 9.0, 100.0] {
        assert!(approx_eq(d_real(&expr, at), 1.0 / (2.0 * at.sqrt())));
    }
    // the derivative does not exist at zero
    assert_eq!(d_error(&expr, 0.0), Some(ErrorKind::NotANumber));
}

#[test]
fn test_power_variable_base() {
    let expr = x().pow(n(2.0));
    for at in [-3.0, -0.5, 0.0, 1.0, 4.0] {
        assert!(approx_eq(d_real(&expr, at), 2.0 * at));
    }
}

#[test]
fn test_power_variable_exponent() {
    let expr = n(2.0).pow(x());
    for at in [-1.0, 0.0, 0.5, 3.0] {
        assert!(approx_eq(d_real(&expr, at), 2.0_f64.powf(at) * 2.0_f64.ln()));
    }
}

#[test]
fn test_power_both_vary() {
    // d/dx x^x = x^x (1 + ln x)
    let expr = x().pow(x());
    for at in [0.5, 1.0, 2.0, 3.0] {
        assert!(approx_eq(d_real(&expr, at), at.powf(at) * (1.0 + at.ln())));
    }
}

#[test]
fn test_power_constant_skips_log() {
    // log(0) would be involved if the exponent rule ran
    let expr = n(0.0).pow(n(2.0));
    assert_eq!(d_real(&expr, 1.0), 0.0);
}

#[test]
fn test_nth_root() {
    let expr = Term::nth_root(n(3.0), x());
    // d/dx x^(1/3) = 1 / (3 x^(2/3))
    for at in [1.0, 8.0, 27.0] {
        assert!(approx_eq(d_real(&expr, at), 1.0 / (3.0 * at.powf(2.0 / 3.0))));
    }
}

#[test]
fn test_nth_root_negative_degree() {
    // d/dx x^(-1/2) = -1/2 x^(-3/2)
    let expr = Term::nth_root(n(-2.0), x());
    for at in [1.0, 4.0, 9.0] {
        assert!(approx_eq(d_real(&expr, at), -0.5 * at.powf(-1.5)));
    }
}

#[test]
fn test_nth_root_extreme_degrees() {
    // degrees that saturate the integer conversion must not overflow
    for degree in [-1e19, f64::NEG_INFINITY, 1e19, f64::INFINITY] {
        let d = d_real(&Term::nth_root(n(degree), x()), 2.0);
        assert!(d.abs() < 1e-15, "degree {degree}: {d}");
    }
    assert_eq!(
        d_error(&Term::nth_root(n(0.0), x()), 2.0),
        Some(ErrorKind::NotANumber)
    );
}

#[test]
fn test_nth_root_with_variable_degree() {
    let expr = Term::nth_root(x(), n(8.0));
    assert_eq!(d_error(&expr, 3.0), Some(ErrorKind::NotANumber));
    assert_eq!(
        expr.as_function().map(|f| f.error_code()),
        Some(ErrorCode::NotDifferentiable("x".into()))
    );
}

#[test]
fn test_abs() {
    let expr = (x() * n(3.0)).abs();
    assert_eq!(d_real(&expr, -2.0), -3.0);
    assert_eq!(d_real(&expr, 2.0), 3.0);
    // sign of zero is positive
    assert_eq!(d_real(&expr, 0.0), 3.0);

    let expr = (x() * Term::complex(0.0, 1.0)).abs();
    assert_eq!(d_error(&expr, 1.0), Some(ErrorKind::PassedComplex));
}

#[test]
fn test_re_im() {
    // x * (2 + 3i): derivative 2 + 3i
    let expr = x() * Term::complex(2.0, 3.0);
    assert_eq!(d_real(&expr.clone().re(), 1.0), 2.0);
    assert_eq!(d_real(&expr.im(), 1.0), 3.0);
    assert_eq!(d_real(&x().im(), 1.0), 0.0);
}

#[test]
fn test_discontinuous_functions_of_constants() {
    let calc = Calc::new().var("x", 1.0).var("y", 2.0);
    for expr in [
        n(5.0).factorial(),
        Term::complex(1.0, 2.0).conj(),
        Term::if_then_else(n(1.0), n(2.0), Term::var("y") * n(0.0)),
    ] {
        let d = calc.derivative(&expr, "x").unwrap();
        assert!(d.is_zero(), "{expr:?}");
    }
}

#[test]
fn test_discontinuous_functions_of_variable() {
    for expr in [
        x().factorial(),
        x().conj(),
        Term::if_then_else(x(), n(10.0), n(20.0)),
    ] {
        assert_eq!(d_error(&expr, 2.0), Some(ErrorKind::NotANumber), "{expr:?}");
        assert_eq!(
            expr.as_function().map(|f| f.error_code()),
            Some(ErrorCode::NotDifferentiable("x".into()))
        );
    }
}

#[test]
fn test_if_never_differentiates_the_taken_branch() {
    // the condition is constant, but a branch depends on x
    let expr = Term::if_then_else(n(1.0), x().pow(n(2.0)), n(0.0));
    assert_eq!(d_error(&expr, 3.0), Some(ErrorKind::NotANumber));
}

#[test]
fn test_chain_and_quotient() {
    // d/dx sqrt(x^2 + 1) = x / sqrt(x^2 + 1)
    let expr = (x().pow(n(2.0)) + n(1.0)).sqrt();
    for at in [-2.0_f64, 0.0, 1.5] {
        let expected = at / (at * at + 1.0).sqrt();
        assert!(approx_eq(d_real(&expr, at), expected));
    }

    // d/dx x / (x + 1) = 1 / (x + 1)^2
    let expr = x() / (x() + n(1.0));
    assert!(approx_eq(d_real(&expr, 2.0), 1.0 / 9.0));

    // d/dx -(x * x) = -2x
    let expr = -(x() * x());
    assert!(approx_eq(d_real(&expr, 4.0), -8.0));
}

#[test]
fn test_value_error_wins_over_derivative_error() {
    // factorial(x) has no derivative, but the empty slot is reported first
    let expr = x().factorial() + Term::empty();
    assert_eq!(d_error(&expr, 1.0), Some(ErrorKind::TermNotReady));
}

#[test]
fn test_nested_not_differentiable_reaches_root() {
    let expr = (x().factorial() + n(1.0)).sqrt();
    assert_eq!(d_error(&expr, 2.0), Some(ErrorKind::NotANumber));
}

#[test]
fn test_complex_point() {
    // d/dz z^2 = 2z at z = 1 + i
    let calc = Calc::new().complex_var("z", 1.0, 1.0);
    let d = calc
        .derivative(&Term::var("z").pow(n(2.0)), "z")
        .unwrap();
    assert!(approx_eq(d.get_real(), 2.0));
    assert!(approx_eq(d.get_imaginary(), 2.0));
}
