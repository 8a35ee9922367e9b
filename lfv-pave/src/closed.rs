//! Closed forms for loop functions at special kinematic points
//!
//! All functions here take squared masses. The finite parts follow the
//! Feynman parameter normalization
//!   `B0 = -int_0^1 ln(D/mu^2) dx`,  `B1 = int_0^1 x ln(D/mu^2) dx`
//! with `D(x) = x m1^2 + (1-x) m2^2 - x(1-x) q^2`, and the C functions are
//! the corresponding rank-0/1 triangle integrals with massless external
//! legs. Everything below is real; above-threshold kinematics go through
//! the quadrature path instead.

use lfv_core::{LfvError, Number};

/// `x ln(x/mu^2)` extended by continuity to zero at `x = 0`.
fn xlx(x: &Number, mu2: &Number, digits: usize) -> Result<Number, LfvError> {
    if x.is_zero() {
        return Ok(Number::int(0));
    }
    Ok(x.mul(&x.checked_div(mu2, digits)?.ln(digits)?))
}

fn ln_over_mu(x: &Number, mu2: &Number, digits: usize) -> Result<Number, LfvError> {
    x.checked_div(mu2, digits)?.ln(digits)
}

/// Tadpole: `A0(m^2) = m^2 (1 - ln(m^2/mu^2))`, zero for a massless line.
pub fn a0(a: &Number, mu2: &Number, digits: usize) -> Result<Number, LfvError> {
    if a.is_zero() {
        return Ok(Number::int(0));
    }
    Ok(a.mul(&Number::int(1).sub(&ln_over_mu(a, mu2, digits)?)))
}

/// `B0(0; m1^2, m2^2)` for non-degenerate masses. Either mass may vanish,
/// not both.
pub fn b0_zero(a: &Number, b: &Number, mu2: &Number, digits: usize) -> Result<Number, LfvError> {
    let num = xlx(a, mu2, digits)?.sub(&xlx(b, mu2, digits)?);
    Ok(Number::int(1).sub(&num.checked_div(&a.sub(b), digits)?))
}

/// `B0(0; m^2, m^2) = -ln(m^2/mu^2)`.
pub fn b0_zero_equal(a: &Number, mu2: &Number, digits: usize) -> Result<Number, LfvError> {
    Ok(ln_over_mu(a, mu2, digits)?.neg())
}

/// `B1(0; m1^2, m2^2)` for non-degenerate, non-vanishing masses.
pub fn b1_zero(a: &Number, b: &Number, mu2: &Number, digits: usize) -> Result<Number, LfvError> {
    let t = a.sub(b);
    let la = ln_over_mu(a, mu2, digits)?;
    let lb = ln_over_mu(b, mu2, digits)?;
    let two_b = b.add(b);
    let log_part = a
        .mul(&a.sub(&two_b))
        .mul(&la)
        .add(&b.mul(b).mul(&lb))
        .checked_div(&t.mul(&t).add(&t.mul(&t)), digits)?;
    let rational = a
        .sub(&b.mul(&Number::int(3)))
        .checked_div(&t.mul(&Number::int(4)), digits)?;
    Ok(log_part.sub(&rational))
}

/// `B1(0; m^2, m^2) = ln(m^2/mu^2)/2`.
pub fn b1_zero_equal(a: &Number, mu2: &Number, digits: usize) -> Result<Number, LfvError> {
    ln_over_mu(a, mu2, digits)?.checked_div(&Number::int(2), digits)
}

/// `B1(0; 0, m2^2) = ln(m2^2/mu^2)/2 - 3/4`.
pub fn b1_zero_m1_massless(
    b: &Number,
    mu2: &Number,
    digits: usize,
) -> Result<Number, LfvError> {
    let half_log = ln_over_mu(b, mu2, digits)?.checked_div(&Number::int(2), digits)?;
    Ok(half_log.sub(&Number::ratio(3, 4, digits)?))
}

/// `B1(0; m1^2, 0) = ln(m1^2/mu^2)/2 - 1/4`.
pub fn b1_zero_m2_massless(
    a: &Number,
    mu2: &Number,
    digits: usize,
) -> Result<Number, LfvError> {
    let half_log = ln_over_mu(a, mu2, digits)?.checked_div(&Number::int(2), digits)?;
    Ok(half_log.sub(&Number::ratio(1, 4, digits)?))
}

/// `C0(0; a, b, c)` for three distinct squared masses. Totally symmetric;
/// the grouping below assumes `a` differs from both `b` and `c`.
pub fn c0_zero_distinct(
    a: &Number,
    b: &Number,
    c: &Number,
    digits: usize,
) -> Result<Number, LfvError> {
    let f = |y: &Number| -> Result<Number, LfvError> {
        let num = xlx(a, &Number::int(1), digits)?.sub(&xlx(y, &Number::int(1), digits)?);
        num.checked_div(&a.sub(y), digits)
    };
    let diff = f(b)?.sub(&f(c)?);
    Ok(diff.checked_div(&b.sub(c), digits)?.neg())
}

/// `C0(0; x, y, y)` with `x != y`.
pub fn c0_zero_pair(x: &Number, y: &Number, digits: usize) -> Result<Number, LfvError> {
    let t = x.sub(y);
    let num = x.mul(&x.checked_div(y, digits)?.ln(digits)?).sub(&t);
    Ok(num.checked_div(&t.mul(&t), digits)?.neg())
}

/// `C0(0; a, a, a) = -1/(2a)`.
pub fn c0_zero_equal(a: &Number, digits: usize) -> Result<Number, LfvError> {
    Ok(Number::int(1)
        .checked_div(&a.add(a), digits)?
        .neg())
}

/// `C0(s; a, a, a)` for `s <= 4a` (at or below the two-particle threshold):
///   `s = 0`     : `-1/(2a)`
///   `0 < s <= 4a`: `-(2/s) arcsin^2(sqrt(s)/(2m))`
///   `s < 0`     : `(2/s) arcsinh^2(sqrt(-s)/(2m))`
/// Above threshold the function is complex and handled numerically.
pub fn c0_degenerate(s: &Number, a: &Number, digits: usize) -> Result<Number, LfvError> {
    if s.is_zero() {
        return c0_zero_equal(a, digits);
    }
    let two_over_s = Number::int(2).checked_div(s, digits)?;
    if s.is_positive() {
        let four_a = a.mul(&Number::int(4));
        if *s > four_a {
            return Err(LfvError::domain(
                "degenerate C0 closed form only holds at or below threshold",
            ));
        }
        // arcsin(r) with r^2 = s/4a. Near the threshold r -> 1 the
        // direct form cancels in sqrt(1 - r^2); take the complementary
        // angle there, built from the exact difference 4a - s.
        let r2 = s.checked_div(&four_a, digits)?;
        let phi = if r2 > Number::ratio(1, 2, digits)? {
            let d2 = four_a.sub(s).checked_div(&four_a, digits)?;
            let half_pi = Number::pi(digits).checked_div(&Number::int(2), digits)?;
            half_pi.sub(&d2.sqrt(digits)?.asin(digits)?)
        } else {
            r2.sqrt(digits)?.asin(digits)?
        };
        Ok(two_over_s.mul(&phi).mul(&phi).neg())
    } else {
        let two_m = a.sqrt(digits)?.mul(&Number::int(2));
        let r = s.neg().sqrt(digits)?.checked_div(&two_m, digits)?;
        let phi = r.asinh(digits)?;
        Ok(two_over_s.mul(&phi).mul(&phi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const D: usize = 40;

    fn n(s: &str) -> Number {
        Number::parse(s).unwrap()
    }

    fn one() -> Number {
        Number::int(1)
    }

    fn close(a: &Number, b: &Number) {
        assert!(
            a.sub(b).abs() < Number::pow10(-35),
            "expected {} close to {}",
            a,
            b
        );
    }

    #[test]
    fn a0_reference_value() {
        // A0(m=2), i.e. m^2 = 4: 4(1 - ln 4)
        let v = a0(&Number::int(4), &one(), D).unwrap();
        close(&v, &n("-1.54517744447956247533785697166541254460"));
    }

    #[test]
    fn b0_zero_reference_and_symmetry() {
        let a = Number::int(1);
        let b = Number::int(4);
        let v = b0_zero(&a, &b, &one(), D).unwrap();
        close(&v, &n("-0.848392481493187491779285657221804181535"));
        let w = b0_zero(&b, &a, &one(), D).unwrap();
        close(&v, &w);
    }

    #[test]
    fn b0_zero_one_massless() {
        // B0(0; 0, b) = 1 - ln b
        let b = Number::int(4);
        let v = b0_zero(&Number::int(0), &b, &one(), D).unwrap();
        let expected = Number::int(1).sub(&b.ln(D).unwrap());
        close(&v, &expected);
    }

    #[test]
    fn b1_zero_reference_values() {
        let a = Number::int(1);
        let b = Number::int(4);
        close(
            &b1_zero(&a, &b, &one(), D).unwrap(),
            &n("0.315594987662124994519523771481202787690"),
        );
        close(
            &b1_zero(&b, &a, &one(), D).unwrap(),
            &n("0.532797493831062497259761885740601393845"),
        );
    }

    #[test]
    fn b1_sum_rule_with_b0() {
        // B1(0;a,b) + B1(0;b,a) = -B0(0;a,b)
        let a = Number::int(1);
        let b = Number::int(4);
        let sum = b1_zero(&a, &b, &one(), D)
            .unwrap()
            .add(&b1_zero(&b, &a, &one(), D).unwrap());
        close(&sum, &b0_zero(&a, &b, &one(), D).unwrap().neg());
    }

    #[test]
    fn b1_massless_limits_agree_with_general_form() {
        let b = Number::int(4);
        let tiny = Number::pow10(-60);
        let general = b1_zero(&tiny, &b, &one(), 80).unwrap();
        let limit = b1_zero_m1_massless(&b, &one(), D).unwrap();
        // a ln a -> 0 slowly; agreement is only as good as a ln a
        assert!(general.sub(&limit).abs() < Number::pow10(-55));
    }

    #[test]
    fn c0_zero_distinct_reference_and_symmetry() {
        let (a, b, c) = (Number::int(1), Number::int(4), Number::int(9));
        let v = c0_zero_distinct(&a, &b, &c, D).unwrap();
        close(&v, &n("-0.124697033602011862772003225170775730784"));
        close(&v, &c0_zero_distinct(&c, &a, &b, D).unwrap());
        close(&v, &c0_zero_distinct(&b, &c, &a, D).unwrap());
    }

    #[test]
    fn c0_zero_pair_reference() {
        let v = c0_zero_pair(&Number::int(1), &Number::int(4), D).unwrap();
        close(&v, &n("-0.179300626542234375685059528564849651539"));
    }

    #[test]
    fn c0_zero_equal_reference() {
        let v = c0_zero_equal(&Number::int(4), D).unwrap();
        close(&v, &n("-0.125"));
    }

    #[test]
    fn c0_degenerate_below_threshold() {
        let v = c0_degenerate(&n("0.5"), &Number::int(4), D).unwrap();
        close(&v, &n("-0.126324230610922526971441154754057420353"));
    }

    #[test]
    fn c0_degenerate_spacelike() {
        let v = c0_degenerate(&Number::int(-3), &Number::int(4), D).unwrap();
        close(&v, &n("-0.117885583332765309741427215413322220052"));
    }

    #[test]
    fn c0_degenerate_matches_zero_momentum_limit() {
        let a = Number::int(4);
        let s = Number::pow10(-20);
        let at_small_s = c0_degenerate(&s, &a, 60).unwrap();
        let at_zero = c0_zero_equal(&a, D).unwrap();
        assert!(at_small_s.sub(&at_zero).abs() < Number::pow10(-20));
    }

    #[test]
    fn c0_degenerate_at_the_exact_threshold() {
        // s = 4a: phi = pi/2, so C0 = -pi^2/(2s) = -pi^2/16 here
        let v = c0_degenerate(&Number::int(8), &Number::int(2), D).unwrap();
        let pi = Number::pi(D + 5);
        let expected = pi
            .mul(&pi)
            .checked_div(&Number::int(16), D + 5)
            .unwrap()
            .neg();
        close(&v, &expected);
    }

    #[test]
    fn c0_degenerate_holds_digits_near_threshold() {
        // just below s = 4a the result must carry the requested digits,
        // not lose them to the vanishing complement of the arcsine
        let s = n("7.9999999999");
        let a = Number::int(2);
        let at_d = c0_degenerate(&s, &a, D).unwrap();
        let refined = c0_degenerate(&s, &a, D + 20).unwrap();
        assert!(at_d.sub(&refined).abs() < Number::pow10(-(D as isize) + 4));
    }

    #[test]
    fn c0_degenerate_rejects_above_threshold() {
        let err = c0_degenerate(&Number::int(20), &Number::int(1), D);
        assert!(matches!(err, Err(LfvError::Domain(_))));
    }
}
