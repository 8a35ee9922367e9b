//! Complex arithmetic over [`Number`]
//!
//! Loop functions above threshold develop imaginary parts, so the numeric
//! layer works in complex arithmetic throughout. The logarithm carries the
//! `-i0` prescription of Feynman propagators: a negative real argument is
//! taken just below the cut, `ln(-r - i0) = ln(r) - i pi`.

use serde::{Deserialize, Serialize};

use crate::error::LfvError;
use crate::number::Number;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complex {
    pub re: Number,
    pub im: Number,
}

impl Complex {
    pub fn new(re: Number, im: Number) -> Self {
        Self { re, im }
    }

    pub fn real(re: Number) -> Self {
        Self { re, im: Number::int(0) }
    }

    pub fn int(n: i64) -> Self {
        Self::real(Number::int(n))
    }

    pub fn zero() -> Self {
        Self::int(0)
    }

    pub fn is_zero(&self) -> bool {
        self.re.is_zero() && self.im.is_zero()
    }

    pub fn is_real(&self) -> bool {
        self.im.is_zero()
    }

    pub fn add(&self, other: &Self) -> Self {
        Self::new(self.re.add(&other.re), self.im.add(&other.im))
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self::new(self.re.sub(&other.re), self.im.sub(&other.im))
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self::new(
            self.re.mul(&other.re).sub(&self.im.mul(&other.im)),
            self.re.mul(&other.im).add(&self.im.mul(&other.re)),
        )
    }

    pub fn neg(&self) -> Self {
        Self::new(self.re.neg(), self.im.neg())
    }

    pub fn conj(&self) -> Self {
        Self::new(self.re.clone(), self.im.neg())
    }

    /// Multiply by a real scalar.
    pub fn scale(&self, factor: &Number) -> Self {
        Self::new(self.re.mul(factor), self.im.mul(factor))
    }

    /// `|z|^2`, exact.
    pub fn norm_sqr(&self) -> Number {
        self.re.mul(&self.re).add(&self.im.mul(&self.im))
    }

    /// `|Re z| + |Im z|`; a cheap exact magnitude bound for tolerance checks.
    pub fn abs_l1(&self) -> Number {
        self.re.abs().add(&self.im.abs())
    }

    pub fn checked_div(&self, other: &Self, digits: usize) -> Result<Self, LfvError> {
        let denom = other.norm_sqr();
        if denom.is_zero() {
            return Err(LfvError::DivisionByZero);
        }
        let num = self.mul(&other.conj());
        Ok(Self::new(
            num.re.checked_div(&denom, digits)?,
            num.im.checked_div(&denom, digits)?,
        ))
    }

    pub fn recip(&self, digits: usize) -> Result<Self, LfvError> {
        Self::int(1).checked_div(self, digits)
    }

    pub fn pow(&self, exp: i32, digits: usize) -> Result<Self, LfvError> {
        if exp == 0 {
            return Ok(Self::int(1));
        }
        let mut result = Self::int(1);
        for _ in 0..exp.unsigned_abs() {
            result = result.mul(self);
        }
        if exp < 0 {
            result.recip(digits)
        } else {
            Ok(result)
        }
    }

    /// Argument via two-quadrant arctangent. Real negative arguments return
    /// `-pi`, matching the `-i0` side of the cut.
    pub fn arg(&self, digits: usize) -> Result<Number, LfvError> {
        if self.im.is_zero() && self.re.is_negative() {
            return Ok(Number::pi(digits).neg());
        }
        Number::atan2(&self.im, &self.re, digits)
    }

    /// Principal logarithm on the cut plane, cut approached from below.
    pub fn ln(&self, digits: usize) -> Result<Self, LfvError> {
        if self.is_zero() {
            return Err(LfvError::domain("logarithm of zero"));
        }
        if self.im.is_zero() {
            // Real axis: positive stays real, negative picks up -i pi.
            let mag = self.re.abs().ln(digits)?;
            return if self.re.is_positive() {
                Ok(Self::real(mag))
            } else {
                Ok(Self::new(mag, Number::pi(digits).neg()))
            };
        }
        let half = Number::ratio(1, 2, digits + 8)?;
        let mag = self.norm_sqr().ln(digits)?.mul(&half);
        Ok(Self::new(mag, self.arg(digits)?))
    }

    pub fn sqrt(&self, digits: usize) -> Result<Self, LfvError> {
        if self.im.is_zero() {
            return if self.re.is_negative() {
                let root = self.re.abs().sqrt(digits)?;
                Ok(Self::new(Number::int(0), root.neg()))
            } else {
                Ok(Self::real(self.re.sqrt(digits)?))
            };
        }
        let r = self.norm_sqr().sqrt(digits)?.sqrt(digits)?;
        let half = Number::ratio(1, 2, digits + 8)?;
        let theta = self.arg(digits)?.mul(&half);
        let cos = cos_series(&theta, digits)?;
        let sin = sin_series(&theta, digits)?;
        Ok(Self::new(r.mul(&cos), r.mul(&sin)))
    }
}

fn sin_series(x: &Number, digits: usize) -> Result<Number, LfvError> {
    let wd = digits + 8;
    let tol = Number::pow10(-(wd as isize));
    let x2 = x.mul(x);
    let mut term = x.clone();
    let mut sum = x.clone();
    let mut k: i64 = 1;
    while term.abs() > tol && k < 10_000 {
        let denom = Number::int((2 * k) * (2 * k + 1));
        term = term.mul(&x2).neg().checked_div(&denom, wd)?;
        sum = sum.add(&term);
        k += 1;
    }
    Ok(sum.with_digits(wd))
}

fn cos_series(x: &Number, digits: usize) -> Result<Number, LfvError> {
    let wd = digits + 8;
    let tol = Number::pow10(-(wd as isize));
    let x2 = x.mul(x);
    let mut term = Number::int(1);
    let mut sum = Number::int(1);
    let mut k: i64 = 1;
    while term.abs() > tol && k < 10_000 {
        let denom = Number::int((2 * k - 1) * (2 * k));
        term = term.mul(&x2).neg().checked_div(&denom, wd)?;
        sum = sum.add(&term);
        k += 1;
    }
    Ok(sum.with_digits(wd))
}

impl std::fmt::Display for Complex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.im.is_zero() {
            write!(f, "{}", self.re)
        } else if self.im.is_negative() {
            write!(f, "{} - {}i", self.re, self.im.abs())
        } else {
            write!(f, "{} + {}i", self.re, self.im)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const D: usize = 40;

    fn close(a: &Number, b: &Number, tol_exp: isize) {
        assert!(
            a.sub(b).abs() < Number::pow10(tol_exp),
            "expected {} close to {}",
            a,
            b
        );
    }

    #[test]
    fn mul_i_squared_is_minus_one() {
        let i = Complex::new(Number::int(0), Number::int(1));
        assert_eq!(i.mul(&i), Complex::int(-1));
    }

    #[test]
    fn division_inverts_multiplication() {
        let z = Complex::new(Number::int(3), Number::int(-4));
        let w = Complex::new(Number::int(1), Number::int(2));
        let q = z.mul(&w).checked_div(&w, D).unwrap();
        close(&q.re, &z.re, -(D as isize) + 3);
        close(&q.im, &z.im, -(D as isize) + 3);
    }

    #[test]
    fn ln_of_negative_real_hugs_lower_cut() {
        let z = Complex::real(Number::int(-2));
        let l = z.ln(D).unwrap();
        close(&l.re, &Number::int(2).ln(D).unwrap(), -(D as isize) + 3);
        close(&l.im, &Number::pi(D).neg(), -(D as isize) + 3);
    }

    #[test]
    fn ln_of_positive_real_is_real() {
        let z = Complex::real(Number::int(5));
        let l = z.ln(D).unwrap();
        assert!(l.im.is_zero());
    }

    #[test]
    fn ln_general_argument() {
        // ln(1 + i) = ln(sqrt(2)) + i pi/4
        let z = Complex::new(Number::int(1), Number::int(1));
        let l = z.ln(D).unwrap();
        let half = Number::ratio(1, 2, D).unwrap();
        close(&l.re, &Number::int(2).ln(D).unwrap().mul(&half), -(D as isize) + 3);
        let quarter_pi = Number::pi(D).checked_div(&Number::int(4), D).unwrap();
        close(&l.im, &quarter_pi, -(D as isize) + 3);
    }

    #[test]
    fn norm_sqr_is_exact() {
        let z = Complex::new(Number::int(3), Number::int(4));
        assert_eq!(z.norm_sqr(), Number::int(25));
    }

    #[test]
    fn sqrt_of_negative_real_sits_below_cut() {
        let z = Complex::real(Number::int(-4));
        let r = z.sqrt(D).unwrap();
        assert!(r.re.is_zero());
        close(&r.im, &Number::int(-2), -(D as isize) + 3);
    }
}
