//! Arbitrary precision real numbers using dashu
//!
//! Wraps dashu-float's `DBig` (decimal significand, native transcendentals).
//! Every precision-sensitive operation takes an explicit `digits` argument:
//! the engine propagates a single working precision outward from the
//! evaluation entry points instead of relying on a process-global default.
//! Addition, subtraction and multiplication are exact; division, roots and
//! transcendentals round to the requested number of significant digits.
//! Constructed values carry no precision limit (dashu's zero precision),
//! so the exact operations never round through an operand's literal width.

use dashu_float::ops::{Abs, SquareRoot};
use dashu_float::DBig;
use dashu_int::ops::BitTest;
use dashu_int::IBig;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::LfvError;

/// Arbitrary precision real number.
///
/// All operations return `Result` or a new `Number` - never panic.
#[derive(Debug, Clone)]
pub struct Number {
    inner: DBig,
}

impl Number {
    // ========== Construction ==========

    // dashu gives constructed values a precision equal to their digit
    // count, and arithmetic rounds to the widest operand precision.
    // Lift that limit so `add`/`sub`/`mul` stay exact.
    fn exact(inner: DBig) -> Self {
        Self { inner: inner.with_precision(0).value() }
    }

    /// Exact integer.
    pub fn int(n: i64) -> Self {
        Self::exact(DBig::from(n))
    }

    /// Exact power of ten: `10^exp`. Useful for tolerances.
    pub fn pow10(exp: isize) -> Self {
        Self::exact(DBig::from_parts(IBig::from(1), exp))
    }

    /// Ratio `num/den` rounded to `digits` significant digits.
    pub fn ratio(num: i64, den: i64, digits: usize) -> Result<Self, LfvError> {
        Self::int(num).checked_div(&Self::int(den), digits)
    }

    /// Parse a decimal literal. Supports `"123"`, `"3.14"`, `"1.5e10"`,
    /// `"-42"` and integer-mantissa scientific notation `"41e-4"`.
    pub fn parse(s: &str) -> Result<Self, LfvError> {
        let s = s.trim();

        // Integer-mantissa scientific notation is not covered by the
        // DBig parser; build it from exact parts.
        if (s.contains('e') || s.contains('E')) && !s.contains('.') {
            let lower = s.to_lowercase();
            let parts: Vec<&str> = lower.split('e').collect();
            if parts.len() == 2 {
                let mantissa: IBig = parts[0]
                    .parse()
                    .map_err(|_| LfvError::Parse(s.to_string()))?;
                let exp: isize = parts[1]
                    .parse()
                    .map_err(|_| LfvError::Parse(s.to_string()))?;
                return Ok(Self::exact(DBig::from_parts(mantissa, exp)));
            }
        }

        let inner: DBig = s.parse().map_err(|_| LfvError::Parse(s.to_string()))?;
        Ok(Self::exact(inner))
    }

    /// Lossy construction from `f64`; intended for tests and display paths.
    pub fn from_f64(f: f64) -> Result<Self, LfvError> {
        if f.is_nan() || f.is_infinite() {
            return Err(LfvError::Parse(format!("non-finite float {f}")));
        }
        Self::parse(&format!("{f:.17e}"))
    }

    /// Round to `digits` significant decimal digits.
    pub fn with_digits(&self, digits: usize) -> Self {
        Self { inner: self.inner.clone().with_precision(digits).value() }
    }

    // ========== Predicates ==========

    pub fn is_zero(&self) -> bool {
        self.inner == DBig::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.inner < DBig::ZERO
    }

    pub fn is_positive(&self) -> bool {
        self.inner > DBig::ZERO
    }

    pub fn is_integer(&self) -> bool {
        self.inner == self.inner.clone().floor()
    }

    // ========== Exact arithmetic ==========

    pub fn add(&self, other: &Self) -> Self {
        Self { inner: &self.inner + &other.inner }
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self { inner: &self.inner - &other.inner }
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self { inner: &self.inner * &other.inner }
    }

    pub fn neg(&self) -> Self {
        Self { inner: -&self.inner }
    }

    pub fn abs(&self) -> Self {
        Self { inner: Abs::abs(self.inner.clone()) }
    }

    /// Integer power by repeated multiplication; negative exponents divide
    /// at the requested precision.
    pub fn pow(&self, exp: i32, digits: usize) -> Result<Self, LfvError> {
        if exp == 0 {
            return Ok(Self::int(1));
        }
        let mut result = Self::int(1);
        for _ in 0..exp.unsigned_abs() {
            result = result.mul(self);
        }
        if exp < 0 {
            Self::int(1).checked_div(&result, digits)
        } else {
            Ok(result)
        }
    }

    // ========== Rounded arithmetic ==========

    /// Division at `digits` significant digits. Never panics.
    pub fn checked_div(&self, other: &Self, digits: usize) -> Result<Self, LfvError> {
        if other.is_zero() {
            return Err(LfvError::DivisionByZero);
        }
        let num = self.with_digits(digits);
        let den = other.with_digits(digits);
        Ok(Self { inner: num.inner / den.inner })
    }

    /// Reciprocal at `digits` significant digits.
    pub fn recip(&self, digits: usize) -> Result<Self, LfvError> {
        Self::int(1).checked_div(self, digits)
    }

    // ========== Transcendental functions ==========

    pub fn sqrt(&self, digits: usize) -> Result<Self, LfvError> {
        if self.is_negative() {
            return Err(LfvError::domain("square root of negative number"));
        }
        if self.is_zero() {
            return Ok(Self::int(0));
        }
        Ok(Self { inner: self.with_digits(digits).inner.sqrt() })
    }

    pub fn ln(&self, digits: usize) -> Result<Self, LfvError> {
        if self.inner <= DBig::ZERO {
            return Err(LfvError::domain("logarithm of non-positive number"));
        }
        Ok(Self { inner: self.with_digits(digits).inner.ln() })
    }

    pub fn exp(&self, digits: usize) -> Self {
        Self { inner: self.with_digits(digits).inner.exp() }
    }

    /// Arctangent by argument reduction plus Taylor series.
    ///
    /// Reduction: `atan(x) = pi/2 - atan(1/x)` for `x > 1`, then repeated
    /// halving `atan(t) = 2 atan(t/(1 + sqrt(1 + t^2)))` until `t < 1/8`.
    pub fn atan(&self, digits: usize) -> Result<Self, LfvError> {
        let wd = digits + 8;
        if self.is_zero() {
            return Ok(Self::int(0));
        }
        if self.is_negative() {
            return Ok(self.abs().atan(digits)?.neg());
        }
        let one = Self::int(1);
        let x = self.with_digits(wd);
        if x > one {
            let half_pi = Self::pi(wd).checked_div(&Self::int(2), wd)?;
            let inv = x.recip(wd)?;
            return Ok(half_pi.sub(&inv.atan(digits)?));
        }

        let eighth = Self::ratio(1, 8, wd)?;
        let mut t = x;
        let mut halvings: u32 = 0;
        while t > eighth && halvings < 64 {
            let root = t.mul(&t).add(&one).sqrt(wd)?;
            t = t.checked_div(&one.add(&root), wd)?;
            halvings += 1;
        }

        // atan(t) = t - t^3/3 + t^5/5 - ...
        let tol = Self::pow10(-(wd as isize));
        let t2 = t.mul(&t).with_digits(wd);
        let mut term = t.clone();
        let mut sum = t;
        let mut k: i64 = 1;
        while term.abs() > tol && k < 10_000 {
            term = term.mul(&t2).neg().with_digits(wd);
            sum = sum.add(&term.checked_div(&Self::int(2 * k + 1), wd)?);
            k += 1;
        }

        for _ in 0..halvings {
            sum = sum.add(&sum.clone());
        }
        Ok(sum.with_digits(wd))
    }

    /// Two-argument arctangent with the usual quadrant conventions.
    pub fn atan2(y: &Self, x: &Self, digits: usize) -> Result<Self, LfvError> {
        let wd = digits + 8;
        if x.is_zero() && y.is_zero() {
            return Ok(Self::int(0));
        }
        if x.is_zero() {
            let half_pi = Self::pi(wd).checked_div(&Self::int(2), wd)?;
            return Ok(if y.is_negative() { half_pi.neg() } else { half_pi });
        }
        let base = y.checked_div(x, wd)?.atan(digits)?;
        if x.is_positive() {
            Ok(base)
        } else if y.is_negative() {
            Ok(base.sub(&Self::pi(wd)))
        } else {
            Ok(base.add(&Self::pi(wd)))
        }
    }

    /// Arcsine for `|x| <= 1` via `asin(x) = atan(x / sqrt(1 - x^2))`.
    pub fn asin(&self, digits: usize) -> Result<Self, LfvError> {
        let wd = digits + 8;
        let one = Self::int(1);
        let x2 = self.mul(self);
        if x2 > one {
            return Err(LfvError::domain("asin argument outside [-1, 1]"));
        }
        if x2 == one {
            let half_pi = Self::pi(wd).checked_div(&Self::int(2), wd)?;
            return Ok(if self.is_negative() { half_pi.neg() } else { half_pi });
        }
        let denom = one.sub(&x2).sqrt(wd)?;
        self.checked_div(&denom, wd)?.atan(digits)
    }

    /// Inverse hyperbolic sine: `asinh(x) = ln(x + sqrt(x^2 + 1))`.
    pub fn asinh(&self, digits: usize) -> Result<Self, LfvError> {
        let wd = digits + 8;
        if self.is_negative() {
            return Ok(self.abs().asinh(digits)?.neg());
        }
        let root = self.mul(self).add(&Self::int(1)).sqrt(wd)?;
        self.add(&root).ln(wd)
    }

    /// Pi truncated to `digits` significant digits (500 available).
    pub fn pi(digits: usize) -> Self {
        const PI_STR: &str = "3.14159265358979323846264338327950288419716939937510582097494459230781640628620899862803482534211706798214808651328230664709384460955058223172535940812848111745028410270193852110555964462294895493038196442881097566593344612847564823378678316527120190914564856692346034861045432664821339360726024914127372458700660631558817488152092096282925409171536436789259036001133053054882046652138414695194151160943305727036575959195309218611738193261179310511854807446237996274956735188575272489122793818301194912";

        let end = (digits + 2).min(PI_STR.len());
        // The constant is a valid literal for every truncation length.
        Self::parse(&PI_STR[..end]).unwrap_or_else(|_| Self::int(3))
    }

    // ========== Conversions & display ==========

    /// Try to convert to i64 (exact integers only).
    pub fn to_i64(&self) -> Option<i64> {
        if !self.is_integer() {
            return None;
        }
        let (significand, exponent) = self.inner.clone().into_repr().into_parts();
        let sig: i64 = significand.try_into().ok()?;
        if exponent == 0 {
            Some(sig)
        } else if exponent > 0 && exponent <= 18 {
            sig.checked_mul(10_i64.checked_pow(exponent as u32)?)
        } else if (-18..0).contains(&exponent) {
            let divisor = 10_i64.checked_pow((-exponent) as u32)?;
            (sig % divisor == 0).then(|| sig / divisor)
        } else {
            None
        }
    }

    /// Convert to f64 (may lose precision).
    pub fn to_f64(&self) -> Option<f64> {
        let (significand, exponent) = self.inner.clone().into_repr().into_parts();
        let sig_f64: f64 = if significand.bit_len() <= 53 {
            let is_neg = significand < IBig::ZERO;
            let abs_sig = if is_neg { -significand.clone() } else { significand.clone() };
            let u: u64 = abs_sig.try_into().ok()?;
            if is_neg {
                -(u as f64)
            } else {
                u as f64
            }
        } else {
            let extra_bits = significand.bit_len() - 53;
            let shifted = &significand >> extra_bits;
            let shifted_i64: i64 = shifted.try_into().ok()?;
            (shifted_i64 as f64) * 2_f64.powi(extra_bits as i32)
        };
        let result = if exponent == 0 {
            sig_f64
        } else if exponent > 0 && exponent <= 308 {
            sig_f64 * 10_f64.powi(exponent as i32)
        } else if exponent < 0 && exponent >= -308 {
            sig_f64 / 10_f64.powi((-exponent) as i32)
        } else {
            return None;
        };
        result.is_finite().then_some(result)
    }

    /// Render with N significant figures (scientific notation outside a
    /// comfortable exponent window).
    pub fn as_sigfigs(&self, sigfigs: u32) -> String {
        let sigfigs = sigfigs.max(1) as usize;
        let raw = match self.to_f64() {
            Some(f) => f,
            None => return format!("{}", self.inner),
        };
        if raw == 0.0 {
            return "0".to_string();
        }
        // The float formatter rounds ties to even; cut the digits on the
        // decimal side first, where dashu rounds ties away from zero. The
        // integer part is always kept in full.
        let raw_exp = raw.abs().log10().floor() as i32;
        let shown = if raw_exp >= 0 {
            sigfigs.max(raw_exp as usize + 1)
        } else {
            sigfigs
        };
        let rounded = self.with_digits(shown);
        match rounded.to_f64() {
            Some(f) if f != 0.0 => {
                let exp = f.abs().log10().floor() as i32;
                if (-3..=4).contains(&exp) {
                    let places = if exp >= 0 {
                        (sigfigs as i32 - exp - 1).max(0) as usize
                    } else {
                        sigfigs + (-exp - 1) as usize
                    };
                    format!("{f:.places$}")
                } else {
                    let mantissa = f / 10_f64.powi(exp);
                    format!("{mantissa:.prec$}e{exp}", prec = sigfigs - 1)
                }
            }
            _ => "0".to_string(),
        }
    }
}

// ========== Trait implementations ==========

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.inner
            .partial_cmp(&other.inner)
            .unwrap_or(std::cmp::Ordering::Equal)
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
