//! Numeric evaluation of loop functions
//!
//! [`PaVeEval`] turns a loop-function kind plus numeric arguments (the
//! invariant first, then masses, not squared) into a certified complex
//! value. Closed forms are used at zero momentum and for the degenerate
//! triangle at or below threshold; everything else goes through tanh-sinh
//! quadrature of the Feynman parameter representation, split at the real
//! roots of the propagator polynomial so each piece is smooth inside.
//!
//! The `-i0` prescription is applied pointwise: where the propagator
//! polynomial is negative its logarithm picks up `-i pi`, which is what
//! makes above-threshold results land on the physical sheet.

use lfv_core::{Complex, LfvError, LoopKind, Number};
use tracing::debug;

use crate::closed;
use crate::quad::{integrate_unit, QuadSpec};

#[derive(Debug, Clone)]
pub struct PaVeEval {
    digits: usize,
    mu2: Number,
    max_level: u32,
}

impl PaVeEval {
    /// Evaluator producing `digits` certified digits, renormalization
    /// scale `mu = 1`.
    pub fn new(digits: usize) -> Self {
        Self { digits, mu2: Number::int(1), max_level: 14 }
    }

    /// Set the renormalization scale `mu` (the finite parts of `A0`, `B0`
    /// and `B1` depend on it; the triangles do not).
    pub fn with_scale(mut self, mu: Number) -> Result<Self, LfvError> {
        if !mu.is_positive() {
            return Err(LfvError::domain("renormalization scale must be positive"));
        }
        self.mu2 = mu.mul(&mu);
        Ok(self)
    }

    pub fn digits(&self) -> usize {
        self.digits
    }

    /// Evaluate `kind` at numeric arguments. For `A0` the single argument
    /// is a mass; for the two-point and three-point functions the first
    /// argument is the squared momentum `q^2`, the rest are masses.
    pub fn eval(&self, kind: LoopKind, args: &[Number]) -> Result<Complex, LfvError> {
        if args.len() != kind.arity() {
            return Err(LfvError::domain(format!(
                "{} takes {} arguments, got {}",
                kind.name(),
                kind.arity(),
                args.len()
            )));
        }
        match kind {
            LoopKind::A0 => self.eval_a0(&args[0]),
            LoopKind::B0 | LoopKind::B1 => self.eval_b(kind, &args[0], &args[1], &args[2]),
            LoopKind::C0 | LoopKind::C1 | LoopKind::C2 => {
                self.eval_c(kind, &args[0], &args[1], &args[2], &args[3])
            }
        }
    }

    fn wd(&self) -> usize {
        self.digits + 10
    }

    /// Relative closeness at half the requested precision; the threshold
    /// below which the non-degenerate closed forms lose too many digits
    /// to cancellation.
    fn nearly_equal(&self, x: &Number, y: &Number) -> bool {
        let scale = if x > y { x.clone() } else { y.clone() };
        if scale.is_zero() {
            return true;
        }
        x.sub(y).abs() <= scale.mul(&Number::pow10(-((self.digits / 2) as isize)))
    }

    fn square(m: &Number) -> Result<Number, LfvError> {
        if m.is_negative() {
            return Err(LfvError::domain("masses must be non-negative"));
        }
        Ok(m.mul(m))
    }

    fn eval_a0(&self, m: &Number) -> Result<Complex, LfvError> {
        let a = Self::square(m)?;
        Ok(Complex::real(closed::a0(&a, &self.mu2, self.wd())?))
    }

    fn eval_b(
        &self,
        kind: LoopKind,
        q2: &Number,
        m1: &Number,
        m2: &Number,
    ) -> Result<Complex, LfvError> {
        let wd = self.wd();
        let a = Self::square(m1)?;
        let b = Self::square(m2)?;
        if q2.is_zero() && a.is_zero() && b.is_zero() {
            return Err(LfvError::domain(
                "two-point function at zero momentum needs a massive line",
            ));
        }

        if q2.is_zero() {
            let value = if self.nearly_equal(&a, &b) {
                match kind {
                    LoopKind::B0 => closed::b0_zero_equal(&a, &self.mu2, wd)?,
                    _ => closed::b1_zero_equal(&a, &self.mu2, wd)?,
                }
            } else if a.is_zero() {
                match kind {
                    LoopKind::B0 => closed::b0_zero(&a, &b, &self.mu2, wd)?,
                    _ => closed::b1_zero_m1_massless(&b, &self.mu2, wd)?,
                }
            } else if b.is_zero() {
                match kind {
                    LoopKind::B0 => closed::b0_zero(&a, &b, &self.mu2, wd)?,
                    _ => closed::b1_zero_m2_massless(&a, &self.mu2, wd)?,
                }
            } else {
                match kind {
                    LoopKind::B0 => closed::b0_zero(&a, &b, &self.mu2, wd)?,
                    _ => closed::b1_zero(&a, &b, &self.mu2, wd)?,
                }
            };
            return Ok(Complex::real(value));
        }

        // General momentum: integrate ln(D/mu^2) with
        // D(x) = x a + (1-x) b - x(1-x) q^2.
        let splits = propagator_roots(q2, &a, &b, wd)?;
        debug!(kind = kind.name(), splits = splits.len(), "two-point quadrature");
        let spec = QuadSpec { digits: self.digits, max_level: self.max_level };
        let mu2 = self.mu2.clone();
        let (q2, a, b) = (q2.clone(), a, b);
        let is_b1 = matches!(kind, LoopKind::B1);
        let integrand = move |x: &Number| -> Result<Complex, LfvError> {
            let omx = Number::int(1).sub(x);
            let d = x.mul(&a).add(&omx.mul(&b)).sub(&x.mul(&omx).mul(&q2));
            let log = Complex::real(d.checked_div(&mu2, wd)?).ln(wd)?;
            if is_b1 {
                Ok(log.scale(x))
            } else {
                Ok(log.neg())
            }
        };
        integrate_unit(&integrand, &splits, &spec)
    }

    fn eval_c(
        &self,
        kind: LoopKind,
        q2: &Number,
        m1: &Number,
        m2: &Number,
        m3: &Number,
    ) -> Result<Complex, LfvError> {
        let wd = self.wd();
        let a = Self::square(m1)?;
        let b = Self::square(m2)?;
        let c = Self::square(m3)?;
        if a.is_zero() || b.is_zero() || c.is_zero() {
            return Err(LfvError::domain(
                "three-point functions require strictly positive loop masses",
            ));
        }

        let ab = self.nearly_equal(&a, &b);
        let bc = self.nearly_equal(&b, &c);
        let ac = self.nearly_equal(&a, &c);

        if kind == LoopKind::C0 {
            // Fully degenerate triangle: closed at or below threshold.
            if ab && bc {
                let four_a = a.mul(&Number::int(4));
                if !q2.is_positive() || *q2 <= four_a {
                    return Ok(Complex::real(closed::c0_degenerate(q2, &a, wd)?));
                }
            } else if q2.is_zero() {
                let value = if ab {
                    closed::c0_zero_pair(&c, &a, wd)?
                } else if bc {
                    closed::c0_zero_pair(&a, &b, wd)?
                } else if ac {
                    closed::c0_zero_pair(&b, &a, wd)?
                } else {
                    closed::c0_zero_distinct(&a, &b, &c, wd)?
                };
                return Ok(Complex::real(value));
            }
        }

        // Feynman parameter quadrature. With N(x) the fermion-propagator
        // polynomial, A(x) its q^2-independent piece and
        // B(x) = b - c - x q^2, the rank-0/1 integrands reduce to
        // combinations of (ln N - ln A)/B; a small-B series branch keeps
        // the evaluation stable where the two logs nearly cancel.
        let splits = propagator_roots(q2, &a, &b, wd)?;
        debug!(kind = kind.name(), splits = splits.len(), "three-point quadrature");
        let spec = QuadSpec { digits: self.digits, max_level: self.max_level };
        let quarter = Number::ratio(1, 4, wd)?;
        let tol = Number::pow10(-(wd as isize));
        let (q2, a, b, c) = (q2.clone(), a, b, c);
        let integrand = move |x: &Number| -> Result<Complex, LfvError> {
            let omx = Number::int(1).sub(x);
            let big_a = x.mul(&a).add(&omx.mul(&c));
            let big_b = b.sub(&c).sub(&x.mul(&q2));
            let eta = big_b.mul(&omx).checked_div(&big_a, wd)?;

            if eta.abs() <= quarter {
                // Sum_{j>=0} (-eta)^j / (j + p), p = 1 for the rank-0/1
                // forms and p = 2 for C2.
                let p_off: i64 = if kind == LoopKind::C2 { 2 } else { 1 };
                let neg_eta = eta.neg();
                let mut term = Number::int(1);
                let mut sum = term.checked_div(&Number::int(p_off), wd)?;
                let mut j: i64 = 1;
                loop {
                    term = term.mul(&neg_eta).with_digits(wd);
                    let contrib = term.checked_div(&Number::int(j + p_off), wd)?;
                    sum = sum.add(&contrib);
                    if contrib.abs() < tol || j > 4 * wd as i64 {
                        break;
                    }
                    j += 1;
                }
                let value = match kind {
                    LoopKind::C1 => omx.mul(x).checked_div(&big_a, wd)?.mul(&sum).neg(),
                    LoopKind::C2 => omx.mul(&omx).checked_div(&big_a, wd)?.mul(&sum).neg(),
                    _ => omx.checked_div(&big_a, wd)?.mul(&sum).neg(),
                };
                return Ok(Complex::real(value));
            }

            let big_n = big_a.add(&big_b.mul(&omx));
            let log = Complex::real(big_n)
                .ln(wd)?
                .sub(&Complex::real(big_a.ln(wd)?));
            match kind {
                LoopKind::C1 => {
                    let factor = x.checked_div(&big_b, wd)?.neg();
                    Ok(log.scale(&factor))
                }
                LoopKind::C2 => {
                    let over_b2 = big_a.checked_div(&big_b.mul(&big_b), wd)?;
                    let linear = omx.checked_div(&big_b, wd)?;
                    Ok(log.scale(&over_b2).sub(&Complex::real(linear)))
                }
                _ => {
                    let inv_b = big_b.recip(wd)?;
                    Ok(log.scale(&inv_b).neg())
                }
            }
        };
        integrate_unit(&integrand, &splits, &spec)
    }
}

/// Real roots of `s x^2 + (a - b - s) x + b` strictly inside `(0, 1)`:
/// the Feynman parameters where the propagator polynomial crosses zero.
/// Empty below threshold or for spacelike momenta.
fn propagator_roots(
    s: &Number,
    a: &Number,
    b: &Number,
    wd: usize,
) -> Result<Vec<Number>, LfvError> {
    if !s.is_positive() {
        return Ok(Vec::new());
    }
    let p = a.sub(b).sub(s);
    let disc = p.mul(&p).sub(&Number::int(4).mul(s).mul(b));
    if disc.is_negative() {
        return Ok(Vec::new());
    }
    let sq = disc.sqrt(wd)?;
    // Citardauq pairing avoids cancellation between -p and the root.
    let qf = if p.is_negative() {
        p.sub(&sq).checked_div(&Number::int(-2), wd)?
    } else {
        p.add(&sq).checked_div(&Number::int(-2), wd)?
    };
    let mut roots = Vec::new();
    if !qf.is_zero() {
        roots.push(qf.checked_div(s, wd)?);
        roots.push(b.checked_div(&qf, wd)?);
    }
    let zero = Number::int(0);
    let one = Number::int(1);
    let mut interior: Vec<Number> =
        roots.into_iter().filter(|r| *r > zero && *r < one).collect();
    interior.sort();
    interior.dedup();
    Ok(interior)
}
