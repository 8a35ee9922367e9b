//! Tanh-sinh quadrature over the unit interval
//!
//! Double-exponential quadrature after Takahasi and Mori: the substitution
//! `x = tanh((pi/2) sinh t)` pushes endpoint singularities infinitely far
//! away, so integrable log singularities at interval ends cost nothing.
//! Loop integrands are smooth away from propagator thresholds; the caller
//! splits the interval at the real roots of the propagator polynomial and
//! each piece then has singularities only at its endpoints.
//!
//! Levels halve the step `h`; level `m` reuses every node of level `m - 1`
//! and adds the odd multiples of the new step. Convergence is declared when
//! two successive levels agree to the requested tolerance.

use lfv_core::{Complex, LfvError, Number};
use tracing::{debug, trace};

/// Precision contract for one integration.
#[derive(Debug, Clone)]
pub struct QuadSpec {
    /// Significant digits the result must carry.
    pub digits: usize,
    /// Halvings of the step before giving up.
    pub max_level: u32,
}

impl QuadSpec {
    pub fn new(digits: usize) -> Self {
        Self { digits, max_level: 14 }
    }

    fn working_digits(&self) -> usize {
        self.digits + 10
    }
}

/// Integrate `f` over `(0, 1)`, splitting at the interior points in
/// `splits` first. Split points outside the open interval are ignored.
pub fn integrate_unit<F>(f: &F, splits: &[Number], spec: &QuadSpec) -> Result<Complex, LfvError>
where
    F: Fn(&Number) -> Result<Complex, LfvError>,
{
    let zero = Number::int(0);
    let one = Number::int(1);

    let mut cuts: Vec<Number> = splits
        .iter()
        .filter(|p| **p > zero && **p < one)
        .cloned()
        .collect();
    cuts.sort();
    cuts.dedup();

    let mut bounds = Vec::with_capacity(cuts.len() + 2);
    bounds.push(zero);
    bounds.extend(cuts);
    bounds.push(one);

    let mut total = Complex::zero();
    for pair in bounds.windows(2) {
        total = total.add(&integrate_interval(f, &pair[0], &pair[1], spec)?);
    }
    Ok(total)
}

/// Tanh-sinh over one smooth-interior interval `(a, b)`.
fn integrate_interval<F>(
    f: &F,
    a: &Number,
    b: &Number,
    spec: &QuadSpec,
) -> Result<Complex, LfvError>
where
    F: Fn(&Number) -> Result<Complex, LfvError>,
{
    let wd = spec.working_digits();
    // Node positions need more headroom than the result: the endpoint
    // distance q decays doubly exponentially and must stay resolvable.
    let wx = wd + 10;

    let tol = Number::pow10(-((spec.digits + 5) as isize));
    let weight_floor = Number::pow10(-((spec.digits + 15) as isize));

    let ba = b.sub(a);
    let half = Number::ratio(1, 2, wx)?;
    let half_pi = Number::pi(wx).mul(&half);
    let base_weight = ba.mul(&half).mul(&half_pi);

    // Center node, t = 0: x = (a+b)/2, unit transform weight.
    let center = a.add(b).mul(&half);
    let mut node_sum = f(&center)?.scale(&base_weight);

    let mut previous: Option<Complex> = None;
    let mut h = Number::int(1);

    for level in 0..=spec.max_level {
        if level > 0 {
            h = h.mul(&half);
        }
        // Level 0 walks every positive integer; later levels only the odd
        // multiples of the freshly halved step.
        let (start, stride) = if level == 0 { (1u64, 1u64) } else { (1, 2) };

        let mut k = start;
        loop {
            let t = h.mul(&Number::int(k as i64));
            let et = t.exp(wx);
            let emt = et.recip(wx)?;
            let sinh_t = et.sub(&emt).mul(&half);
            let cosh_t = et.add(&emt).mul(&half);
            let s = half_pi.mul(&sinh_t);

            // q = (1 - tanh s)/2 = 1/(1 + e^{2s}): the exact-addition
            // distance of the node pair from the interval ends.
            let e2s = s.add(&s).exp(wx);
            let q = Number::int(1).checked_div(&Number::int(1).add(&e2s), wx)?;
            // 1/cosh^2 s = 4 e^{2s} q^2
            let sech2 = Number::int(4).mul(&e2s).mul(&q).mul(&q);
            let weight = base_weight.mul(&cosh_t).mul(&sech2);

            if weight < weight_floor || q.is_zero() {
                break;
            }

            let offset = ba.mul(&q);
            let x_lo = a.add(&offset);
            let x_hi = b.sub(&offset);
            let pair = f(&x_lo)?.add(&f(&x_hi)?);
            node_sum = node_sum.add(&pair.scale(&weight));

            k += stride;
            if k > 4_000_000 {
                return Err(LfvError::precision(
                    "tanh-sinh node budget exhausted within one level",
                ));
            }
        }

        let estimate = Complex::new(
            node_sum.re.mul(&h).with_digits(wd),
            node_sum.im.mul(&h).with_digits(wd),
        );

        if let Some(prev) = &previous {
            let diff = estimate.sub(prev).abs_l1();
            let scale = estimate.abs_l1().add(&Number::int(1));
            trace!(level, "tanh-sinh level complete");
            if level >= 3 && diff <= tol.mul(&scale) {
                debug!(level, digits = spec.digits, "tanh-sinh converged");
                return Ok(estimate);
            }
        }
        previous = Some(estimate);
    }

    Err(LfvError::precision(format!(
        "tanh-sinh did not reach {} digits in {} levels",
        spec.digits, spec.max_level
    )))
}
