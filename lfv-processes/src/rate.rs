//! Decay rates from evaluated form factors
//!
//! Squares the chiral amplitudes with the phase-space and spin-average
//! factors of each process. The interference cross term between the two
//! chirality components enters the Higgs rate explicitly; dropping it is
//! only safe for massless final leptons.

use std::collections::BTreeMap;

use lfv_core::{Complex, LfvError, Number};
use serde::{Deserialize, Serialize};

use crate::evaluate::{evaluate, NumericContext};
use crate::session::{names, FormFactors, Process};

/// Kallen triangle function `lambda(a, b, c)`.
pub fn kallen(a: &Number, b: &Number, c: &Number) -> Number {
    let sum_sq = a.mul(a).add(&b.mul(b)).add(&c.mul(c));
    let cross = a.mul(b).add(&b.mul(c)).add(&c.mul(a));
    sum_sq.sub(&cross.mul(&Number::int(2)))
}

/// A decay width together with the context that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecayRateResult {
    pub process: Process,
    /// Partial width, in the mass units of the context.
    pub value: Number,
    /// Snapshot of every binding, for provenance.
    pub context: BTreeMap<String, Complex>,
}

impl DecayRateResult {
    /// Branching ratio against an externally supplied total width.
    pub fn branching(&self, total_width: &Number, digits: usize) -> Result<Number, LfvError> {
        if !total_width.is_positive() {
            return Err(LfvError::domain("total width must be positive"));
        }
        self.value.checked_div(total_width, digits)
    }
}

/// `Gamma(h -> l1 l2bar)` from evaluated chiral amplitudes:
/// `lambda^{1/2}(mH^2, m1^2, m2^2) / (16 pi mH^3) *
///  [(mH^2 - m1^2 - m2^2)(|A_L|^2 + |A_R|^2) - 4 m1 m2 Re(A_L A_R^*)]`.
pub fn higgs_width(
    a_left: &Complex,
    a_right: &Complex,
    mh: &Number,
    ml1: &Number,
    ml2: &Number,
    digits: usize,
) -> Result<Number, LfvError> {
    let wd = digits + 10;
    if mh <= &ml1.add(ml2) {
        return Err(LfvError::domain(
            "Higgs mass below the lepton-pair threshold",
        ));
    }
    let mh2 = mh.mul(mh);
    let m12 = ml1.mul(ml1);
    let m22 = ml2.mul(ml2);

    let lam = kallen(&mh2, &m12, &m22);
    if lam.is_negative() {
        return Err(LfvError::domain("phase space closed: negative Kallen lambda"));
    }
    let prefactor = lam.sqrt(wd)?.checked_div(
        &Number::int(16)
            .mul(&Number::pi(wd))
            .mul(&mh2)
            .mul(mh),
        wd,
    )?;

    let chis = a_left.norm_sqr().add(&a_right.norm_sqr());
    let interference = a_left.mul(&a_right.conj()).re;
    let bracket = mh2
        .sub(&m12)
        .sub(&m22)
        .mul(&chis)
        .sub(&Number::int(4).mul(ml1).mul(ml2).mul(&interference));
    Ok(prefactor.mul(&bracket))
}

/// `Gamma(Z -> l1 l2bar)` in the massless-final-lepton limit:
/// `mZ (|A_L|^2 + |A_R|^2) / (24 pi)`.
pub fn z_width(
    a_left: &Complex,
    a_right: &Complex,
    mz: &Number,
    digits: usize,
) -> Result<Number, LfvError> {
    let wd = digits + 10;
    if !mz.is_positive() {
        return Err(LfvError::domain("Z mass must be positive"));
    }
    let chis = a_left.norm_sqr().add(&a_right.norm_sqr());
    mz.mul(&chis)
        .checked_div(&Number::int(24).mul(&Number::pi(wd)), wd)
}

/// Evaluate both components of `ff` under `ctx` and fold them into the
/// process width. The boson and lepton masses are read from the context
/// (`mH` or `mZ`, `ml1`, `ml2`).
pub fn decay_rate(ff: &FormFactors, ctx: &NumericContext) -> Result<DecayRateResult, LfvError> {
    let a_left = evaluate(ff.left(), ctx)?;
    let a_right = evaluate(ff.right(), ctx)?;
    let digits = ctx.digits();
    let value = match ff.process() {
        Process::HiggsLfv => {
            let mh = ctx.get_positive(names::MH)?;
            let ml1 = ctx.get_positive(names::ML1)?;
            let ml2 = ctx.get_positive(names::ML2)?;
            higgs_width(&a_left, &a_right, &mh, &ml1, &ml2, digits)?
        }
        Process::ZLfv => {
            let mz = ctx.get_positive(names::MZ)?;
            z_width(&a_left, &a_right, &mz, digits)?
        }
    };
    Ok(DecayRateResult {
        process: ff.process(),
        value,
        context: ctx.snapshot(),
    })
}
