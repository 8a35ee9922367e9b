//! lfv-seesaw: numeric inputs from seesaw neutrino models
//!
//! The core never diagonalizes mass matrices: a [`SeesawSpectrum`] holds
//! already-diagonal heavy masses, the diagonal Higgs-neutrino Yukawas and
//! the lepton-flavor mixing rows, and knows how to bind them onto the
//! generation-indexed symbols the assemblers emit. Conjugated mixing
//! elements are bound as their own symbols (`Uc{i}{k}`) since the
//! expression layer carries no conjugation operator.

use lfv_core::{Complex, LfvError, Number};
use lfv_processes::{names, NumericContext};
use serde::{Deserialize, Serialize};

/// Heavy-neutrino spectrum for two charged-lepton flavors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeesawSpectrum {
    masses: Vec<Number>,
    yukawas: Vec<Complex>,
    /// `mixing[i][k]`: lepton flavor `i` (0-based), heavy generation `k`.
    mixing: Vec<Vec<Complex>>,
}

impl SeesawSpectrum {
    pub fn new(
        masses: Vec<Number>,
        yukawas: Vec<Complex>,
        mixing: Vec<Vec<Complex>>,
    ) -> Result<Self, LfvError> {
        if masses.is_empty() {
            return Err(LfvError::domain("spectrum needs at least one generation"));
        }
        if masses.iter().any(|m| !m.is_positive()) {
            return Err(LfvError::domain("heavy-neutrino masses must be positive"));
        }
        if yukawas.len() != masses.len() {
            return Err(LfvError::domain(
                "one diagonal Yukawa per heavy generation required",
            ));
        }
        if mixing.len() != 2 || mixing.iter().any(|row| row.len() != masses.len()) {
            return Err(LfvError::domain(
                "mixing must provide one row per lepton flavor, one column per generation",
            ));
        }
        Ok(Self { masses, yukawas, mixing })
    }

    /// Two degenerate generations with an exactly orthogonal rational
    /// mixing, `[[3/5, 4/5], [-4/5, 3/5]]`. The flavor rows are exactly
    /// orthogonal, so the LFV amplitude cancels identically: the
    /// benchmark input for the cancellation tests.
    pub fn degenerate_benchmark(mass: Number, yukawa: Complex) -> Result<Self, LfvError> {
        let digits = 20;
        let p35 = Number::ratio(3, 5, digits)?;
        let p45 = Number::ratio(4, 5, digits)?;
        let mixing = vec![
            vec![Complex::real(p35.clone()), Complex::real(p45.clone())],
            vec![Complex::real(p45.neg()), Complex::real(p35)],
        ];
        Self::new(
            vec![mass.clone(), mass],
            vec![yukawa.clone(), yukawa],
            mixing,
        )
    }

    pub fn generations(&self) -> usize {
        self.masses.len()
    }

    pub fn masses(&self) -> &[Number] {
        &self.masses
    }

    /// Largest deviation of the flavor rows from orthonormality,
    /// `max_{i,j} |sum_k U_ik U_jk^* - delta_ij|`, as an L1 magnitude.
    pub fn unitarity_defect(&self, digits: usize) -> Number {
        let mut worst = Number::int(0);
        for i in 0..2 {
            for j in 0..2 {
                let mut acc = Complex::zero();
                for k in 0..self.generations() {
                    acc = acc.add(&self.mixing[i][k].mul(&self.mixing[j][k].conj()));
                }
                if i == j {
                    acc = acc.sub(&Complex::int(1));
                }
                let defect = acc.abs_l1().with_digits(digits);
                if defect > worst {
                    worst = defect;
                }
            }
        }
        worst
    }

    /// Bind every generation-indexed symbol this spectrum determines:
    /// `mN{k}`, `yN{k}`, `U{i}{k}` and the conjugates `Uc{i}{k}`.
    pub fn bind_into(&self, ctx: &mut NumericContext) {
        for k in 0..self.generations() {
            let gen = k + 1;
            ctx.bind_real(names::heavy_mass(gen), self.masses[k].clone());
            ctx.bind(names::neutrino_yukawa(gen), self.yukawas[k].clone());
            for i in 0..2 {
                let flavor = i + 1;
                ctx.bind(names::mixing(flavor, gen), self.mixing[i][k].clone());
                ctx.bind(
                    names::mixing_conj(flavor, gen),
                    self.mixing[i][k].conj(),
                );
            }
        }
    }
}
