//! Assembly session and the symbol vocabulary of the processes
//!
//! A session owns the loop-node cache for one top-level calculation run,
//! so identical loop-function instances are shared across every diagram
//! assembled within it, and carries the number of heavy-neutrino
//! generations the internal sums run over.

use lfv_core::{Expr, ExprRef, LfvError, Symbol};
use lfv_diagrams::Kinematics;
use lfv_pave::PaVeCache;
use serde::{Deserialize, Serialize};

/// Names of the fixed symbols the assemblers emit. Generation-indexed
/// names come from the functions below them.
pub mod names {
    pub const Q2: &str = "q2";
    pub const ML1: &str = "ml1";
    pub const ML2: &str = "ml2";
    pub const MW: &str = "mW";
    pub const MH: &str = "mH";
    pub const MZ: &str = "mZ";
    /// Weak gauge coupling at the lepton-neutrino-W vertex.
    pub const GW: &str = "gw";
    /// Goldstone Yukawa normalization (1/v up to conventions).
    pub const CG: &str = "cG";
    pub const GHWW: &str = "gHWW";
    pub const GHGG: &str = "gHGG";
    pub const GHGW: &str = "gHGW";
    pub const GZWW: &str = "gZWW";
    pub const GZGG: &str = "gZGG";
    pub const GZGW: &str = "gZGW";
    pub const YL1: &str = "yl1";
    pub const YL2: &str = "yl2";
    /// Flavor-diagonal Z-lepton coupling dressing the bubble insertions.
    pub const GZL: &str = "gZl";
    pub const GZNL: &str = "gZNL";
    pub const GZNR: &str = "gZNR";
    /// Renormalization scale; evaluator default is 1 when unbound.
    pub const MU: &str = "mu";
    /// Builtin of the evaluator, never bound by hand.
    pub const PI: &str = "pi";

    pub fn heavy_mass(k: usize) -> String {
        format!("mN{k}")
    }

    /// Mixing-matrix element for lepton `i`, heavy generation `k`.
    pub fn mixing(i: usize, k: usize) -> String {
        format!("U{i}{k}")
    }

    /// Conjugated mixing element; bound separately since the expression
    /// layer has no conjugation operator.
    pub fn mixing_conj(i: usize, k: usize) -> String {
        format!("Uc{i}{k}")
    }

    /// Diagonal Higgs-neutrino Yukawa for generation `k`.
    pub fn neutrino_yukawa(k: usize) -> String {
        format!("yN{k}")
    }
}

pub fn sym(name: &str) -> ExprRef {
    Expr::sym(Symbol::new(name))
}

pub fn mass_sym(name: &str) -> ExprRef {
    Expr::sym(Symbol::mass(name))
}

#[derive(Debug)]
pub struct AssemblySession {
    cache: PaVeCache,
    generations: usize,
}

impl AssemblySession {
    pub fn new(generations: usize) -> Result<Self, LfvError> {
        if generations == 0 {
            return Err(LfvError::domain(
                "assembly needs at least one heavy-neutrino generation",
            ));
        }
        Ok(Self { cache: PaVeCache::new(), generations })
    }

    pub fn generations(&self) -> usize {
        self.generations
    }

    pub fn cache(&self) -> &PaVeCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut PaVeCache {
        &mut self.cache
    }

    /// External kinematics in terms of the session's standard symbols.
    pub fn kinematics(&self) -> Kinematics {
        Kinematics {
            q2: sym(names::Q2),
            ml1: mass_sym(names::ML1),
            ml2: mass_sym(names::ML2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Process {
    HiggsLfv,
    ZLfv,
}

impl Process {
    pub fn name(&self) -> &'static str {
        match self {
            Process::HiggsLfv => "h -> l1 l2",
            Process::ZLfv => "Z -> l1 l2",
        }
    }
}

/// The assembled chiral form factors of one process. Component 1 is the
/// left-chirality projection, component 2 the right, uniformly across
/// processes.
#[derive(Debug, Clone)]
pub struct FormFactors {
    process: Process,
    left: ExprRef,
    right: ExprRef,
}

impl FormFactors {
    pub(crate) fn new(process: Process, left: ExprRef, right: ExprRef) -> Self {
        Self { process, left: left.simplify(), right: right.simplify() }
    }

    pub fn process(&self) -> Process {
        self.process
    }

    pub fn left(&self) -> &ExprRef {
        &self.left
    }

    pub fn right(&self) -> &ExprRef {
        &self.right
    }

    pub fn component(&self, index: u8) -> Result<&ExprRef, LfvError> {
        match index {
            1 => Ok(&self.left),
            2 => Ok(&self.right),
            other => Err(LfvError::domain(format!(
                "form-factor component index must be 1 (left) or 2 (right), got {other}"
            ))),
        }
    }
}
