//! Vertex catalog
//!
//! A vertex is a role tag plus its coupling expressions. Bosonic roles
//! carry a single coupling; fermionic roles carry a chiral pair (left and
//! right projections). Vertices are immutable and purely symbolic; the
//! numeric layer only ever sees the expressions they hand out.

use lfv_core::{ExprRef, LfvError};
use serde::{Deserialize, Serialize};

/// Role tags, named emitter-first: `Ssv` is a scalar coupling to a
/// scalar-vector pair, `Vff` a vector coupling to a fermion pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexRole {
    Sss,
    Svv,
    Ssv,
    Vss,
    Vvv,
    Vsv,
    Sff,
    Vff,
}

impl VertexRole {
    /// Number of coupling expressions the role carries.
    pub fn coupling_arity(&self) -> usize {
        match self {
            VertexRole::Sff | VertexRole::Vff => 2,
            _ => 1,
        }
    }

    pub fn is_fermionic(&self) -> bool {
        matches!(self, VertexRole::Sff | VertexRole::Vff)
    }

    pub fn name(&self) -> &'static str {
        match self {
            VertexRole::Sss => "SSS",
            VertexRole::Svv => "SVV",
            VertexRole::Ssv => "SSV",
            VertexRole::Vss => "VSS",
            VertexRole::Vvv => "VVV",
            VertexRole::Vsv => "VSV",
            VertexRole::Sff => "SFF",
            VertexRole::Vff => "VFF",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Vertex {
    role: VertexRole,
    couplings: Vec<ExprRef>,
}

impl Vertex {
    /// Generic constructor; validates coupling arity against the role.
    pub fn new(role: VertexRole, couplings: Vec<ExprRef>) -> Result<Self, LfvError> {
        if couplings.len() != role.coupling_arity() {
            return Err(LfvError::topology(format!(
                "{} vertex takes {} coupling(s), got {}",
                role.name(),
                role.coupling_arity(),
                couplings.len()
            )));
        }
        Ok(Self { role, couplings })
    }

    pub fn sss(g: ExprRef) -> Self {
        Self { role: VertexRole::Sss, couplings: vec![g] }
    }

    pub fn svv(g: ExprRef) -> Self {
        Self { role: VertexRole::Svv, couplings: vec![g] }
    }

    pub fn ssv(g: ExprRef) -> Self {
        Self { role: VertexRole::Ssv, couplings: vec![g] }
    }

    pub fn vss(g: ExprRef) -> Self {
        Self { role: VertexRole::Vss, couplings: vec![g] }
    }

    pub fn vvv(g: ExprRef) -> Self {
        Self { role: VertexRole::Vvv, couplings: vec![g] }
    }

    pub fn vsv(g: ExprRef) -> Self {
        Self { role: VertexRole::Vsv, couplings: vec![g] }
    }

    pub fn sff(left: ExprRef, right: ExprRef) -> Self {
        Self { role: VertexRole::Sff, couplings: vec![left, right] }
    }

    pub fn vff(left: ExprRef, right: ExprRef) -> Self {
        Self { role: VertexRole::Vff, couplings: vec![left, right] }
    }

    pub fn role(&self) -> VertexRole {
        self.role
    }

    /// The single coupling of a bosonic vertex.
    pub fn coupling(&self) -> Result<&ExprRef, LfvError> {
        if self.role.is_fermionic() {
            return Err(LfvError::topology(format!(
                "{} vertex has chiral couplings, use left()/right()",
                self.role.name()
            )));
        }
        self.couplings.first().ok_or_else(|| {
            LfvError::topology("vertex constructed without couplings")
        })
    }

    pub fn left(&self) -> Result<&ExprRef, LfvError> {
        self.chiral(0)
    }

    pub fn right(&self) -> Result<&ExprRef, LfvError> {
        self.chiral(1)
    }

    fn chiral(&self, idx: usize) -> Result<&ExprRef, LfvError> {
        if !self.role.is_fermionic() {
            return Err(LfvError::topology(format!(
                "{} vertex has a single coupling, use coupling()",
                self.role.name()
            )));
        }
        self.couplings.get(idx).ok_or_else(|| {
            LfvError::topology("vertex constructed without couplings")
        })
    }

    /// Mirror a fermionic vertex: swap its left and right couplings.
    /// Bosonic vertices are unchanged.
    pub fn chirality_flipped(&self) -> Self {
        if self.role.is_fermionic() && self.couplings.len() == 2 {
            Self {
                role: self.role,
                couplings: vec![self.couplings[1].clone(), self.couplings[0].clone()],
            }
        } else {
            self.clone()
        }
    }
}
