//! lfv: one-loop lepton-flavor-violating Higgs and Z decays
//!
//! Facade over the workspace crates. The pipeline is
//!
//! ```text
//! topology + vertices -> symbolic form factors -> numeric evaluation
//!                     -> decay rate
//! ```
//!
//! with every numeric step carried out in arbitrary-precision arithmetic
//! at an explicit significant-digit target. See the crate-level docs of
//! `lfv-pave` for the loop-function conventions.

pub use lfv_core::{Complex, Expr, ExprRef, LfvError, LoopKind, Number, Symbol};
pub use lfv_diagrams::{
    Bubble, BubbleKind, ChiralPair, Kinematics, Triangle, TriangleKind, Vertex, VertexRole,
};
pub use lfv_pave::{PaVeCache, PaVeEval};
pub use lfv_processes::{
    assemble_higgs, assemble_z, decay_rate, evaluate, names, AssemblySession, DecayRateResult,
    FormFactors, NumericContext, Process,
};
pub use lfv_seesaw::SeesawSpectrum;

/// Everything a downstream scan script typically needs.
pub mod prelude {
    pub use lfv_core::prelude::*;
    pub use lfv_diagrams::{Kinematics, Triangle, TriangleKind, Vertex};
    pub use lfv_pave::{PaVeCache, PaVeEval};
    pub use lfv_processes::{
        assemble_higgs, assemble_z, decay_rate, evaluate, names, AssemblySession,
        DecayRateResult, FormFactors, NumericContext, Process,
    };
    pub use lfv_seesaw::SeesawSpectrum;
}

/// Assemble, bind and evaluate the Higgs LFV rate for one spectrum. The
/// context must already bind the kinematics and coupling symbols; the
/// spectrum contributes the generation-indexed ones.
pub fn higgs_decay_rate(
    spectrum: &SeesawSpectrum,
    ctx: &mut NumericContext,
) -> Result<DecayRateResult, LfvError> {
    let mut session = AssemblySession::new(spectrum.generations())?;
    let ff = assemble_higgs(&mut session)?;
    spectrum.bind_into(ctx);
    decay_rate(&ff, ctx)
}

/// Z-decay analogue of [`higgs_decay_rate`].
pub fn z_decay_rate(
    spectrum: &SeesawSpectrum,
    ctx: &mut NumericContext,
) -> Result<DecayRateResult, LfvError> {
    let mut session = AssemblySession::new(spectrum.generations())?;
    let ff = assemble_z(&mut session)?;
    spectrum.bind_into(ctx);
    decay_rate(&ff, ctx)
}
