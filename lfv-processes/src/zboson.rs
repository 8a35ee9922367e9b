//! Form factors for `Z -> l1 l2bar`

use lfv_core::LfvError;
use lfv_diagrams::Vertex;

use crate::assemble::{assemble_with, EmissionSet};
use crate::session::{names, sym, AssemblySession, FormFactors, Process};

/// Assemble the left/right form factors of the Z LFV decay. Emission
/// couplings are the vector counterparts of the Higgs set; the
/// neutrino-pair triangles use the chiral `gZNL`/`gZNR` couplings and
/// the leg insertions the flavor-universal `gZl`.
pub fn assemble_z(session: &mut AssemblySession) -> Result<FormFactors, LfvError> {
    let emission = EmissionSet {
        ww: Vertex::vvv(sym(names::GZWW)),
        gg: Vertex::vss(sym(names::GZGG)),
        gv: Vertex::vsv(sym(names::GZGW)),
        nn: Box::new(|_| Vertex::vff(sym(names::GZNL), sym(names::GZNR))),
        dress1: sym(names::GZL),
        dress2: sym(names::GZL),
    };
    assemble_with(session, Process::ZLfv, emission)
}
