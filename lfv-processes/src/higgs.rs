//! Form factors for `h -> l1 l2bar`

use lfv_core::LfvError;
use lfv_diagrams::Vertex;

use crate::assemble::{assemble_with, EmissionSet};
use crate::session::{names, sym, AssemblySession, FormFactors, Process};

/// Assemble the left/right form factors of the Higgs LFV decay for the
/// session's heavy-neutrino generations. The neutrino-pair triangles use
/// the diagonal Yukawa symbols `yN{k}`.
pub fn assemble_higgs(session: &mut AssemblySession) -> Result<FormFactors, LfvError> {
    let emission = EmissionSet {
        ww: Vertex::svv(sym(names::GHWW)),
        gg: Vertex::sss(sym(names::GHGG)),
        gv: Vertex::ssv(sym(names::GHGW)),
        nn: Box::new(|k| {
            let y = names::neutrino_yukawa(k);
            Vertex::sff(sym(&y), sym(&y))
        }),
        dress1: sym(names::YL1),
        dress2: sym(names::YL2),
    };
    assemble_with(session, Process::HiggsLfv, emission)
}
