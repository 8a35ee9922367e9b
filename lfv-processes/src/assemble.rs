//! Shared diagram enumeration for the two LFV processes
//!
//! Higgs and Z decays run over the same loop content: heavy neutrinos,
//! W bosons and their Goldstone partners (Feynman-'t Hooft gauge, so the
//! Goldstone mass is `mW`). The two processes differ only in the emission
//! vertices and the flavor-diagonal coupling dressing the external-leg
//! insertions, which the callers supply.
//!
//! Every diagram's coupling product carries exactly one factor
//! `U1k * Uc2k`, so a degenerate heavy spectrum with unitary mixing sums
//! the whole amplitude to zero. That cancellation is the combinatorial
//! property the integration tests pin down.

use lfv_core::{Expr, ExprRef, LfvError};
use lfv_diagrams::{Bubble, BubbleKind, ChiralPair, Triangle, TriangleKind, Vertex};
use tracing::debug;

use crate::session::{mass_sym, names, sym, AssemblySession, FormFactors, Process};

pub(crate) struct EmissionSet {
    /// Emission vertex for the W-pair triangle.
    pub ww: Vertex,
    /// Emission vertex for the Goldstone-pair triangle.
    pub gg: Vertex,
    /// Emission vertex for the mixed Goldstone-W triangles.
    pub gv: Vertex,
    /// Per-generation emission vertex for the neutrino-pair triangles.
    pub nn: Box<dyn Fn(usize) -> Vertex>,
    /// Flavor-diagonal coupling dressing the lepton-1-leg insertions.
    pub dress1: ExprRef,
    /// Same for the lepton-2 leg.
    pub dress2: ExprRef,
}

pub(crate) fn assemble_with(
    session: &mut AssemblySession,
    process: Process,
    emission: EmissionSet,
) -> Result<FormFactors, LfvError> {
    let kin = session.kinematics();
    let mw = mass_sym(names::MW);
    let gw = sym(names::GW);
    let cg = sym(names::CG);
    let ml1 = mass_sym(names::ML1);
    let ml2 = mass_sym(names::ML2);

    // Propagator factors of the external-leg self-energy insertions: the
    // internal lepton between the emission vertex and the loop is off
    // shell by the mass splitting of the two flavors.
    let leg2_factor = Expr::div(
        emission.dress2.clone(),
        Expr::sub(Expr::pow(ml1.clone(), 2), Expr::pow(ml2.clone(), 2)),
    );
    let leg1_factor = Expr::div(
        emission.dress1.clone(),
        Expr::sub(Expr::pow(ml2.clone(), 2), Expr::pow(ml1.clone(), 2)),
    );

    let mut total = ChiralPair::zero();

    for k in 1..=session.generations() {
        let mn = mass_sym(&names::heavy_mass(k));
        let u1 = sym(&names::mixing(1, k));
        let uc2 = sym(&names::mixing_conj(2, k));

        // W vertices are purely left-handed; the Goldstone vertices carry
        // the lepton mass on one chirality and the neutrino mass on the
        // other.
        let v1_w = Vertex::vff(Expr::mul(vec![gw.clone(), u1.clone()]), Expr::zero());
        let v2_w = Vertex::vff(Expr::mul(vec![gw.clone(), uc2.clone()]), Expr::zero());
        let v1_g = Vertex::sff(
            Expr::mul(vec![cg.clone(), ml1.clone(), u1.clone()]),
            Expr::mul(vec![cg.clone(), mn.clone(), u1.clone()]),
        );
        let v2_g = Vertex::sff(
            Expr::mul(vec![cg.clone(), mn.clone(), uc2.clone()]),
            Expr::mul(vec![cg.clone(), ml2.clone(), uc2.clone()]),
        );

        let triangles = [
            Triangle::new(
                TriangleKind::Fvv,
                vec![emission.ww.clone(), v1_w.clone(), v2_w.clone()],
                vec![mn.clone(), mw.clone(), mw.clone()],
            )?,
            Triangle::new(
                TriangleKind::Fss,
                vec![emission.gg.clone(), v1_g.clone(), v2_g.clone()],
                vec![mn.clone(), mw.clone(), mw.clone()],
            )?,
            Triangle::new(
                TriangleKind::Fsv,
                vec![emission.gv.clone(), v1_g.clone(), v2_w.clone()],
                vec![mn.clone(), mw.clone(), mw.clone()],
            )?,
            Triangle::new(
                TriangleKind::Fvs,
                vec![emission.gv.clone(), v1_w.clone(), v2_g.clone()],
                vec![mn.clone(), mw.clone(), mw.clone()],
            )?,
            Triangle::new(
                TriangleKind::Sff,
                vec![(emission.nn)(k), v1_g.clone(), v2_g.clone()],
                vec![mw.clone(), mn.clone(), mn.clone()],
            )?,
            Triangle::new(
                TriangleKind::Vff,
                vec![(emission.nn)(k), v1_w.clone(), v2_w.clone()],
                vec![mw.clone(), mn.clone(), mn.clone()],
            )?,
        ];
        for t in &triangles {
            total = total.add(&t.form_factors(session.cache_mut(), &kin)?);
        }

        let bubbles = [
            (
                Bubble::new(
                    BubbleKind::Fs,
                    vec![v1_g.clone(), v2_g.clone()],
                    vec![mn.clone(), mw.clone()],
                )?,
                leg2_factor.clone(),
            ),
            (
                Bubble::new(
                    BubbleKind::Fv,
                    vec![v1_w.clone(), v2_w.clone()],
                    vec![mn.clone(), mw.clone()],
                )?,
                leg2_factor.clone(),
            ),
            (
                Bubble::new(
                    BubbleKind::Sf,
                    vec![v1_g, v2_g],
                    vec![mn.clone(), mw.clone()],
                )?,
                leg1_factor.clone(),
            ),
            (
                Bubble::new(BubbleKind::Vf, vec![v1_w, v2_w], vec![mn.clone(), mw.clone()])?,
                leg1_factor.clone(),
            ),
        ];
        for (b, dress) in &bubbles {
            let pair = b.form_factors(session.cache_mut(), &kin)?;
            total = total.add(&pair.scaled(dress));
        }
    }

    debug!(
        process = process.name(),
        generations = session.generations(),
        loop_nodes = session.cache().len(),
        "assembled form factors"
    );
    Ok(FormFactors::new(process, total.left, total.right))
}
