//! Topology catalog
//!
//! Diagram skeletons for one-loop flavor-changing boson decays. Triangles
//! come in two families named by internal line content:
//!
//! - F-family (`Fss`, `Fvv`, `Fsv`, `Fvs`): one internal fermion running
//!   between the two lepton vertices, two internal bosons attached to the
//!   decaying boson. Vertex order is `[emission, lepton-1 side, lepton-2
//!   side]`, mass order `[MF, MA, MB]` (fermion, boson on side 1, boson on
//!   side 2). Loop functions: `C0/C1/C2(q2; MF, MA, MB)`.
//! - B-family (`Sff`, `Vff`): one internal boson, two internal fermions;
//!   the decaying boson attaches to the fermion pair. Mass order
//!   `[MB, MF1, MF2]`, loop functions `C1/C2(q2; MB, MF1, MF2)`.
//!
//! Bubbles are the external-leg self-energy insertions: `Fs`/`Fv` sit on
//! the lepton-2 leg, `Sf`/`Vf` on the lepton-1 leg, with loop content
//! fermion + scalar or fermion + vector. They reduce to `B0`/`B1` at zero
//! momentum; the propagator factor and emission coupling that dress an
//! insertion into an amplitude belong to the process assembler, not here.
//!
//! The chiral structure is fixed so that flipping every fermionic vertex
//! and exchanging the external lepton masses maps the left form factor
//! onto the right one exactly. That mirror relation is the assembly-level
//! consistency check the processes crate tests against.

use lfv_core::{Expr, ExprRef, LfvError, Symbol};
use lfv_pave::PaVeCache;

use crate::vertex::{Vertex, VertexRole};

/// External kinematics a diagram is evaluated at: the decaying boson's
/// squared momentum and the two charged lepton mass symbols.
#[derive(Debug, Clone)]
pub struct Kinematics {
    pub q2: ExprRef,
    pub ml1: ExprRef,
    pub ml2: ExprRef,
}

/// Left/right chirality projections of one diagram's form factor.
#[derive(Debug, Clone, PartialEq)]
pub struct ChiralPair {
    pub left: ExprRef,
    pub right: ExprRef,
}

impl ChiralPair {
    pub fn zero() -> Self {
        Self { left: Expr::zero(), right: Expr::zero() }
    }

    pub fn add(&self, other: &Self) -> Self {
        Self {
            left: Expr::add(vec![self.left.clone(), other.left.clone()]),
            right: Expr::add(vec![self.right.clone(), other.right.clone()]),
        }
    }

    /// Multiply both components by a common factor.
    pub fn scaled(&self, factor: &ExprRef) -> Self {
        Self {
            left: Expr::mul(vec![factor.clone(), self.left.clone()]),
            right: Expr::mul(vec![factor.clone(), self.right.clone()]),
        }
    }
}

/// `1/(16 pi^2)`, the one-loop normalization. `pi` is a builtin of the
/// numeric evaluator.
pub fn loop_factor() -> ExprRef {
    let pi = Expr::sym(Symbol::mass("pi"));
    Expr::div(
        Expr::one(),
        Expr::mul(vec![Expr::num(16), Expr::pow(pi, 2)]),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleKind {
    Fss,
    Fvv,
    Fsv,
    Fvs,
    Sff,
    Vff,
}

impl TriangleKind {
    fn emission_roles(&self) -> &'static [VertexRole] {
        match self {
            TriangleKind::Fss => &[VertexRole::Sss, VertexRole::Vss],
            TriangleKind::Fvv => &[VertexRole::Svv, VertexRole::Vvv],
            TriangleKind::Fsv | TriangleKind::Fvs => &[VertexRole::Ssv, VertexRole::Vsv],
            TriangleKind::Sff | TriangleKind::Vff => &[VertexRole::Sff, VertexRole::Vff],
        }
    }

    fn lepton_roles(&self) -> (VertexRole, VertexRole) {
        match self {
            TriangleKind::Fss | TriangleKind::Sff => (VertexRole::Sff, VertexRole::Sff),
            TriangleKind::Fvv | TriangleKind::Vff => (VertexRole::Vff, VertexRole::Vff),
            TriangleKind::Fsv => (VertexRole::Sff, VertexRole::Vff),
            TriangleKind::Fvs => (VertexRole::Vff, VertexRole::Sff),
        }
    }

    fn is_fermion_pair(&self) -> bool {
        matches!(self, TriangleKind::Sff | TriangleKind::Vff)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TriangleKind::Fss => "FSS",
            TriangleKind::Fvv => "FVV",
            TriangleKind::Fsv => "FSV",
            TriangleKind::Fvs => "FVS",
            TriangleKind::Sff => "SFF",
            TriangleKind::Vff => "VFF",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Triangle {
    kind: TriangleKind,
    vertices: Vec<Vertex>,
    masses: Vec<ExprRef>,
}

impl Triangle {
    pub fn new(
        kind: TriangleKind,
        vertices: Vec<Vertex>,
        masses: Vec<ExprRef>,
    ) -> Result<Self, LfvError> {
        if vertices.len() != 3 || masses.len() != 3 {
            return Err(LfvError::topology(format!(
                "{} triangle takes 3 vertices and 3 internal masses, got {} and {}",
                kind.name(),
                vertices.len(),
                masses.len()
            )));
        }
        let emission = vertices[0].role();
        if !kind.emission_roles().contains(&emission) {
            return Err(LfvError::topology(format!(
                "{} triangle cannot take a {} emission vertex",
                kind.name(),
                emission.name()
            )));
        }
        let (want1, want2) = kind.lepton_roles();
        if vertices[1].role() != want1 || vertices[2].role() != want2 {
            return Err(LfvError::topology(format!(
                "{} triangle needs {}/{} lepton vertices, got {}/{}",
                kind.name(),
                want1.name(),
                want2.name(),
                vertices[1].role().name(),
                vertices[2].role().name()
            )));
        }
        Ok(Self { kind, vertices, masses })
    }

    pub fn kind(&self) -> TriangleKind {
        self.kind
    }

    /// A copy with every fermionic vertex chirality-flipped. Together with
    /// exchanging `ml1` and `ml2` this mirrors the diagram.
    pub fn mirrored(&self) -> Self {
        Self {
            kind: self.kind,
            vertices: self.vertices.iter().map(Vertex::chirality_flipped).collect(),
            masses: self.masses.clone(),
        }
    }

    /// Build the left/right form-factor contribution of this triangle.
    /// Loop nodes are interned through `cache` so identical instances are
    /// shared across diagrams.
    pub fn form_factors(
        &self,
        cache: &mut PaVeCache,
        kin: &Kinematics,
    ) -> Result<ChiralPair, LfvError> {
        if self.kind.is_fermion_pair() {
            self.fermion_pair_form_factors(cache, kin)
        } else {
            self.fermion_line_form_factors(cache, kin)
        }
    }

    /// F-family: internal fermion of mass MF between the lepton vertices.
    /// With (L1,R1), (L2,R2) the chiral couplings and g the emission
    /// coupling:
    ///   left  = kappa g (L1 R2 MF C0 + R1 R2 ml1 C1 + L1 L2 ml2 C2)
    ///   right = kappa g (R1 L2 MF C0 + L1 L2 ml2 C1 + R1 R2 ml1 C2)
    fn fermion_line_form_factors(
        &self,
        cache: &mut PaVeCache,
        kin: &Kinematics,
    ) -> Result<ChiralPair, LfvError> {
        let g = self.vertices[0].coupling()?.clone();
        let (l1, r1) = (self.vertices[1].left()?.clone(), self.vertices[1].right()?.clone());
        let (l2, r2) = (self.vertices[2].left()?.clone(), self.vertices[2].right()?.clone());
        let (mf, ma, mb) = (self.masses[0].clone(), self.masses[1].clone(), self.masses[2].clone());

        let c0 = cache.c0(kin.q2.clone(), mf.clone(), ma.clone(), mb.clone())?;
        let c1 = cache.c1(kin.q2.clone(), mf.clone(), ma.clone(), mb.clone())?;
        let c2 = cache.c2(kin.q2.clone(), mf.clone(), ma.clone(), mb.clone())?;

        let kappa_g = Expr::mul(vec![loop_factor(), g]);
        let ll = Expr::mul(vec![l1.clone(), l2.clone()]);
        let rr = Expr::mul(vec![r1.clone(), r2.clone()]);

        let left = Expr::mul(vec![
            kappa_g.clone(),
            Expr::add(vec![
                Expr::mul(vec![l1.clone(), r2.clone(), mf.clone(), c0.clone()]),
                Expr::mul(vec![rr.clone(), kin.ml1.clone(), c1.clone()]),
                Expr::mul(vec![ll.clone(), kin.ml2.clone(), c2.clone()]),
            ]),
        ]);
        let right = Expr::mul(vec![
            kappa_g,
            Expr::add(vec![
                Expr::mul(vec![r1, l2, mf, c0]),
                Expr::mul(vec![ll, kin.ml2.clone(), c1]),
                Expr::mul(vec![rr, kin.ml1.clone(), c2]),
            ]),
        ]);
        Ok(ChiralPair { left, right })
    }

    /// B-family: fermion pair F1, F2 attached to the decaying boson, one
    /// internal boson MB. With (Le,Re) the emission couplings:
    ///   left  = kappa (Le L1 R2 MF1 C1 + Re L1 R2 MF2 C2)
    ///   right = kappa (Re R1 L2 MF1 C1 + Le R1 L2 MF2 C2)
    fn fermion_pair_form_factors(
        &self,
        cache: &mut PaVeCache,
        kin: &Kinematics,
    ) -> Result<ChiralPair, LfvError> {
        let (le, re) = (self.vertices[0].left()?.clone(), self.vertices[0].right()?.clone());
        let (l1, r1) = (self.vertices[1].left()?.clone(), self.vertices[1].right()?.clone());
        let (l2, r2) = (self.vertices[2].left()?.clone(), self.vertices[2].right()?.clone());
        let (mb, mf1, mf2) =
            (self.masses[0].clone(), self.masses[1].clone(), self.masses[2].clone());

        let c1 = cache.c1(kin.q2.clone(), mb.clone(), mf1.clone(), mf2.clone())?;
        let c2 = cache.c2(kin.q2.clone(), mb, mf1.clone(), mf2.clone())?;

        let kappa = loop_factor();
        let left = Expr::mul(vec![
            kappa.clone(),
            Expr::add(vec![
                Expr::mul(vec![le.clone(), l1.clone(), r2.clone(), mf1.clone(), c1.clone()]),
                Expr::mul(vec![re.clone(), l1, r2, mf2.clone(), c2.clone()]),
            ]),
        ]);
        let right = Expr::mul(vec![
            kappa,
            Expr::add(vec![
                Expr::mul(vec![re, r1.clone(), l2.clone(), mf1, c1]),
                Expr::mul(vec![le, r1, l2, mf2, c2]),
            ]),
        ]);
        Ok(ChiralPair { left, right })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleKind {
    /// Fermion-scalar loop on the lepton-2 leg.
    Fs,
    /// Fermion-scalar loop on the lepton-1 leg.
    Sf,
    /// Fermion-vector loop on the lepton-2 leg.
    Fv,
    /// Fermion-vector loop on the lepton-1 leg.
    Vf,
}

impl BubbleKind {
    fn lepton_role(&self) -> VertexRole {
        match self {
            BubbleKind::Fs | BubbleKind::Sf => VertexRole::Sff,
            BubbleKind::Fv | BubbleKind::Vf => VertexRole::Vff,
        }
    }

    /// Whether the self-energy sits on the lepton-1 leg.
    pub fn on_first_leg(&self) -> bool {
        matches!(self, BubbleKind::Sf | BubbleKind::Vf)
    }

    pub fn name(&self) -> &'static str {
        match self {
            BubbleKind::Fs => "FS",
            BubbleKind::Sf => "SF",
            BubbleKind::Fv => "FV",
            BubbleKind::Vf => "VF",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Bubble {
    kind: BubbleKind,
    vertices: Vec<Vertex>,
    masses: Vec<ExprRef>,
}

impl Bubble {
    /// Vertex order `[lepton-1 side, lepton-2 side]`, mass order
    /// `[MF, MB]` (fermion, boson in the loop).
    pub fn new(
        kind: BubbleKind,
        vertices: Vec<Vertex>,
        masses: Vec<ExprRef>,
    ) -> Result<Self, LfvError> {
        if vertices.len() != 2 || masses.len() != 2 {
            return Err(LfvError::topology(format!(
                "{} bubble takes 2 vertices and 2 internal masses, got {} and {}",
                kind.name(),
                vertices.len(),
                masses.len()
            )));
        }
        let want = kind.lepton_role();
        for v in &vertices {
            if v.role() != want {
                return Err(LfvError::topology(format!(
                    "{} bubble needs {} vertices, got {}",
                    kind.name(),
                    want.name(),
                    v.role().name()
                )));
            }
        }
        Ok(Self { kind, vertices, masses })
    }

    pub fn kind(&self) -> BubbleKind {
        self.kind
    }

    pub fn mirrored(&self) -> Self {
        Self {
            kind: self.kind,
            vertices: self.vertices.iter().map(Vertex::chirality_flipped).collect(),
            masses: self.masses.clone(),
        }
    }

    /// Chiral pieces of the self-energy insertion, `B0/B1(0; MF, MB)`.
    /// The emission coupling and the `1/(ml1^2 - ml2^2)` propagator factor
    /// are applied by the assembler.
    pub fn form_factors(
        &self,
        cache: &mut PaVeCache,
        kin: &Kinematics,
    ) -> Result<ChiralPair, LfvError> {
        let (l1, r1) = (self.vertices[0].left()?.clone(), self.vertices[0].right()?.clone());
        let (l2, r2) = (self.vertices[1].left()?.clone(), self.vertices[1].right()?.clone());
        let (mf, mb) = (self.masses[0].clone(), self.masses[1].clone());

        let zero = Expr::zero();
        let b0 = cache.b0(zero.clone(), mf.clone(), mb.clone())?;
        let b1 = cache.b1(zero, mf.clone(), mb)?;

        let kappa = loop_factor();
        let mass_left = Expr::mul(vec![l1.clone(), r2.clone(), mf.clone(), b0.clone()]);
        let mass_right = Expr::mul(vec![r1.clone(), l2.clone(), mf, b0]);
        let kinetic_rr = Expr::mul(vec![r1, r2, kin.ml1.clone(), b1.clone()]);
        let kinetic_ll = Expr::mul(vec![l1, l2, kin.ml2.clone(), b1]);

        // On the lepton-2 leg the kinetic term rides the right-handed pair
        // in the left form factor; on the lepton-1 leg the roles mirror.
        let (left, right) = if self.kind.on_first_leg() {
            (
                Expr::mul(vec![kappa.clone(), Expr::add(vec![mass_left, kinetic_ll])]),
                Expr::mul(vec![kappa, Expr::add(vec![mass_right, kinetic_rr])]),
            )
        } else {
            (
                Expr::mul(vec![kappa.clone(), Expr::add(vec![mass_left, kinetic_rr])]),
                Expr::mul(vec![kappa, Expr::add(vec![mass_right, kinetic_ll])]),
            )
        };
        Ok(ChiralPair { left, right })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str) -> ExprRef {
        Expr::sym(Symbol::new(name))
    }

    fn mass(name: &str) -> ExprRef {
        Expr::sym(Symbol::mass(name))
    }

    fn kin() -> Kinematics {
        Kinematics { q2: sym("q2"), ml1: mass("ml1"), ml2: mass("ml2") }
    }

    fn kin_swapped() -> Kinematics {
        Kinematics { q2: sym("q2"), ml1: mass("ml2"), ml2: mass("ml1") }
    }

    fn fvv_triangle() -> Triangle {
        Triangle::new(
            TriangleKind::Fvv,
            vec![
                Vertex::svv(sym("gHWW")),
                Vertex::vff(sym("gL1"), sym("gR1")),
                Vertex::vff(sym("gL2"), sym("gR2")),
            ],
            vec![mass("mN"), mass("mW"), mass("mW")],
        )
        .unwrap()
    }

    #[test]
    fn triangle_requires_three_vertices() {
        let err = Triangle::new(
            TriangleKind::Fvv,
            vec![Vertex::svv(sym("g"))],
            vec![mass("mN"), mass("mW"), mass("mW")],
        );
        assert!(matches!(err, Err(LfvError::TopologyMismatch(_))));
    }

    #[test]
    fn triangle_rejects_incompatible_roles() {
        // FSS wants SFF lepton vertices, not VFF
        let err = Triangle::new(
            TriangleKind::Fss,
            vec![
                Vertex::sss(sym("g")),
                Vertex::vff(sym("a"), sym("b")),
                Vertex::vff(sym("c"), sym("d")),
            ],
            vec![mass("mN"), mass("mW"), mass("mW")],
        );
        assert!(err.is_err());
    }

    #[test]
    fn triangle_emission_role_must_match_family() {
        let err = Triangle::new(
            TriangleKind::Fvv,
            vec![
                Vertex::sss(sym("g")),
                Vertex::vff(sym("a"), sym("b")),
                Vertex::vff(sym("c"), sym("d")),
            ],
            vec![mass("mN"), mass("mW"), mass("mW")],
        );
        assert!(err.is_err());
    }

    #[test]
    fn loop_nodes_are_shared_between_triangles() {
        let mut cache = PaVeCache::new();
        let t = fvv_triangle();
        t.form_factors(&mut cache, &kin()).unwrap();
        let before = cache.len();
        t.form_factors(&mut cache, &kin()).unwrap();
        assert_eq!(cache.len(), before);
    }

    #[test]
    fn mirror_exchanges_left_and_right() {
        let mut cache = PaVeCache::new();
        let t = fvv_triangle();
        let straight = t.form_factors(&mut cache, &kin()).unwrap();
        let mirrored = t.mirrored().form_factors(&mut cache, &kin_swapped()).unwrap();
        assert_eq!(mirrored.left, straight.right);
        assert_eq!(mirrored.right, straight.left);
    }

    #[test]
    fn fermion_pair_triangle_mirror_relation() {
        let mut cache = PaVeCache::new();
        let t = Triangle::new(
            TriangleKind::Sff,
            vec![
                Vertex::sff(sym("yL"), sym("yR")),
                Vertex::sff(sym("a1"), sym("b1")),
                Vertex::sff(sym("a2"), sym("b2")),
            ],
            vec![mass("mW"), mass("mN"), mass("mN")],
        )
        .unwrap();
        let straight = t.form_factors(&mut cache, &kin()).unwrap();
        let mirrored = t.mirrored().form_factors(&mut cache, &kin_swapped()).unwrap();
        assert_eq!(mirrored.left, straight.right);
    }

    #[test]
    fn bubble_arity_and_roles() {
        assert!(Bubble::new(
            BubbleKind::Fs,
            vec![Vertex::sff(sym("a"), sym("b"))],
            vec![mass("mN"), mass("mW")],
        )
        .is_err());
        assert!(Bubble::new(
            BubbleKind::Fs,
            vec![
                Vertex::vff(sym("a"), sym("b")),
                Vertex::vff(sym("c"), sym("d")),
            ],
            vec![mass("mN"), mass("mW")],
        )
        .is_err());
    }

    #[test]
    fn bubbles_on_opposite_legs_mirror_each_other() {
        let mut cache = PaVeCache::new();
        let verts = vec![
            Vertex::sff(sym("a1"), sym("b1")),
            Vertex::sff(sym("a2"), sym("b2")),
        ];
        let leg2 = Bubble::new(BubbleKind::Fs, verts.clone(), vec![mass("mN"), mass("mW")])
            .unwrap();
        let straight = leg2.form_factors(&mut cache, &kin()).unwrap();
        let mirrored = leg2.mirrored().form_factors(&mut cache, &kin_swapped()).unwrap();
        assert_eq!(mirrored.left, straight.right);
        assert_eq!(mirrored.right, straight.left);
    }

    #[test]
    fn bubble_uses_zero_momentum_two_point_functions() {
        let mut cache = PaVeCache::new();
        let bubble = Bubble::new(
            BubbleKind::Fv,
            vec![
                Vertex::vff(sym("a1"), sym("b1")),
                Vertex::vff(sym("a2"), sym("b2")),
            ],
            vec![mass("mN"), mass("mW")],
        )
        .unwrap();
        let pair = bubble.form_factors(&mut cache, &kin()).unwrap();
        assert!(pair.left.to_string().contains("B0(0, mN, mW)"));
        assert!(pair.left.to_string().contains("B1(0, mN, mW)"));
    }
}
