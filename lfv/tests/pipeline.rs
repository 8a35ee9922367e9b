//! End-to-end pipeline tests: symbolic assembly through arbitrary-precision
//! evaluation down to decay widths.

use lfv::{
    assemble_higgs, evaluate, higgs_decay_rate, names, z_decay_rate, AssemblySession, Complex,
    Expr, Kinematics, Number, NumericContext, PaVeCache, SeesawSpectrum, Symbol, Triangle,
    TriangleKind, Vertex,
};

fn tol(digits: usize) -> Number {
    Number::pow10(-(digits as isize) + 4)
}

/// Bind the process-independent part of a Higgs decay context: kinematics
/// below every internal threshold plus order-one couplings. Lepton masses
/// are deliberately unequal so the external-leg propagator factors stay
/// finite.
fn higgs_context(digits: usize) -> NumericContext {
    let mut ctx = NumericContext::new(digits);
    ctx.bind_real(names::MH, Number::int(1));
    ctx.bind_real(names::Q2, Number::int(1));
    ctx.bind_real(names::ML1, Number::ratio(1, 10, digits).unwrap());
    ctx.bind_real(names::ML2, Number::ratio(1, 20, digits).unwrap());
    ctx.bind_real(names::MW, Number::int(2));
    ctx.bind_real(names::GW, Number::ratio(1, 2, digits).unwrap());
    ctx.bind_real(names::CG, Number::ratio(1, 3, digits).unwrap());
    ctx.bind_real(names::GHWW, Number::int(1));
    ctx.bind_real(names::GHGG, Number::int(1));
    ctx.bind_real(names::GHGW, Number::int(1));
    ctx.bind_real(names::YL1, Number::ratio(1, 100, digits).unwrap());
    ctx.bind_real(names::YL2, Number::ratio(1, 200, digits).unwrap());
    ctx
}

fn z_context(digits: usize) -> NumericContext {
    let mut ctx = NumericContext::new(digits);
    ctx.bind_real(names::MZ, Number::int(1));
    ctx.bind_real(names::Q2, Number::int(1));
    ctx.bind_real(names::ML1, Number::ratio(1, 10, digits).unwrap());
    ctx.bind_real(names::ML2, Number::ratio(1, 20, digits).unwrap());
    ctx.bind_real(names::MW, Number::int(2));
    ctx.bind_real(names::GW, Number::ratio(1, 2, digits).unwrap());
    ctx.bind_real(names::CG, Number::ratio(1, 3, digits).unwrap());
    ctx.bind_real(names::GZWW, Number::int(1));
    ctx.bind_real(names::GZGG, Number::int(1));
    ctx.bind_real(names::GZGW, Number::int(1));
    ctx.bind_real(names::GZL, Number::ratio(1, 4, digits).unwrap());
    ctx.bind_real(names::GZNL, Number::ratio(1, 4, digits).unwrap());
    ctx.bind_real(names::GZNR, Number::ratio(1, 8, digits).unwrap());
    ctx
}

/// A spectrum whose flavor rows are not orthogonal, so the amplitude
/// does not cancel.
fn skewed_spectrum() -> SeesawSpectrum {
    let d = 20;
    let y = Complex::real(Number::ratio(1, 2, d).unwrap());
    let mixing = vec![
        vec![
            Complex::real(Number::ratio(1, 2, d).unwrap()),
            Complex::real(Number::ratio(1, 3, d).unwrap()),
        ],
        vec![
            Complex::real(Number::ratio(1, 4, d).unwrap()),
            Complex::real(Number::ratio(1, 5, d).unwrap()),
        ],
    ];
    SeesawSpectrum::new(
        vec![Number::int(3), Number::int(5)],
        vec![y.clone(), y],
        mixing,
    )
    .unwrap()
}

#[test]
fn b0_reference_survives_the_symbolic_layer() {
    let digits = 30;
    let mut cache = PaVeCache::new();
    let node = cache
        .b0(
            Expr::constant(Number::ratio(1, 2, digits + 10).unwrap()),
            Expr::num(1),
            Expr::num(2),
        )
        .unwrap();
    let ctx = NumericContext::new(digits);
    let value = evaluate(&node, &ctx).unwrap();
    let reference = Number::parse("-0.811369544405180332130238556887").unwrap();
    assert!(value.re.sub(&reference).abs() < tol(digits));
    assert!(value.im.is_zero());
}

#[test]
fn degenerate_spectrum_cancels_the_higgs_amplitude() {
    let digits = 15;
    let spectrum = SeesawSpectrum::degenerate_benchmark(
        Number::int(3),
        Complex::real(Number::ratio(1, 2, 20).unwrap()),
    )
    .unwrap();
    assert!(spectrum.unitarity_defect(20) < Number::pow10(-18));

    let mut ctx = higgs_context(digits);
    let mut session = AssemblySession::new(spectrum.generations()).unwrap();
    let ff = assemble_higgs(&mut session).unwrap();
    spectrum.bind_into(&mut ctx);

    // Every diagram carries the factor U_{1k} U^*_{2k}; with degenerate
    // heavy masses the loop functions drop out of the flavor sum, which
    // vanishes for exactly orthogonal rows.
    let a_left = evaluate(ff.left(), &ctx).unwrap();
    let a_right = evaluate(ff.right(), &ctx).unwrap();
    assert!(a_left.abs_l1() < Number::pow10(-(digits as isize)));
    assert!(a_right.abs_l1() < Number::pow10(-(digits as isize)));
}

#[test]
fn degenerate_spectrum_gives_vanishing_widths() {
    let digits = 15;
    let spectrum = SeesawSpectrum::degenerate_benchmark(
        Number::int(3),
        Complex::real(Number::ratio(1, 2, 20).unwrap()),
    )
    .unwrap();

    let mut hctx = higgs_context(digits);
    let higgs = higgs_decay_rate(&spectrum, &mut hctx).unwrap();
    assert!(higgs.value.abs() < Number::pow10(-(digits as isize)));

    let mut zctx = z_context(digits);
    let z = z_decay_rate(&spectrum, &mut zctx).unwrap();
    assert!(z.value.abs() < Number::pow10(-(digits as isize)));
}

#[test]
fn skewed_spectrum_gives_a_positive_z_width() {
    let digits = 15;
    let spectrum = skewed_spectrum();
    let mut ctx = z_context(digits);
    let result = z_decay_rate(&spectrum, &mut ctx).unwrap();
    assert!(result.value.is_positive());
    // The provenance snapshot records the spectrum bindings.
    assert!(result.context.contains_key("mN1"));
    assert!(result.context.contains_key("Uc22"));
}

#[test]
fn amplitudes_agree_across_precision_targets() {
    let spectrum = skewed_spectrum();
    let mut session = AssemblySession::new(spectrum.generations()).unwrap();
    let ff = assemble_higgs(&mut session).unwrap();

    let mut lo = higgs_context(15);
    spectrum.bind_into(&mut lo);
    let coarse = evaluate(ff.left(), &lo).unwrap();

    let mut hi = higgs_context(30);
    spectrum.bind_into(&mut hi);
    let fine = evaluate(ff.left(), &hi).unwrap();

    let scale = fine.abs_l1().add(&Number::int(1));
    let diff = coarse.sub(&fine).abs_l1();
    assert!(diff < Number::pow10(-12).mul(&scale));
}

#[test]
fn evaluation_is_deterministic() {
    let spectrum = skewed_spectrum();
    let mut session = AssemblySession::new(spectrum.generations()).unwrap();
    let ff = assemble_higgs(&mut session).unwrap();
    let mut ctx = higgs_context(15);
    spectrum.bind_into(&mut ctx);

    let first = evaluate(ff.right(), &ctx).unwrap();
    let second = evaluate(ff.right(), &ctx).unwrap();
    assert_eq!(first, second);
}

#[test]
fn mirrored_triangle_evaluates_to_the_swapped_form_factor() {
    let digits = 20;
    let kin = Kinematics {
        q2: Expr::sym(Symbol::new(names::Q2)),
        ml1: Expr::sym(Symbol::mass(names::ML1)),
        ml2: Expr::sym(Symbol::mass(names::ML2)),
    };
    let triangle = Triangle::new(
        TriangleKind::Fvv,
        vec![
            Vertex::svv(Expr::sym(Symbol::new("g"))),
            Vertex::vff(Expr::sym(Symbol::new("L1")), Expr::sym(Symbol::new("R1"))),
            Vertex::vff(Expr::sym(Symbol::new("L2")), Expr::sym(Symbol::new("R2"))),
        ],
        vec![
            Expr::sym(Symbol::mass("mN1")),
            Expr::sym(Symbol::mass(names::MW)),
            Expr::sym(Symbol::mass(names::MW)),
        ],
    )
    .unwrap();

    let mut cache = PaVeCache::new();
    let straight = triangle.form_factors(&mut cache, &kin).unwrap();
    let flipped = triangle.mirrored().form_factors(&mut cache, &kin).unwrap();

    let bind_common = |ctx: &mut NumericContext| {
        ctx.bind_real(names::Q2, Number::int(1));
        ctx.bind_real("mN1", Number::int(3));
        ctx.bind_real(names::MW, Number::int(2));
        ctx.bind_real("g", Number::int(1));
        ctx.bind_real("L1", Number::ratio(1, 2, digits).unwrap());
        ctx.bind_real("R1", Number::ratio(1, 3, digits).unwrap());
        ctx.bind_real("L2", Number::ratio(1, 5, digits).unwrap());
        ctx.bind_real("R2", Number::ratio(1, 7, digits).unwrap());
    };

    let mut ctx = NumericContext::new(digits);
    bind_common(&mut ctx);
    ctx.bind_real(names::ML1, Number::ratio(1, 10, digits).unwrap());
    ctx.bind_real(names::ML2, Number::ratio(1, 20, digits).unwrap());
    let left = evaluate(&straight.left, &ctx).unwrap();

    let mut swapped = NumericContext::new(digits);
    bind_common(&mut swapped);
    swapped.bind_real(names::ML1, Number::ratio(1, 20, digits).unwrap());
    swapped.bind_real(names::ML2, Number::ratio(1, 10, digits).unwrap());
    let right = evaluate(&flipped.right, &swapped).unwrap();

    assert!(left.sub(&right).abs_l1() < tol(digits));
}

#[test]
fn shared_session_reuses_loop_nodes_across_processes() {
    let mut session = AssemblySession::new(2).unwrap();
    let _higgs = assemble_higgs(&mut session).unwrap();
    let after_higgs = session.cache().len();
    let _z = lfv::assemble_z(&mut session).unwrap();
    assert_eq!(session.cache().len(), after_higgs);
}
