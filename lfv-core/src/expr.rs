//! Symbolic expression tree for loop form factors
//!
//! Form factors are assembled symbolically, as sums of products of coupling
//! symbols and loop-function nodes, and only evaluated numerically at the
//! end. Sharing matters: the same loop node appears in many diagrams, so
//! expressions are reference counted (`ExprRef = Arc<Expr>`) and evaluation
//! caches by node identity.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::LfvError;
use crate::number::Number;
use crate::symbol::Symbol;

pub type ExprRef = Arc<Expr>;

/// The one-loop scalar functions the engine knows about.
///
/// Argument order: invariant first, then masses.
/// `A0(m)`, `B0(q2, m1, m2)`, `B1(q2, m1, m2)`,
/// `C0(q2, m1, m2, m3)`, `C1(q2, m1, m2, m3)`, `C2(q2, m1, m2, m3)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LoopKind {
    A0,
    B0,
    B1,
    C0,
    C1,
    C2,
}

impl LoopKind {
    pub fn arity(&self) -> usize {
        match self {
            LoopKind::A0 => 1,
            LoopKind::B0 | LoopKind::B1 => 3,
            LoopKind::C0 | LoopKind::C1 | LoopKind::C2 => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LoopKind::A0 => "A0",
            LoopKind::B0 => "B0",
            LoopKind::B1 => "B1",
            LoopKind::C0 => "C0",
            LoopKind::C1 => "C1",
            LoopKind::C2 => "C2",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Const(Number),
    Sym(Symbol),
    Add(Vec<ExprRef>),
    Mul(Vec<ExprRef>),
    Div(ExprRef, ExprRef),
    Neg(ExprRef),
    Pow(ExprRef, i32),
    Loop(LoopKind, Vec<ExprRef>),
}

impl Expr {
    // ========== Leaf constructors ==========

    pub fn num(n: i64) -> ExprRef {
        Arc::new(Expr::Const(Number::int(n)))
    }

    pub fn constant(n: Number) -> ExprRef {
        Arc::new(Expr::Const(n))
    }

    pub fn sym(s: Symbol) -> ExprRef {
        Arc::new(Expr::Sym(s))
    }

    pub fn zero() -> ExprRef {
        Self::num(0)
    }

    pub fn one() -> ExprRef {
        Self::num(1)
    }

    // ========== Combining constructors ==========

    /// Sum with flattening of nested sums and exact folding of constants.
    pub fn add(terms: Vec<ExprRef>) -> ExprRef {
        let mut flat: Vec<ExprRef> = Vec::with_capacity(terms.len());
        let mut acc = Number::int(0);
        for t in terms {
            match &*t {
                Expr::Add(inner) => {
                    for u in inner {
                        match &**u {
                            Expr::Const(c) => acc = acc.add(c),
                            _ => flat.push(u.clone()),
                        }
                    }
                }
                Expr::Const(c) => acc = acc.add(c),
                _ => flat.push(t),
            }
        }
        if !acc.is_zero() {
            flat.push(Self::constant(acc));
        }
        match flat.len() {
            0 => Self::zero(),
            1 => flat.into_iter().next().unwrap_or_else(Self::zero),
            _ => Arc::new(Expr::Add(flat)),
        }
    }

    /// Product with flattening, constant folding, and zero annihilation.
    pub fn mul(factors: Vec<ExprRef>) -> ExprRef {
        let mut flat: Vec<ExprRef> = Vec::with_capacity(factors.len());
        let mut acc = Number::int(1);
        for f in factors {
            match &*f {
                Expr::Mul(inner) => {
                    for u in inner {
                        match &**u {
                            Expr::Const(c) => acc = acc.mul(c),
                            _ => flat.push(u.clone()),
                        }
                    }
                }
                Expr::Const(c) => acc = acc.mul(c),
                _ => flat.push(f),
            }
        }
        if acc.is_zero() {
            return Self::zero();
        }
        if acc != Number::int(1) {
            flat.insert(0, Self::constant(acc));
        }
        match flat.len() {
            0 => Self::one(),
            1 => flat.into_iter().next().unwrap_or_else(Self::one),
            _ => Arc::new(Expr::Mul(flat)),
        }
    }

    pub fn sub(a: ExprRef, b: ExprRef) -> ExprRef {
        Self::add(vec![a, Self::neg(b)])
    }

    pub fn neg(e: ExprRef) -> ExprRef {
        match &*e {
            Expr::Const(c) => Self::constant(c.neg()),
            Expr::Neg(inner) => inner.clone(),
            _ => Arc::new(Expr::Neg(e)),
        }
    }

    pub fn div(num: ExprRef, den: ExprRef) -> ExprRef {
        if let Expr::Const(c) = &*num {
            if c.is_zero() {
                return Self::zero();
            }
        }
        if let Expr::Const(c) = &*den {
            if *c == Number::int(1) {
                return num;
            }
        }
        Arc::new(Expr::Div(num, den))
    }

    pub fn pow(base: ExprRef, exp: i32) -> ExprRef {
        match exp {
            0 => Self::one(),
            1 => base,
            _ => Arc::new(Expr::Pow(base, exp)),
        }
    }

    pub fn loop_fn(kind: LoopKind, args: Vec<ExprRef>) -> Result<ExprRef, LfvError> {
        if args.len() != kind.arity() {
            return Err(LfvError::domain(format!(
                "{} takes {} arguments, got {}",
                kind.name(),
                kind.arity(),
                args.len()
            )));
        }
        Ok(Arc::new(Expr::Loop(kind, args)))
    }

    // ========== Structural queries ==========

    /// All symbols reachable from this expression, sorted by name.
    pub fn free_symbols(self: &ExprRef) -> BTreeSet<Symbol> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(self: &ExprRef, out: &mut BTreeSet<Symbol>) {
        match &**self {
            Expr::Const(_) => {}
            Expr::Sym(s) => {
                out.insert(s.clone());
            }
            Expr::Add(v) | Expr::Mul(v) | Expr::Loop(_, v) => {
                for e in v {
                    e.collect_symbols(out);
                }
            }
            Expr::Div(a, b) => {
                a.collect_symbols(out);
                b.collect_symbols(out);
            }
            Expr::Neg(e) | Expr::Pow(e, _) => e.collect_symbols(out),
        }
    }

    /// Replace every occurrence of `target` with `replacement`, rebuilding
    /// through the folding constructors so substituted constants simplify.
    pub fn subs(self: &ExprRef, target: &Symbol, replacement: &ExprRef) -> ExprRef {
        match &**self {
            Expr::Const(_) => self.clone(),
            Expr::Sym(s) => {
                if s == target {
                    replacement.clone()
                } else {
                    self.clone()
                }
            }
            Expr::Add(v) => Expr::add(v.iter().map(|e| e.subs(target, replacement)).collect()),
            Expr::Mul(v) => Expr::mul(v.iter().map(|e| e.subs(target, replacement)).collect()),
            Expr::Div(a, b) => {
                Expr::div(a.subs(target, replacement), b.subs(target, replacement))
            }
            Expr::Neg(e) => Expr::neg(e.subs(target, replacement)),
            Expr::Pow(e, n) => Expr::pow(e.subs(target, replacement), *n),
            Expr::Loop(kind, v) => Arc::new(Expr::Loop(
                *kind,
                v.iter().map(|e| e.subs(target, replacement)).collect(),
            )),
        }
    }

    /// One bottom-up pass through the folding constructors. Collapses
    /// constant subtrees and drops structural zeros introduced by
    /// substitution or by cancelling coupling patterns.
    pub fn simplify(self: &ExprRef) -> ExprRef {
        match &**self {
            Expr::Const(_) | Expr::Sym(_) => self.clone(),
            Expr::Add(v) => Expr::add(v.iter().map(|e| e.simplify()).collect()),
            Expr::Mul(v) => Expr::mul(v.iter().map(|e| e.simplify()).collect()),
            Expr::Div(a, b) => Expr::div(a.simplify(), b.simplify()),
            Expr::Neg(e) => Expr::neg(e.simplify()),
            Expr::Pow(e, n) => Expr::pow(e.simplify(), *n),
            Expr::Loop(kind, v) => {
                Arc::new(Expr::Loop(*kind, v.iter().map(|e| e.simplify()).collect()))
            }
        }
    }

    /// Structural zero test after simplification.
    pub fn is_zero_expr(self: &ExprRef) -> bool {
        matches!(&**self, Expr::Const(c) if c.is_zero())
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Const(c) => write!(f, "{c}"),
            Expr::Sym(s) => write!(f, "{s}"),
            Expr::Add(v) => {
                write!(f, "(")?;
                for (i, e) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, " + ")?;
                    }
                    write!(f, "{e}")?;
                }
                write!(f, ")")
            }
            Expr::Mul(v) => {
                for (i, e) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, "*")?;
                    }
                    write!(f, "{e}")?;
                }
                Ok(())
            }
            Expr::Div(a, b) => write!(f, "({a})/({b})"),
            Expr::Neg(e) => write!(f, "-{e}"),
            Expr::Pow(e, n) => write!(f, "({e})^{n}"),
            Expr::Loop(kind, v) => {
                write!(f, "{}(", kind.name())?;
                for (i, e) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{e}")?;
                }
                write!(f, ")")
            }
        }
    }
}
