//! Numeric evaluation of assembled form factors
//!
//! [`evaluate`] is a pure function of the expression and the context: it
//! substitutes every bound symbol, evaluates loop-function nodes through
//! [`PaVeEval`], and combines the results at a guarded working precision.
//! Shared subexpressions of the DAG are evaluated once per call, keyed by
//! node identity, so the per-generation loop nodes the assembler shares
//! across diagrams cost one integration each.

use std::collections::{BTreeMap, HashMap};

use lfv_core::{Complex, Expr, ExprRef, LfvError, Number};
use lfv_pave::PaVeEval;
use tracing::trace;

use crate::session::names;

/// Bindings from symbol names to numeric values, plus the target
/// precision in significant digits.
#[derive(Debug, Clone)]
pub struct NumericContext {
    digits: usize,
    bindings: HashMap<String, Complex>,
}

impl NumericContext {
    pub fn new(digits: usize) -> Self {
        Self { digits, bindings: HashMap::new() }
    }

    pub fn digits(&self) -> usize {
        self.digits
    }

    pub fn bind(&mut self, name: impl Into<String>, value: Complex) -> &mut Self {
        self.bindings.insert(name.into(), value);
        self
    }

    pub fn bind_real(&mut self, name: impl Into<String>, value: Number) -> &mut Self {
        self.bind(name, Complex::real(value))
    }

    /// Parse-and-bind convenience for decimal literals.
    pub fn bind_parsed(&mut self, name: impl Into<String>, literal: &str) -> Result<&mut Self, LfvError> {
        let value = Number::parse(literal)?;
        Ok(self.bind_real(name, value))
    }

    pub fn get(&self, name: &str) -> Option<&Complex> {
        self.bindings.get(name)
    }

    /// Real positive binding, for scale and mass lookups.
    pub fn get_positive(&self, name: &str) -> Result<Number, LfvError> {
        let v = self
            .get(name)
            .ok_or_else(|| LfvError::UnboundSymbol(name.to_string()))?;
        if !v.im.is_zero() || v.re.is_negative() {
            return Err(LfvError::domain(format!(
                "`{name}` must be bound to a non-negative real value"
            )));
        }
        Ok(v.re.clone())
    }

    /// Ordered copy of the bindings, for provenance records.
    pub fn snapshot(&self) -> BTreeMap<String, Complex> {
        self.bindings
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Evaluate `expr` under `ctx`. Every free symbol must be bound (with
/// `pi` as the single builtin); unbound symbols fail the call, they are
/// never defaulted.
pub fn evaluate(expr: &ExprRef, ctx: &NumericContext) -> Result<Complex, LfvError> {
    let wd = ctx.digits() + 10;
    let mut pave = PaVeEval::new(ctx.digits());
    if ctx.get(names::MU).is_some() {
        pave = pave.with_scale(ctx.get_positive(names::MU)?)?;
    }
    let mut seen: HashMap<*const Expr, Complex> = HashMap::new();
    eval_node(expr, ctx, &pave, wd, &mut seen)
}

fn eval_node(
    expr: &ExprRef,
    ctx: &NumericContext,
    pave: &PaVeEval,
    wd: usize,
    seen: &mut HashMap<*const Expr, Complex>,
) -> Result<Complex, LfvError> {
    let key = ExprRef::as_ptr(expr);
    if let Some(hit) = seen.get(&key) {
        return Ok(hit.clone());
    }
    let value = match &**expr {
        Expr::Const(n) => Complex::real(n.clone()),
        Expr::Sym(s) => {
            if s.name() == names::PI {
                Complex::real(Number::pi(wd))
            } else {
                let v = ctx
                    .get(s.name())
                    .ok_or_else(|| LfvError::UnboundSymbol(s.name().to_string()))?;
                if s.is_positive() && (!v.im.is_zero() || v.re.is_negative()) {
                    return Err(LfvError::domain(format!(
                        "symbol `{}` is declared positive but bound to {v}",
                        s.name()
                    )));
                }
                v.clone()
            }
        }
        Expr::Add(terms) => {
            let mut acc = Complex::zero();
            for t in terms {
                acc = acc.add(&eval_node(t, ctx, pave, wd, seen)?);
            }
            acc
        }
        Expr::Mul(factors) => {
            let mut acc = Complex::int(1);
            for f in factors {
                acc = acc.mul(&eval_node(f, ctx, pave, wd, seen)?);
            }
            acc
        }
        Expr::Div(num, den) => {
            let n = eval_node(num, ctx, pave, wd, seen)?;
            let d = eval_node(den, ctx, pave, wd, seen)?;
            n.checked_div(&d, wd)?
        }
        Expr::Neg(inner) => eval_node(inner, ctx, pave, wd, seen)?.neg(),
        Expr::Pow(base, exp) => eval_node(base, ctx, pave, wd, seen)?.pow(*exp, wd)?,
        Expr::Loop(kind, args) => {
            let mut nums = Vec::with_capacity(args.len());
            for a in args {
                let v = eval_node(a, ctx, pave, wd, seen)?;
                if !v.im.is_zero() {
                    return Err(LfvError::domain(format!(
                        "{} argument evaluated to a complex value",
                        kind.name()
                    )));
                }
                nums.push(v.re);
            }
            trace!(kind = kind.name(), "evaluating loop node");
            pave.eval(*kind, &nums)?
        }
    };
    seen.insert(key, value.clone());
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lfv_core::{LoopKind, Symbol};
    use lfv_pave::PaVeCache;

    fn close(a: &Number, b: &Number, tol_exp: isize) {
        assert!(
            a.sub(b).abs() < Number::pow10(tol_exp),
            "expected {} close to {}",
            a,
            b
        );
    }

    #[test]
    fn arithmetic_under_bindings() {
        // x * (y + 2) with x = 3, y = -1  ->  3
        let x = Expr::sym(Symbol::new("x"));
        let y = Expr::sym(Symbol::new("y"));
        let e = Expr::mul(vec![x, Expr::add(vec![y, Expr::num(2)])]);
        let mut ctx = NumericContext::new(20);
        ctx.bind_real("x", Number::int(3))
            .bind_real("y", Number::int(-1));
        let v = evaluate(&e, &ctx).unwrap();
        assert_eq!(v.re, Number::int(3));
    }

    #[test]
    fn unbound_symbol_is_named_in_the_error() {
        let e = Expr::sym(Symbol::new("mystery"));
        let ctx = NumericContext::new(20);
        match evaluate(&e, &ctx) {
            Err(LfvError::UnboundSymbol(name)) => assert_eq!(name, "mystery"),
            other => panic!("expected unbound-symbol error, got {other:?}"),
        }
    }

    #[test]
    fn pi_is_a_builtin() {
        let pi = Expr::sym(Symbol::mass("pi"));
        let e = Expr::pow(pi, 2);
        let ctx = NumericContext::new(30);
        let v = evaluate(&e, &ctx).unwrap();
        close(&v.re, &Number::pi(40).mul(&Number::pi(40)), -28);
    }

    #[test]
    fn positive_symbols_reject_negative_bindings() {
        let m = Expr::sym(Symbol::mass("mX"));
        let mut ctx = NumericContext::new(20);
        ctx.bind_real("mX", Number::int(-5));
        assert!(matches!(evaluate(&m, &ctx), Err(LfvError::Domain(_))));
    }

    #[test]
    fn loop_node_matches_direct_evaluation() {
        let mut cache = PaVeCache::new();
        let node = cache
            .b0(
                Expr::sym(Symbol::new("q2")),
                Expr::sym(Symbol::mass("m1")),
                Expr::sym(Symbol::mass("m2")),
            )
            .unwrap();
        let mut ctx = NumericContext::new(25);
        ctx.bind_parsed("q2", "0.5").unwrap();
        ctx.bind_real("m1", Number::int(1))
            .bind_real("m2", Number::int(2));
        let via_expr = evaluate(&node, &ctx).unwrap();
        let direct = PaVeEval::new(25)
            .eval(
                LoopKind::B0,
                &[Number::parse("0.5").unwrap(), Number::int(1), Number::int(2)],
            )
            .unwrap();
        assert_eq!(via_expr, direct);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let mut cache = PaVeCache::new();
        let node = cache
            .c0(
                Expr::num(0),
                Expr::sym(Symbol::mass("m1")),
                Expr::sym(Symbol::mass("m2")),
                Expr::sym(Symbol::mass("m3")),
            )
            .unwrap();
        let e = Expr::mul(vec![Expr::num(2), node]);
        let mut ctx = NumericContext::new(25);
        ctx.bind_real("m1", Number::int(1))
            .bind_real("m2", Number::int(2))
            .bind_real("m3", Number::int(3));
        let first = evaluate(&e, &ctx).unwrap();
        let second = evaluate(&e, &ctx).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn division_by_bound_zero_fails_cleanly() {
        let x = Expr::sym(Symbol::new("x"));
        let e = Expr::div(Expr::one(), x);
        let mut ctx = NumericContext::new(20);
        ctx.bind_real("x", Number::int(0));
        assert_eq!(evaluate(&e, &ctx), Err(LfvError::DivisionByZero));
    }
}
