//! Interning cache for symbolic loop-function nodes
//!
//! The same loop function with the same arguments appears in many diagrams
//! (every neutrino in the loop contributes the same `C0(q2, mN, mW, mW)`
//! node to several topologies). Interning makes those occurrences pointer
//! equal, so the numeric evaluator computes each integral exactly once.

use std::collections::HashMap;

use lfv_core::{Expr, ExprRef, LfvError, LoopKind};

#[derive(Debug, Default)]
pub struct PaVeCache {
    nodes: HashMap<(LoopKind, String), ExprRef>,
}

impl PaVeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the shared node for `kind` applied to `args`, creating it on
    /// first use. Argument lists are keyed by their rendered form, which is
    /// deterministic for expressions built through the folding constructors.
    pub fn intern(&mut self, kind: LoopKind, args: Vec<ExprRef>) -> Result<ExprRef, LfvError> {
        if args.len() != kind.arity() {
            return Err(LfvError::domain(format!(
                "{} takes {} arguments, got {}",
                kind.name(),
                kind.arity(),
                args.len()
            )));
        }
        let key_body: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let key = (kind, key_body.join(","));
        if let Some(node) = self.nodes.get(&key) {
            return Ok(node.clone());
        }
        let node = Expr::loop_fn(kind, args)?;
        self.nodes.insert(key, node.clone());
        Ok(node)
    }

    pub fn a0(&mut self, m: ExprRef) -> Result<ExprRef, LfvError> {
        self.intern(LoopKind::A0, vec![m])
    }

    pub fn b0(&mut self, q2: ExprRef, m1: ExprRef, m2: ExprRef) -> Result<ExprRef, LfvError> {
        self.intern(LoopKind::B0, vec![q2, m1, m2])
    }

    pub fn b1(&mut self, q2: ExprRef, m1: ExprRef, m2: ExprRef) -> Result<ExprRef, LfvError> {
        self.intern(LoopKind::B1, vec![q2, m1, m2])
    }

    pub fn c0(
        &mut self,
        q2: ExprRef,
        m1: ExprRef,
        m2: ExprRef,
        m3: ExprRef,
    ) -> Result<ExprRef, LfvError> {
        self.intern(LoopKind::C0, vec![q2, m1, m2, m3])
    }

    pub fn c1(
        &mut self,
        q2: ExprRef,
        m1: ExprRef,
        m2: ExprRef,
        m3: ExprRef,
    ) -> Result<ExprRef, LfvError> {
        self.intern(LoopKind::C1, vec![q2, m1, m2, m3])
    }

    pub fn c2(
        &mut self,
        q2: ExprRef,
        m1: ExprRef,
        m2: ExprRef,
        m3: ExprRef,
    ) -> Result<ExprRef, LfvError> {
        self.intern(LoopKind::C2, vec![q2, m1, m2, m3])
    }

    /// Number of distinct loop nodes created so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
