//! Error taxonomy shared across the workspace
//!
//! Symbolic-construction errors surface at the call site; numeric-evaluation
//! errors surface per evaluation call and leave the (immutable) symbolic
//! objects reusable. Nothing is ever downgraded to a default value.

use thiserror::Error;

/// Canonical error type for the LFV engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LfvError {
    /// Invalid physical input: negative mass, infrared-divergent mass
    /// configuration, non-real kinematic invariant, and similar.
    #[error("domain error: {0}")]
    Domain(String),

    /// The adaptive integrator exhausted its refinement budget without
    /// certifying the requested relative precision.
    #[error("precision not certified: {0}")]
    Precision(String),

    /// Vertex/diagram arity or role mismatch while building a topology.
    #[error("topology mismatch: {0}")]
    TopologyMismatch(String),

    /// A numeric context is missing a binding for a required symbol.
    #[error("unbound symbol `{0}`")]
    UnboundSymbol(String),

    /// Invalid numeric literal.
    #[error("parse error: {0}")]
    Parse(String),

    /// Division by zero in exact arithmetic.
    #[error("division by zero")]
    DivisionByZero,
}

impl LfvError {
    /// Domain error with a formatted message.
    pub fn domain(msg: impl Into<String>) -> Self {
        Self::Domain(msg.into())
    }

    /// Precision-certification failure with a formatted message.
    pub fn precision(msg: impl Into<String>) -> Self {
        Self::Precision(msg.into())
    }

    /// Topology arity/role mismatch with a formatted message.
    pub fn topology(msg: impl Into<String>) -> Self {
        Self::TopologyMismatch(msg.into())
    }
}
