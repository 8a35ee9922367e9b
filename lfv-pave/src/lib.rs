//! lfv-pave: one-loop scalar functions
//!
//! Finite parts of the Passarino-Veltman functions `A0`, `B0`, `B1` and
//! the massless-external-leg triangles `C0`, `C1`, `C2`, in arbitrary
//! precision. Closed forms where they exist, tanh-sinh quadrature of the
//! Feynman parameter representation everywhere else, with the `-i0`
//! prescription applied pointwise so above-threshold kinematics come out
//! on the physical sheet.

pub mod closed;
pub mod eval;
pub mod instance;
pub mod quad;

pub use eval::PaVeEval;
pub use instance::PaVeCache;
pub use quad::{integrate_unit, QuadSpec};
