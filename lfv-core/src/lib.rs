//! lfv-core: arbitrary precision numerics and symbolic expressions
//!
//! Foundation crate for the decay amplitude engine. Provides:
//! - [`Number`]: arbitrary precision real arithmetic over dashu's `DBig`
//! - [`Complex`]: complex arithmetic with the `-i0` cut convention
//! - [`Symbol`] and [`Expr`]: the symbolic layer form factors are built in
//! - [`LfvError`]: the error type shared across the workspace

pub mod complex;
pub mod error;
pub mod expr;
pub mod number;
pub mod symbol;

pub use complex::Complex;
pub use error::LfvError;
pub use expr::{Expr, ExprRef, LoopKind};
pub use number::Number;
pub use symbol::Symbol;

/// Common imports for downstream crates.
pub mod prelude {
    pub use crate::complex::Complex;
    pub use crate::error::LfvError;
    pub use crate::expr::{Expr, ExprRef, LoopKind};
    pub use crate::number::Number;
    pub use crate::symbol::Symbol;
}
