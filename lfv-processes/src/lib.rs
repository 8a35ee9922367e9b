//! lfv-processes: form-factor assembly, evaluation and decay rates
//!
//! Per-process assemblers ([`assemble_higgs`], [`assemble_z`]) sum the
//! triangle and bubble diagrams of the heavy-neutrino loop into chiral
//! form factors; [`evaluate`] turns those into numbers under a binding
//! context; [`decay_rate`] folds them into partial widths.

mod assemble;
pub mod evaluate;
pub mod higgs;
pub mod rate;
pub mod session;
pub mod zboson;

pub use evaluate::{evaluate, NumericContext};
pub use higgs::assemble_higgs;
pub use rate::{decay_rate, higgs_width, kallen, z_width, DecayRateResult};
pub use session::{names, AssemblySession, FormFactors, Process};
pub use zboson::assemble_z;
