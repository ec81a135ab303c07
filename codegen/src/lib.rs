//! Source emitters for weft induction plans.
//!
//! This crate renders the planner's data-only [`KernelFormula`] descriptions
//! into target-language text. Emitters are sinks: they consume formulas and
//! never drive planning decisions.
//!
//! # Architecture
//!
//! - **Traits**: Backend-agnostic interface (`Renderer`)
//! - **C**: C source renderer for host-compiled loop drivers
//!
//! [`KernelFormula`]: weft_plan::KernelFormula

pub mod c;
pub mod error;
pub mod traits;
pub mod types;

#[cfg(test)]
pub mod test;

pub use error::*;
pub use traits::*;
pub use types::*;
