//! Induction planning for vectorized double-loop fusion.
//!
//! Given loop bounds `(ii, jj)` and a vector width `vl`, this crate decides
//! how to produce, for every chunk of `vl` consecutive linearized iterations
//! of `for i in 0..ii { for j in 0..jj }`, the outer/inner index vectors
//! `a[]` and `b[]` with the fewest vector operations, and how many chunk
//! states are worth precomputing.
//!
//! # Module Organization
//!
//! - [`shape`] - The fused iteration space and its validation
//! - [`fastdiv`] - Constant-divisor multiply/shift/add synthesis
//! - [`strategy`] - Ten-way induction classification and unroll planning
//! - [`engine`] - Per-chunk state and the INIT/INDUCE/KERNEL/DONE machine
//! - [`formula`] - Data-only formula descriptions for code emitters
//! - [`oracle`] - Brute-force ground truth for equivalence testing
//! - [`config`] - Environment-driven planning knobs

pub mod config;
pub mod engine;
pub mod error;
pub mod fastdiv;
pub mod formula;
pub mod oracle;
pub mod shape;
pub mod strategy;

#[cfg(test)]
pub mod test;

pub use config::PlannerConfig;
pub use engine::{ChunkState, InductionEngine, Phase, cyclic_advance};
pub use error::{DivisorError, InductionError, ShapeError};
pub use fastdiv::{FastDivPlan, FastDivPlanner};
pub use formula::{InitRule, KernelFormula, StepRule, describe};
pub use shape::{INDEX_CLASS_MAX, LoopShape};
pub use strategy::{Strategy, UnrollPlan, search_alt, select, select_with_alt};
