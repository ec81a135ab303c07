//! Data-only descriptions of the chosen induction formulas.
//!
//! This is the output boundary toward code emitters: a [`KernelFormula`]
//! carries the initial-chunk rule, the per-chunk update rule, and any
//! fast-division constants, and assumes nothing about the target beyond
//! vector add/sub/multiply/shift/mask at a fixed lane width. Emitters consume
//! these values; they never drive planning decisions.

use serde::{Deserialize, Serialize};

use crate::error::DivisorError;
use crate::fastdiv::{FastDivPlan, FastDivPlanner};
use crate::shape::LoopShape;
use crate::strategy::{Strategy, UnrollPlan};

/// How chunk 0 is materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitRule {
    /// `a[k] = 0`, `b[k] = k` (a full row covers the vector).
    IotaIntoB,
    /// `a[k] = k`, `b[k] = 0` (trivial inner loop).
    IotaIntoA,
    /// `(a[k], b[k]) = divmod(k, jj)` through `div`.
    DivModOfLane { div: FastDivPlan },
}

/// How every subsequent chunk is derived from the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepRule {
    /// Single chunk; there is no update.
    None,
    AddToA { step: u64 },
    AddToB { step: u64 },
    /// `b += vl`, except every `period`-th chunk: `a += 1`, `b` to the iota.
    ResetCycle { period: u32 },
    /// `t = b + vl; a += t >> shift; b = t & mask`.
    CarryMask { shift: u32, mask: u64 },
    /// Replay a fully precomputed table of `unroll` chunk states.
    UnrolledTable { unroll: u32 },
    /// Replay one precomputed cycle; `a` gains `a_step` per full cycle.
    CycleTable { cycle: u32, unroll: u32, a_step: u64 },
    /// `t = b + vl; q = fastdiv(t); a += q; b = t - q * jj`.
    DivMod { div: FastDivPlan },
}

/// Everything an emitter needs to render one plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelFormula {
    pub shape: LoopShape,
    pub plan: UnrollPlan,
    pub init: InitRule,
    pub step: StepRule,
}

/// Resolve `plan` into its formula description.
pub fn describe(shape: &LoopShape, plan: &UnrollPlan, planner: &FastDivPlanner) -> Result<KernelFormula, DivisorError> {
    let (vl, jj) = (shape.vl(), shape.jj());

    let init = if jj >= vl {
        InitRule::IotaIntoB
    } else if jj == 1 {
        InitRule::IotaIntoA
    } else {
        InitRule::DivModOfLane { div: planner.plan(jj, Some(vl))? }
    };

    let step = match plan.strategy {
        Strategy::SingleChunk => StepRule::None,
        Strategy::VlDivisibleByJj => StepRule::AddToA { step: vl / jj },
        Strategy::JjDivisibleByVlNoReset => StepRule::AddToB { step: vl },
        Strategy::JjDivisibleByVlWithReset => StepRule::ResetCycle { period: plan.cycle },
        Strategy::Pow2EasyRecompute => StepRule::CarryMask { shift: jj.trailing_zeros(), mask: jj - 1 },
        Strategy::Pow2FullPrecompute | Strategy::GenericFullPrecompute => {
            StepRule::UnrolledTable { unroll: plan.unroll }
        }
        Strategy::Pow2CyclicPrecompute | Strategy::GenericCyclicPrecompute => {
            StepRule::CycleTable { cycle: plan.cycle, unroll: plan.unroll, a_step: plan.cycle as u64 * vl / jj }
        }
        Strategy::GenericDivMod => StepRule::DivMod { div: planner.plan(jj, Some(jj + vl))? },
    };

    Ok(KernelFormula { shape: *shape, plan: *plan, init, step })
}
