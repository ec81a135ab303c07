//! Induction strategy selection.
//!
//! Classifies the relationship between the vector width `vl` and the inner
//! bound `jj` into one of ten induction classes, cheapest applicable first,
//! and fills in the suggested unroll factor and precompute cycle. The generic
//! divmod fallback is always available, so selection is total.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::shape::LoopShape;

/// The induction-formula class chosen for a [`LoopShape`].
///
/// Exactly one strategy is selected per shape; `GenericDivMod` is the
/// always-valid fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::AsRefStr, strum::EnumIter)]
pub enum Strategy {
    /// Everything fits one chunk; no induction at all.
    SingleChunk,
    /// `vl % jj == 0`: `a += vl/jj` per chunk, `b` never changes.
    VlDivisibleByJj,
    /// `jj % vl == 0` and the whole plan stays inside one outer row:
    /// `b += vl` per chunk, `a` never changes.
    JjDivisibleByVlNoReset,
    /// `jj % vl == 0` with row crossings: `b += vl` except every
    /// `jj/vl`-th chunk, where `b` resets to the lane iota and `a += 1`.
    JjDivisibleByVlWithReset,
    /// `jj` power of two, few enough chunks to precompute them all.
    Pow2FullPrecompute,
    /// `jj` power of two, one cycle of states precomputed and replayed.
    Pow2CyclicPrecompute,
    /// `jj` power of two, recomputed each chunk in 4 vector ops
    /// (add, shift, mask, add).
    Pow2EasyRecompute,
    /// Any `jj`, few enough chunks to precompute them all.
    GenericFullPrecompute,
    /// Any `jj`, one cycle of states precomputed and replayed.
    GenericCyclicPrecompute,
    /// Fallback: per-chunk divmod by `jj` through a fast-division plan.
    GenericDivMod,
}

impl Strategy {
    /// Fixed cost ordering used by the alternate-width search; lower is
    /// cheaper.
    pub fn cost_rank(&self) -> u8 {
        match self {
            Self::SingleChunk | Self::VlDivisibleByJj | Self::JjDivisibleByVlNoReset => 0,
            Self::Pow2FullPrecompute | Self::Pow2CyclicPrecompute => 1,
            Self::GenericCyclicPrecompute | Self::GenericFullPrecompute => 2,
            Self::Pow2EasyRecompute => 3,
            Self::JjDivisibleByVlWithReset => 4,
            Self::GenericDivMod => 5,
        }
    }

    /// True for the strategies that replay precomputed chunk states.
    pub fn uses_precompute(&self) -> bool {
        matches!(
            self,
            Self::Pow2FullPrecompute
                | Self::Pow2CyclicPrecompute
                | Self::GenericFullPrecompute
                | Self::GenericCyclicPrecompute
        )
    }
}

/// The selected strategy plus its unroll/precompute parameters.
///
/// `unroll` is how many chunk states can be precomputed and cycled through;
/// `cycle` is the period of that cycle (0 when no periodic structure is used).
/// `alt_width`, when present, names a smaller vector width at which a strictly
/// cheaper strategy exists; it never replaces the plan's own width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnrollPlan {
    pub strategy: Strategy,
    pub unroll: u32,
    pub cycle: u32,
    pub alt_width: Option<u64>,
}

impl fmt::Display for UnrollPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(unroll={}, cycle={}", self.strategy.as_ref(), self.unroll, self.cycle)?;
        if let Some(w) = self.alt_width {
            write!(f, ", alt_width={w}")?;
        }
        write!(f, ")")
    }
}

/// Select the induction strategy for `shape`.
///
/// The decision tree is evaluated in precedence order; the first matching
/// class wins. Every branch fills `unroll` and `cycle`.
pub fn select(shape: &LoopShape) -> UnrollPlan {
    let (vl, jj) = (shape.vl(), shape.jj());
    let nloop = shape.nloop();
    let budget = shape.max_precompute() as u64;

    let (strategy, unroll, cycle) = if nloop == 1 {
        (Strategy::SingleChunk, 1, 0)
    } else if vl % jj == 0 {
        (Strategy::VlDivisibleByJj, 1, 0)
    } else if jj % vl == 0 {
        let period = jj / vl;
        if nloop <= period {
            (Strategy::JjDivisibleByVlNoReset, 1, 0)
        } else {
            (Strategy::JjDivisibleByVlWithReset, 1, period as u32)
        }
    } else if jj.is_power_of_two() {
        if nloop < budget {
            (Strategy::Pow2FullPrecompute, nloop as u32, 0)
        } else {
            let period = cycle_period(vl, jj);
            if period.min(nloop) < budget {
                (Strategy::Pow2CyclicPrecompute, (budget / period * period) as u32, period as u32)
            } else {
                (Strategy::Pow2EasyRecompute, 1, 0)
            }
        }
    } else if nloop < budget {
        (Strategy::GenericFullPrecompute, nloop as u32, 0)
    } else {
        let period = cycle_period(vl, jj);
        if period.min(nloop) < budget {
            (Strategy::GenericCyclicPrecompute, (budget / period * period) as u32, period as u32)
        } else {
            (Strategy::GenericDivMod, 1, 0)
        }
    };

    let plan = UnrollPlan { strategy, unroll, cycle, alt_width: None };
    tracing::debug!(shape = %shape, strategy = plan.strategy.as_ref(), unroll, cycle, "selected induction strategy");
    plan
}

/// Search widths in `[width_floor, vl - 1]`, highest first, for the first one
/// whose strategy is strictly cheaper under [`Strategy::cost_rank`].
///
/// `GenericDivMod` is never accepted as an improvement target. The default
/// floor is 90% of `vl`. Reports an option; the caller's plan keeps its own
/// width.
pub fn search_alt(shape: &LoopShape, width_floor: Option<u64>) -> Option<u64> {
    let vl = shape.vl();
    let base_rank = select(shape).strategy.cost_rank();
    let floor = width_floor.unwrap_or_else(|| (vl * 9).div_ceil(10)).max(1);

    for w in (floor..vl).rev() {
        let Ok(narrowed) = shape.with_vl(w) else { continue };
        let candidate = select(&narrowed);
        if candidate.strategy != Strategy::GenericDivMod && candidate.strategy.cost_rank() < base_rank {
            tracing::debug!(width = w, strategy = candidate.strategy.as_ref(), "cheaper strategy at reduced width");
            return Some(w);
        }
    }
    None
}

/// [`select`] plus the alternate-width report.
pub fn select_with_alt(shape: &LoopShape, width_floor: Option<u64>) -> UnrollPlan {
    let mut plan = select(shape);
    plan.alt_width = search_alt(shape, width_floor);
    plan
}

/// Chunk period after which the `b` lanes repeat exactly:
/// `lcm(vl, jj) / vl = jj / gcd(vl, jj)`.
pub fn cycle_period(vl: u64, jj: u64) -> u64 {
    jj / gcd(vl, jj)
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
