//! Per-chunk induction state and the engine that advances it.
//!
//! The engine owns one [`ChunkState`] and mutates it in place, one chunk at a
//! time, using exactly the update rule of the selected [`Strategy`]. The
//! original control flow (labeled INIT/INDUCE/KERNEL/DONE blocks) is expressed
//! as an explicit finite-state machine with a single [`InductionEngine::step`]
//! transition.

use smallvec::SmallVec;
use snafu::ensure;

use crate::error::{DivisorError, InductionError, ShapeMismatchSnafu};
use crate::fastdiv::{FastDivPlan, FastDivPlanner};
use crate::shape::LoopShape;
use crate::strategy::{Strategy, UnrollPlan};

/// Index vectors for one chunk of the linearized loop.
///
/// `a` and `b` always hold `vl` lanes; lanes at and beyond `width` are dead
/// and only the final chunk ever has `width < vl`. For live lanes,
/// `a[k] * jj + b[k]` equals the chunk's starting linear index plus `k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkState {
    /// Outer-loop index per lane.
    pub a: Vec<u64>,
    /// Inner-loop index per lane.
    pub b: Vec<u64>,
    /// Live lane count of the current chunk.
    pub width: u32,
    /// Strategy-owned scratch vectors (e.g. the canonical lane iota used by
    /// the reset update).
    pub auxiliary: SmallVec<[Vec<u64>; 2]>,
}

/// States of the chunk-sequence machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Initial chunk state built, not yet handed out.
    Init,
    /// The current chunk state is live and may be consumed.
    Kernel,
    /// Between chunks; the next transition advances the state.
    Induce,
    /// Past the last chunk.
    Done,
}

/// One precomputed chunk entry.
struct TableEntry {
    a: Vec<u64>,
    b: Vec<u64>,
}

/// The strategy's update rule, resolved to concrete constants at engine
/// construction.
enum Update {
    /// Single chunk; never advanced.
    Hold,
    AddA { step: u64 },
    AddB { step: u64 },
    /// `b += vl`, except on cycle wrap: `a += 1`, `b` back to the iota.
    ResetCycle,
    /// Power-of-two `jj`: add, shift, mask, add.
    CarryMask { shift: u32, mask: u64 },
    /// Every chunk state precomputed.
    Unrolled { table: Vec<TableEntry> },
    /// One cycle of states precomputed; `a` gains `a_step` per full cycle.
    Cycled { table: Vec<TableEntry>, a_step: u64 },
    /// Fast divmod of the carried inner index by `jj`.
    DivMod { div: FastDivPlan },
}

/// Advance a counter modulo `cycle`.
///
/// Period two is a toggle and power-of-two periods a mask; the general case
/// compares and resets. One function covers all three.
pub fn cyclic_advance(counter: u32, cycle: u32) -> u32 {
    debug_assert!(cycle > 0 && counter < cycle);
    if cycle == 2 {
        counter ^ 1
    } else if cycle.is_power_of_two() {
        (counter + 1) & (cycle - 1)
    } else if counter + 1 == cycle {
        0
    } else {
        counter + 1
    }
}

/// Drives one plan's chunk sequence from INIT to DONE.
pub struct InductionEngine {
    shape: LoopShape,
    plan: UnrollPlan,
    update: Update,
    state: ChunkState,
    phase: Phase,
    chunk: u64,
    cycle_pos: u32,
    a_offset: u64,
}

impl InductionEngine {
    /// Build the initial chunk state and resolve the strategy's update rule
    /// (division plans, precompute tables, auxiliary vectors).
    pub fn new(shape: LoopShape, plan: UnrollPlan, planner: &FastDivPlanner) -> Result<Self, DivisorError> {
        let (vl, jj) = (shape.vl(), shape.jj());
        let mut state = initial_state(&shape, planner)?;

        let update = match plan.strategy {
            Strategy::SingleChunk => Update::Hold,
            Strategy::VlDivisibleByJj => Update::AddA { step: vl / jj },
            Strategy::JjDivisibleByVlNoReset => Update::AddB { step: vl },
            Strategy::JjDivisibleByVlWithReset => {
                state.auxiliary.push((0..vl).collect());
                Update::ResetCycle
            }
            Strategy::Pow2EasyRecompute => Update::CarryMask { shift: jj.trailing_zeros(), mask: jj - 1 },
            Strategy::Pow2FullPrecompute | Strategy::GenericFullPrecompute => {
                Update::Unrolled { table: build_table(&shape, shape.nloop()) }
            }
            Strategy::Pow2CyclicPrecompute | Strategy::GenericCyclicPrecompute => {
                let cycle = plan.cycle as u64;
                Update::Cycled { table: build_table(&shape, cycle), a_step: cycle * vl / jj }
            }
            Strategy::GenericDivMod => Update::DivMod { div: planner.plan(jj, Some(jj + vl))? },
        };

        tracing::debug!(shape = %shape, strategy = plan.strategy.as_ref(), "induction engine ready");
        Ok(Self { shape, plan, update, state, phase: Phase::Init, chunk: 0, cycle_pos: 0, a_offset: 0 })
    }

    pub fn shape(&self) -> &LoopShape {
        &self.shape
    }

    pub fn plan(&self) -> &UnrollPlan {
        &self.plan
    }

    pub fn state(&self) -> &ChunkState {
        &self.state
    }

    pub fn chunk_index(&self) -> u64 {
        self.chunk
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True once `chunk_index` is the last chunk of the sequence.
    pub fn done_at(chunk_index: u64, shape: &LoopShape) -> bool {
        chunk_index + 1 >= shape.nloop()
    }

    pub fn is_done(&self) -> bool {
        Self::done_at(self.chunk, &self.shape)
    }

    /// Mutate the state into the next chunk's index vectors.
    ///
    /// # Errors
    ///
    /// [`InductionError::ShapeMismatch`] when called past the last chunk.
    /// This is assertion-grade misuse; there is no recovery.
    pub fn advance(&mut self) -> Result<(), InductionError> {
        let nloop = self.shape.nloop();
        ensure!(self.chunk + 1 < nloop, ShapeMismatchSnafu { chunk: self.chunk + 1, nloop });
        self.chunk += 1;

        let chunk = self.chunk;
        let Self { shape, plan, update, state, cycle_pos, a_offset, .. } = self;
        let vl = shape.vl();

        match update {
            Update::Hold => {}
            Update::AddA { step } => {
                for a in &mut state.a {
                    *a += *step;
                }
            }
            Update::AddB { step } => {
                for b in &mut state.b {
                    *b += *step;
                }
            }
            Update::ResetCycle => {
                let next = cyclic_advance(*cycle_pos, plan.cycle);
                if next == 0 {
                    let ChunkState { a, b, auxiliary, .. } = state;
                    for lane in a.iter_mut() {
                        *lane += 1;
                    }
                    b.copy_from_slice(&auxiliary[0]);
                } else {
                    for b in &mut state.b {
                        *b += vl;
                    }
                }
                *cycle_pos = next;
            }
            Update::CarryMask { shift, mask } => {
                for (a, b) in state.a.iter_mut().zip(&mut state.b) {
                    let t = *b + vl;
                    *a += t >> *shift;
                    *b = t & *mask;
                }
            }
            Update::Unrolled { table } => {
                let entry = &table[chunk as usize];
                state.a.copy_from_slice(&entry.a);
                state.b.copy_from_slice(&entry.b);
            }
            Update::Cycled { table, a_step } => {
                let next = cyclic_advance(*cycle_pos, plan.cycle);
                if next == 0 {
                    *a_offset += *a_step;
                }
                *cycle_pos = next;
                let entry = &table[next as usize];
                for (a, base) in state.a.iter_mut().zip(&entry.a) {
                    *a = base + *a_offset;
                }
                state.b.copy_from_slice(&entry.b);
            }
            Update::DivMod { div } => {
                let jj = shape.jj();
                for (a, b) in state.a.iter_mut().zip(&mut state.b) {
                    let (q, r) = div.div_rem(*b + vl);
                    *a += q;
                    *b = r;
                    debug_assert!(r < jj);
                }
            }
        }

        self.state.width = self.shape.chunk_width(self.chunk);
        Ok(())
    }

    /// One transition of the chunk-sequence machine.
    pub fn step(&mut self) -> Result<Phase, InductionError> {
        self.phase = match self.phase {
            Phase::Init => Phase::Kernel,
            Phase::Kernel => {
                if self.is_done() {
                    Phase::Done
                } else {
                    Phase::Induce
                }
            }
            Phase::Induce => {
                self.advance()?;
                Phase::Kernel
            }
            Phase::Done => Phase::Done,
        };
        Ok(self.phase)
    }

    /// Drive the machine to the next live chunk; `None` once the sequence is
    /// exhausted.
    pub fn next_chunk(&mut self) -> Result<Option<&ChunkState>, InductionError> {
        loop {
            match self.step()? {
                Phase::Done => return Ok(None),
                Phase::Kernel => break,
                Phase::Init | Phase::Induce => {}
            }
        }
        Ok(Some(&self.state))
    }
}

/// Chunk 0 per the init rule: `b` is the lane iota when a full row covers the
/// vector, `a` is the iota when the inner loop is trivial, and the general
/// case divides each lane index by `jj`.
fn initial_state(shape: &LoopShape, planner: &FastDivPlanner) -> Result<ChunkState, DivisorError> {
    let (vl, jj) = (shape.vl(), shape.jj());
    let lanes = vl as usize;

    let (a, b) = if jj >= vl {
        (vec![0; lanes], (0..vl).collect())
    } else if jj == 1 {
        ((0..vl).collect(), vec![0; lanes])
    } else {
        let div = planner.plan(jj, Some(vl))?;
        let mut a = Vec::with_capacity(lanes);
        let mut b = Vec::with_capacity(lanes);
        for k in 0..vl {
            let (q, r) = div.div_rem(k);
            a.push(q);
            b.push(r);
        }
        (a, b)
    };

    Ok(ChunkState { a, b, width: shape.chunk_width(0), auxiliary: SmallVec::new() })
}

/// Precompute the first `entries` chunk states directly from the linear index.
fn build_table(shape: &LoopShape, entries: u64) -> Vec<TableEntry> {
    let (vl, jj) = (shape.vl(), shape.jj());
    (0..entries)
        .map(|c| {
            let mut a = Vec::with_capacity(vl as usize);
            let mut b = Vec::with_capacity(vl as usize);
            for k in 0..vl {
                let lin = c * vl + k;
                a.push(lin / jj);
                b.push(lin % jj);
            }
            TableEntry { a, b }
        })
        .collect()
}
