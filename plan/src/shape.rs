//! The fused double-loop iteration space.
//!
//! A [`LoopShape`] describes `for i in 0..ii { for j in 0..jj }` linearized to
//! `ii*jj` iterations and sliced into chunks of `vl` consecutive lanes. All
//! planning and induction state derives from this one value.

use std::fmt;

use serde::{Deserialize, Serialize};
use snafu::ensure;

use crate::error::{IndexRangeSnafu, IterationOverflowSnafu, ShapeError, ZeroDimensionSnafu};

/// Largest linear index value the synthesized formulas may be asked to divide.
///
/// Index arithmetic is 32-bit class: the induction formulas divide values up to
/// `ii*jj - 1 + vl`, so that bound must fit in `u32`. The fast-division plans
/// are proven exact over exactly this class.
pub const INDEX_CLASS_MAX: u64 = u32::MAX as u64;

/// Immutable description of a fused double loop vectorized at width `vl`.
///
/// Invariants, enforced at construction:
/// - `vl`, `ii`, `jj` are positive and `max_precompute >= 1`
/// - `ii * jj` does not overflow `u64`
/// - `ii * jj - 1 + vl <= `[`INDEX_CLASS_MAX`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoopShape {
    vl: u64,
    ii: u64,
    jj: u64,
    max_precompute: u32,
}

impl LoopShape {
    /// Validate and build a shape.
    ///
    /// `max_precompute` is the register budget for precomputed chunk states;
    /// the selector never suggests holding that many states or more.
    pub fn new(vl: u64, ii: u64, jj: u64, max_precompute: u32) -> Result<Self, ShapeError> {
        ensure!(vl > 0, ZeroDimensionSnafu { field: "vl" });
        ensure!(ii > 0, ZeroDimensionSnafu { field: "ii" });
        ensure!(jj > 0, ZeroDimensionSnafu { field: "jj" });
        ensure!(max_precompute >= 1, ZeroDimensionSnafu { field: "max_precompute" });

        let iijj = ii.checked_mul(jj).ok_or_else(|| IterationOverflowSnafu { ii, jj }.build())?;
        let span = iijj.checked_add(vl).ok_or_else(|| IndexRangeSnafu { iijj, vl }.build())?;
        ensure!(span <= INDEX_CLASS_MAX + 1, IndexRangeSnafu { iijj, vl });

        Ok(Self { vl, ii, jj, max_precompute })
    }

    /// The same shape at a different vector width.
    pub fn with_vl(&self, vl: u64) -> Result<Self, ShapeError> {
        Self::new(vl, self.ii, self.jj, self.max_precompute)
    }

    pub fn vl(&self) -> u64 {
        self.vl
    }

    pub fn ii(&self) -> u64 {
        self.ii
    }

    pub fn jj(&self) -> u64 {
        self.jj
    }

    pub fn max_precompute(&self) -> u32 {
        self.max_precompute
    }

    /// Total linearized iteration count `ii * jj`.
    pub fn iijj(&self) -> u64 {
        self.ii * self.jj
    }

    /// Number of chunks: `ceil(ii*jj / vl)`.
    pub fn nloop(&self) -> u64 {
        self.iijj().div_ceil(self.vl)
    }

    /// Lane count of chunk `chunk`: `vl` for every chunk except possibly the
    /// last, which is trimmed to the remaining iterations.
    pub fn chunk_width(&self, chunk: u64) -> u32 {
        debug_assert!(chunk < self.nloop());
        self.vl.min(self.iijj() - chunk * self.vl) as u32
    }
}

impl fmt::Display for LoopShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vl={} ii={} jj={} nloop={}", self.vl, self.ii, self.jj, self.nloop())
    }
}
