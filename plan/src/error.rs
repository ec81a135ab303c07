use snafu::Snafu;

/// Validation failures raised while constructing a [`LoopShape`](crate::LoopShape).
///
/// All of these are fail-fast: a shape is either fully valid or never exists.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum ShapeError {
    #[snafu(display("loop dimension {field} must be positive"))]
    ZeroDimension { field: &'static str },

    #[snafu(display("iteration space {ii} * {jj} overflows u64"))]
    IterationOverflow { ii: u64, jj: u64 },

    #[snafu(display("iteration space {iijj} plus vector width {vl} exceeds the 32-bit index class"))]
    IndexRange { iijj: u64, vl: u64 },
}

/// Failures from the fast-division planner.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum DivisorError {
    /// Divisor zero is a programmer error; there is no plan to synthesize.
    #[snafu(display("division plan requested for divisor zero"))]
    Zero,
}

/// Misuse of the induction engine.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum InductionError {
    /// `advance` was called past the end of the chunk sequence.
    #[snafu(display("advance past the end of the chunk sequence: chunk {chunk} >= nloop {nloop}"))]
    ShapeMismatch { chunk: u64, nloop: u64 },
}
