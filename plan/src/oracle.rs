//! Brute-force enumeration of the fused loop, used as ground truth.
//!
//! The oracle literally walks `for i in 0..ii { for j in 0..jj }` and slices
//! the pairs into chunks of `vl` lanes. Nothing here is clever; it exists so
//! every synthesized induction formula can be checked bit-for-bit.

use crate::shape::LoopShape;

/// One ground-truth chunk. Vectors hold exactly `width` lanes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceChunk {
    pub a: Vec<u64>,
    pub b: Vec<u64>,
    pub width: u32,
    pub hash: u64,
}

/// The full ground-truth chunk sequence for `shape`.
pub type ReferenceTrace = Vec<ReferenceChunk>;

/// Enumerate the naive double loop and slice it into chunks.
pub fn enumerate(shape: &LoopShape) -> ReferenceTrace {
    let vl = shape.vl() as usize;
    let mut trace = Vec::with_capacity(shape.nloop() as usize);
    let mut a = Vec::with_capacity(vl);
    let mut b = Vec::with_capacity(vl);

    for i in 0..shape.ii() {
        for j in 0..shape.jj() {
            a.push(i);
            b.push(j);
            if a.len() == vl {
                trace.push(seal(&mut a, &mut b));
            }
        }
    }
    if !a.is_empty() {
        trace.push(seal(&mut a, &mut b));
    }
    trace
}

fn seal(a: &mut Vec<u64>, b: &mut Vec<u64>) -> ReferenceChunk {
    let hash = chunk_hash(a, b);
    let width = a.len() as u32;
    ReferenceChunk { a: std::mem::take(a), b: std::mem::take(b), width, hash }
}

/// Order-sensitive rolling hash over one chunk's `(a, b)` lanes.
///
/// Each lane is mixed through fixed multiplicative constants and XOR-combined
/// with a running LCG stream value, so chunks with identical lane multisets
/// but different ordering hash differently. Cheap equality oracle only; no
/// correctness role.
pub fn chunk_hash(a: &[u64], b: &[u64]) -> u64 {
    const MIX_A: u64 = 0xFF51_AFD7_ED55_8CCD;
    const MIX_B: u64 = 0xC4CE_B9FE_1A85_EC53;
    const STREAM_MUL: u64 = 6_364_136_223_846_793_005;
    const STREAM_INC: u64 = 1_442_695_040_888_963_407;

    debug_assert_eq!(a.len(), b.len());
    let mut hash = 0u64;
    let mut stream = 0x9E37_79B9_7F4A_7C15u64;
    for (&ai, &bi) in a.iter().zip(b) {
        let mixed = ai.wrapping_mul(MIX_A) ^ bi.wrapping_mul(MIX_B);
        hash ^= mixed.wrapping_add(stream);
        stream = stream.wrapping_mul(STREAM_MUL).wrapping_add(STREAM_INC);
    }
    hash
}
