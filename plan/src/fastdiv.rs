//! Fast integer division using magic number multiplication.
//!
//! Replaces division and modulo by a loop-constant divisor with
//! multiply/shift/add sequences that vector units execute directly:
//!
//!   x / d ≈ (x * M + A) >> S
//!
//! Three plans are synthesized, cheapest first:
//! - powers of two: a single shift (modulo is a mask of `d - 1`),
//! - a 2-operation multiply-shift with a fixed 42-bit shift, valid only for
//!   dividends in the restricted class (Granlund–Montgomery style round-up
//!   multiplier, verified by closed form before it is returned),
//! - the 3-operation multiply/add/shift triple (Alverson), exact for every
//!   dividend in the 32-bit index class with no range restriction.

use serde::{Deserialize, Serialize};
use snafu::ensure;

use crate::error::{DivisorError, ZeroSnafu};

/// Dividend width of the index class the generic plan covers.
const INDEX_WIDTH: u32 = 32;

/// Fixed shift of the restricted 2-operation plan.
pub const RESTRICTED_SHIFT: u32 = 42;

/// Largest dividend the restricted 2-operation plan accepts.
///
/// One bit below the 21-bit exactness boundary of the 42-bit multiply-shift,
/// which keeps every admissible `x * multiplier` product under `2^61`.
pub const RESTRICTED_DIVIDEND_MAX: u64 = (1 << 20) - 1;

/// A verified constant-divisor division plan.
///
/// Invariant: for every dividend `x` in the plan's validated range,
/// `(x * multiplier + addend) >> shift == x / divisor`, and the modulo derived
/// as `x - divisor * quotient` equals `x % divisor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FastDivPlan {
    pub divisor: u64,
    pub multiplier: u64,
    pub shift: u32,
    pub addend: u64,
    /// Vector operations in the quotient sequence (1..=3).
    pub op_count: u8,
    /// True when the plan is only exact up to [`RESTRICTED_DIVIDEND_MAX`].
    pub range_restricted: bool,
}

impl FastDivPlan {
    /// Evaluate the quotient sequence.
    pub fn divide(&self, x: u64) -> u64 {
        ((x as u128 * self.multiplier as u128 + self.addend as u128) >> self.shift) as u64
    }

    /// Evaluate the derived modulo `x - divisor * (x / divisor)`.
    pub fn modulo(&self, x: u64) -> u64 {
        x - self.divisor * self.divide(x)
    }

    /// Quotient and modulo together, sharing one quotient evaluation.
    pub fn div_rem(&self, x: u64) -> (u64, u64) {
        let q = self.divide(x);
        (q, x - self.divisor * q)
    }

    /// Vector operations for a combined quotient + modulo evaluation.
    ///
    /// Powers of two pay one mask; everything else pays a multiply and a
    /// subtract on top of the quotient sequence.
    pub fn divmod_op_count(&self) -> u8 {
        if self.divisor.is_power_of_two() { self.op_count + 1 } else { self.op_count + 2 }
    }
}

/// Classification of the dividend bound a plan was requested for.
///
/// Plans within one class are interchangeable: the restricted plan is verified
/// against the whole class bound, not the caller's exact bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundClass {
    /// Bound at or below [`RESTRICTED_DIVIDEND_MAX`].
    Restricted,
    /// No bound, or a bound above the restricted class.
    Full,
}

impl BoundClass {
    pub fn of(input_upper_bound: Option<u64>) -> Self {
        match input_upper_bound {
            Some(bound) if bound <= RESTRICTED_DIVIDEND_MAX => Self::Restricted,
            _ => Self::Full,
        }
    }
}

/// Synthesize a division plan for `divisor`.
///
/// `input_upper_bound` is an inclusive bound on the dividends the caller will
/// feed the plan. A bound inside the restricted class unlocks the cheaper
/// 2-operation multiply-shift; without one (or when the closed-form exactness
/// check fails) the generic triple is returned, which carries no range
/// restriction within the 32-bit index class.
///
/// # Errors
///
/// [`DivisorError::Zero`] when `divisor == 0`.
pub fn plan(divisor: u64, input_upper_bound: Option<u64>) -> Result<FastDivPlan, DivisorError> {
    ensure!(divisor != 0, ZeroSnafu);

    if divisor.is_power_of_two() {
        return Ok(FastDivPlan {
            divisor,
            multiplier: 1,
            shift: divisor.trailing_zeros(),
            addend: 0,
            op_count: 1,
            range_restricted: false,
        });
    }

    if BoundClass::of(input_upper_bound) == BoundClass::Restricted
        && let Some(restricted) = restricted_plan(divisor)
    {
        return Ok(restricted);
    }

    Ok(generic_plan(divisor))
}

/// The 2-operation plan: `x / d == (x * M) >> 42` with the round-up multiplier
/// `M = floor(2^42 / d) + 1`.
///
/// Exactness (Granlund–Montgomery): with `e = M*d - 2^42`, the quotient is
/// exact for every `x` with `x * e < 2^42`. The check is taken at the class
/// bound so any dividend in the restricted class is covered. Returns `None`
/// when the check fails; the caller falls back to the generic plan.
fn restricted_plan(divisor: u64) -> Option<FastDivPlan> {
    let pow = 1u128 << RESTRICTED_SHIFT;
    let multiplier = (pow / divisor as u128) as u64 + 1;
    let error = multiplier as u128 * divisor as u128 - pow;

    if RESTRICTED_DIVIDEND_MAX as u128 * error >= pow {
        return None;
    }

    Some(FastDivPlan {
        divisor,
        multiplier,
        shift: RESTRICTED_SHIFT,
        addend: 0,
        op_count: 2,
        range_restricted: true,
    })
}

/// The full-range triple (Alverson): `l = ceil(log2 d)`, `S = 32 + l`,
/// `M = floor(2^S / d)`, and an addend of `M` corrects the truncation unless
/// `d` divides `2^S` exactly.
///
/// Exact for every dividend in the 32-bit index class: the correction term
/// `r * (x + 1)` stays below `2^S` because `r < d <= 2^l` and `x + 1 <= 2^32`.
fn generic_plan(divisor: u64) -> FastDivPlan {
    let l = ceil_log2(divisor);
    let shift = INDEX_WIDTH + l;
    let pow = 1u128 << shift;
    let multiplier = (pow / divisor as u128) as u64;
    let exact = pow % divisor as u128 == 0;

    let (addend, op_count) = if exact { (0, 2) } else { (multiplier, 3) };
    FastDivPlan { divisor, multiplier, shift, addend, op_count, range_restricted: false }
}

/// `ceil(log2 n)` for positive `n`.
fn ceil_log2(n: u64) -> u32 {
    debug_assert!(n > 0);
    if n.is_power_of_two() { n.trailing_zeros() } else { 64 - n.leading_zeros() }
}

/// Memoizing front end over [`plan`].
///
/// Many chunks share the same `jj`, so plans are cached per
/// `(divisor, bound class)`. The map is lock-free; racing inserts compute
/// identical plans, so last-write-wins is harmless.
pub struct FastDivPlanner {
    plans: papaya::HashMap<(u64, BoundClass), FastDivPlan>,
}

impl FastDivPlanner {
    pub fn new() -> Self {
        Self { plans: papaya::HashMap::new() }
    }

    /// Cached [`plan`].
    pub fn plan(&self, divisor: u64, input_upper_bound: Option<u64>) -> Result<FastDivPlan, DivisorError> {
        let key = (divisor, BoundClass::of(input_upper_bound));
        let guard = self.plans.guard();

        if let Some(cached) = self.plans.get(&key, &guard) {
            return Ok(*cached);
        }

        let fresh = plan(divisor, input_upper_bound)?;
        self.plans.insert(key, fresh, &guard);
        Ok(fresh)
    }
}

impl Default for FastDivPlanner {
    fn default() -> Self {
        Self::new()
    }
}
