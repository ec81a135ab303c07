//! Division-plan sweeps beyond the inline algorithm tests.

use crate::fastdiv::{FastDivPlanner, RESTRICTED_DIVIDEND_MAX, plan};

fn check(divisor: u64, x: u64) {
    let p = plan(divisor, Some(divisor * 4096)).unwrap();
    assert_eq!(p.divide(x), x / divisor, "quotient failed: x={x} d={divisor}");
    assert_eq!(p.modulo(x), x % divisor, "modulo failed: x={x} d={divisor}");
}

#[test]
fn test_small_divisors_full_sweep() {
    for d in 1..=64u64 {
        for x in 0..=d * 4096 {
            check(d, x);
        }
    }
}

#[test]
fn test_divisors_to_4096_at_boundaries() {
    // Quotient boundaries are where multiply-shift plans break when they
    // break: multiples of d, their neighbors, and the declared bound.
    for d in 1..=4096u64 {
        let bound = d * 4096;
        let mut probes = vec![0, 1, d - 1, d, d + 1, bound - 1, bound];
        for m in 1..=64u64 {
            probes.push(bound / 64 * m);
            probes.push(m * d * 61 % bound);
            probes.push((m * d).min(bound));
            probes.push((m * d - 1).min(bound));
        }
        for x in probes {
            if x <= bound {
                check(d, x);
            }
        }
    }
}

#[test]
fn test_restricted_plans_exact_over_their_class() {
    for d in [3u64, 5, 25, 100, 255, 1000, 4095] {
        let p = plan(d, Some(1000)).unwrap();
        assert!(p.range_restricted);
        for x in [0, 1, d, d + 1, RESTRICTED_DIVIDEND_MAX / 2, RESTRICTED_DIVIDEND_MAX - 1, RESTRICTED_DIVIDEND_MAX] {
            assert_eq!(p.divide(x), x / d, "x={x} d={d}");
            assert_eq!(p.modulo(x), x % d, "x={x} d={d}");
        }
    }
}

#[test]
fn test_unbounded_fallback_for_divisor_1000() {
    // A bound of 2_000_000 is outside the restricted class; the unrestricted
    // triple must be selected and hold across the swept range.
    let p = plan(1000, Some(2_000_000)).unwrap();
    assert!(!p.range_restricted);
    assert_eq!(p.op_count, 3);
    assert_eq!(p.shift, 42);
    for x in (0..=2_000_000u64).step_by(97) {
        assert_eq!(p.divide(x), x / 1000, "x={x}");
        assert_eq!(p.modulo(x), x % 1000, "x={x}");
    }
    for x in 1_999_000..=2_000_000u64 {
        assert_eq!(p.divide(x), x / 1000);
    }
}

#[test]
fn test_generic_plans_hold_at_the_index_class_edge() {
    for d in [3u64, 7, 25, 1000, 65_521, (1 << 31) - 1] {
        let p = plan(d, None).unwrap();
        assert!(!p.range_restricted);
        for x in [u32::MAX as u64, u32::MAX as u64 - 1, d * (u32::MAX as u64 / d), d, d - 1] {
            assert_eq!(p.divide(x), x / d, "x={x} d={d}");
            assert_eq!(p.modulo(x), x % d, "x={x} d={d}");
        }
    }
}

#[test]
fn test_planner_cache_is_transparent() {
    let planner = FastDivPlanner::new();
    for _ in 0..3 {
        for d in [2u64, 3, 25, 1000] {
            assert_eq!(planner.plan(d, Some(300)).unwrap(), plan(d, Some(300)).unwrap());
            assert_eq!(planner.plan(d, None).unwrap(), plan(d, None).unwrap());
        }
    }
}
