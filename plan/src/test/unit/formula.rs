//! Formula descriptions handed to emitters.

use crate::fastdiv::FastDivPlanner;
use crate::formula::{InitRule, StepRule, describe};
use crate::strategy::{Strategy, select};
use crate::test::helpers::shape;

#[test]
fn test_init_rules_follow_the_jj_vl_relation() {
    let planner = FastDivPlanner::new();

    let s = shape(8, 4, 8, 8);
    assert_eq!(describe(&s, &select(&s), &planner).unwrap().init, InitRule::IotaIntoB);

    let s = shape(6, 20, 1, 8);
    assert_eq!(describe(&s, &select(&s), &planner).unwrap().init, InitRule::IotaIntoA);

    let s = shape(8, 20, 3, 8);
    let formula = describe(&s, &select(&s), &planner).unwrap();
    match formula.init {
        InitRule::DivModOfLane { div } => assert_eq!(div.divisor, 3),
        other => panic!("expected lane divmod init, got {other:?}"),
    }
}

#[test]
fn test_divmod_step_carries_the_restricted_plan() {
    // jj + vl = 281 sits inside the restricted class, so the 2-op divide is used.
    let s = shape(256, 1000, 25, 8);
    let plan = select(&s);
    assert_eq!(plan.strategy, Strategy::GenericDivMod);

    let formula = describe(&s, &plan, &FastDivPlanner::new()).unwrap();
    match formula.step {
        StepRule::DivMod { div } => {
            assert_eq!(div.divisor, 25);
            assert!(div.range_restricted);
            assert_eq!(div.op_count, 2);
        }
        other => panic!("expected divmod step, got {other:?}"),
    }
}

#[test]
fn test_cycle_table_step_parameters() {
    // cycle = 3, and each full cycle advances a by lcm(8,3)/3 = 8 rows.
    let s = shape(8, 20, 3, 8);
    let plan = select(&s);
    assert_eq!(plan.strategy, Strategy::GenericCyclicPrecompute);

    let formula = describe(&s, &plan, &FastDivPlanner::new()).unwrap();
    assert_eq!(formula.step, StepRule::CycleTable { cycle: 3, unroll: 6, a_step: 8 });
}

#[test]
fn test_carry_mask_step_parameters() {
    let s = shape(6, 100, 8, 3);
    let plan = select(&s);
    assert_eq!(plan.strategy, Strategy::Pow2EasyRecompute);

    let formula = describe(&s, &plan, &FastDivPlanner::new()).unwrap();
    assert_eq!(formula.step, StepRule::CarryMask { shift: 3, mask: 7 });
}

#[test]
fn test_trivial_steps() {
    let planner = FastDivPlanner::new();

    let s = shape(16, 2, 4, 8);
    assert_eq!(describe(&s, &select(&s), &planner).unwrap().step, StepRule::None);

    let s = shape(9, 4, 3, 8);
    assert_eq!(describe(&s, &select(&s), &planner).unwrap().step, StepRule::AddToA { step: 3 });

    let s = shape(4, 1, 16, 8);
    assert_eq!(describe(&s, &select(&s), &planner).unwrap().step, StepRule::AddToB { step: 4 });

    let s = shape(6, 100, 24, 8);
    assert_eq!(describe(&s, &select(&s), &planner).unwrap().step, StepRule::ResetCycle { period: 4 });
}
