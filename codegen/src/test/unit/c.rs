//! C renderer tests: rendered source must carry the plan's formulas.

use weft_plan::{FastDivPlanner, LoopShape, describe, select};

use crate::c::render;
use crate::error::Error;
use crate::traits::Renderer;

fn rendered(vl: u64, ii: u64, jj: u64, budget: u32, name: &str) -> String {
    let shape = LoopShape::new(vl, ii, jj, budget).unwrap();
    let formula = describe(&shape, &select(&shape), &FastDivPlanner::new()).unwrap();
    render(&formula, Some(name)).expect("C codegen failed").code
}

#[test]
fn test_driver_skeleton() {
    let code = rendered(8, 4, 8, 8, "fused_loop");
    assert!(code.contains("void fused_loop(weft_chunk_fn body, void* user)"), "missing entry point:\n{code}");
    assert!(code.contains("uint64_t a[8];"), "missing index vectors:\n{code}");
    assert!(code.contains("for (uint64_t chunk = 0; chunk < 4ull; ++chunk)"), "missing chunk loop:\n{code}");
    assert!(code.contains("body(a, b, width, user);"), "missing chunk callback:\n{code}");
}

#[test]
fn test_add_to_a_step() {
    // vl=9, jj=3: the update is a += 3 and b is never touched in the loop.
    let code = rendered(9, 4, 3, 8, "kernel");
    assert!(code.contains("a[k] += 3ull;"), "missing outer step:\n{code}");
    assert!(!code.contains("b[k] +="), "b must stay frozen:\n{code}");
}

#[test]
fn test_reset_cycle_step() {
    let code = rendered(6, 100, 24, 8, "kernel");
    assert!(code.contains("uint32_t pos = 0;"), "missing cycle counter:\n{code}");
    assert!(code.contains("pos = pos + 1 == 4u ? 0 : pos + 1;"), "missing cycle advance:\n{code}");
    assert!(code.contains("a[k] += 1; b[k] = k;"), "missing row reset:\n{code}");
    assert!(code.contains("b[k] += 6ull;"), "missing straight step:\n{code}");
}

#[test]
fn test_carry_mask_step() {
    let code = rendered(6, 100, 8, 3, "kernel");
    assert!(code.contains("a[k] += t >> 3;"), "missing carry shift:\n{code}");
    assert!(code.contains("b[k] = t & 7ull;"), "missing mask:\n{code}");
}

#[test]
fn test_divmod_step_uses_magic_constants() {
    let shape = LoopShape::new(256, 1000, 25, 8).unwrap();
    let planner = FastDivPlanner::new();
    let formula = describe(&shape, &select(&shape), &planner).unwrap();
    let div = planner.plan(25, Some(25 + 256)).unwrap();

    let code = render(&formula, None).unwrap().code;
    assert!(code.contains(&format!("* {}ull", div.multiplier)), "missing magic multiplier:\n{code}");
    assert!(code.contains(&format!(">> {}", div.shift)), "missing shift:\n{code}");
    assert!(code.contains("b[k] = t - q * 25ull;"), "missing modulo recovery:\n{code}");
}

#[test]
fn test_precompute_tables_are_emitted() {
    // nloop = 3 < budget: fully unrolled tables.
    let code = rendered(6, 2, 8, 8, "kernel");
    assert!(code.contains("static const uint64_t kernel_tab_a[3][6]"), "missing a table:\n{code}");
    assert!(code.contains("static const uint64_t kernel_tab_b[3][6]"), "missing b table:\n{code}");
    assert!(code.contains("a[k] = kernel_tab_a[chunk + 1][k];"), "missing table replay:\n{code}");

    // Cyclic: one cycle of entries plus the accumulated outer offset.
    let code = rendered(6, 100, 8, 8, "kernel");
    assert!(code.contains("static const uint64_t kernel_tab_a[4][6]"), "missing cycle table:\n{code}");
    assert!(code.contains("if (pos == 0) aoff += 3ull;"), "missing outer accumulation:\n{code}");
    assert!(code.contains("a[k] = kernel_tab_a[pos][k] + aoff;"), "missing cycle replay:\n{code}");
}

#[test]
fn test_lane_divmod_init() {
    let code = rendered(8, 20, 3, 1, "kernel");
    assert!(code.contains("b[k] = k - q * 3ull;"), "missing lane divmod init:\n{code}");
}

#[test]
fn test_default_name_and_validation() {
    let shape = LoopShape::new(8, 4, 8, 8).unwrap();
    let formula = describe(&shape, &select(&shape), &FastDivPlanner::new()).unwrap();

    let kernel = render(&formula, None).unwrap();
    assert_eq!(kernel.entry_point, "kernel");

    let err = render(&formula, Some("not a name")).unwrap_err();
    assert!(matches!(err, Error::InvalidKernelName { .. }));
}

#[test]
fn test_renderer_trait_surface() {
    let renderer = crate::c::CRenderer::new();
    assert_eq!(renderer.backend_name(), "c");

    let shape = LoopShape::new(9, 4, 3, 8).unwrap();
    let formula = describe(&shape, &select(&shape), &FastDivPlanner::new()).unwrap();
    let kernel = renderer.render(&formula, Some("by_trait")).unwrap();
    assert_eq!(kernel.name, "by_trait");
}
