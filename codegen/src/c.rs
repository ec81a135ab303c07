//! C source code generation for induction plans.
//!
//! Emits a self-contained driver function:
//!
//! ```c
//! void kernel(weft_chunk_fn body, void* user);
//! ```
//!
//! The driver materializes the `a[]`/`b[]` index vectors, walks every chunk of
//! the fused loop, invokes `body` with the live lane count, and applies the
//! plan's step rule between chunks. Precomputed chunk tables are emitted as
//! `static const` arrays next to the function.

use weft_plan::{FastDivPlan, InitRule, KernelFormula, LoopShape, StepRule};

use crate::error::{InvalidKernelNameSnafu, Result};
use crate::traits::Renderer;
use crate::types::RenderedKernel;

/// C source renderer for host-compiled loop drivers.
pub struct CRenderer;

impl CRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for CRenderer {
    fn render(&self, formula: &KernelFormula, name: Option<&str>) -> Result<RenderedKernel> {
        render(formula, name)
    }

    fn backend_name(&self) -> &str {
        "c"
    }
}

/// Render `formula` as C source.
pub fn render(formula: &KernelFormula, name: Option<&str>) -> Result<RenderedKernel> {
    let kernel_name = name.unwrap_or("kernel");
    if !is_c_identifier(kernel_name) {
        return InvalidKernelNameSnafu { name: kernel_name }.fail();
    }

    tracing::debug!(kernel = kernel_name, plan = %formula.plan, "c codegen");

    let shape = &formula.shape;
    let (vl, jj) = (shape.vl(), shape.jj());
    let (nloop, iijj) = (shape.nloop(), shape.iijj());

    let mut lines: Vec<String> = Vec::new();
    lines.push("#include <stdint.h>".into());
    lines.push(String::new());
    lines.push("typedef void (*weft_chunk_fn)(const uint64_t* a, const uint64_t* b, uint32_t width, void* user);".into());
    lines.push(String::new());

    // Precomputed chunk tables live next to the function.
    match formula.step {
        StepRule::UnrolledTable { unroll } => emit_tables(&mut lines, kernel_name, shape, unroll as u64),
        StepRule::CycleTable { cycle, .. } => emit_tables(&mut lines, kernel_name, shape, cycle as u64),
        _ => {}
    }

    lines.push(format!("void {kernel_name}(weft_chunk_fn body, void* user) {{"));
    lines.push(format!("    uint64_t a[{vl}];"));
    lines.push(format!("    uint64_t b[{vl}];"));

    match formula.init {
        InitRule::IotaIntoB => {
            lines.push(format!("    for (uint32_t k = 0; k < {vl}u; ++k) {{ a[k] = 0; b[k] = k; }}"));
        }
        InitRule::IotaIntoA => {
            lines.push(format!("    for (uint32_t k = 0; k < {vl}u; ++k) {{ a[k] = k; b[k] = 0; }}"));
        }
        InitRule::DivModOfLane { div } => {
            lines.push(format!("    for (uint32_t k = 0; k < {vl}u; ++k) {{"));
            lines.push(format!("        uint64_t q = {};", div_expr(&div, "(uint64_t)k")));
            lines.push("        a[k] = q;".into());
            lines.push(format!("        b[k] = k - q * {jj}ull;"));
            lines.push("    }".into());
        }
    }

    if matches!(formula.step, StepRule::ResetCycle { .. } | StepRule::CycleTable { .. }) {
        lines.push("    uint32_t pos = 0;".into());
    }
    if matches!(formula.step, StepRule::CycleTable { .. }) {
        lines.push("    uint64_t aoff = 0;".into());
    }

    lines.push(format!("    uint64_t remain = {iijj}ull;"));
    lines.push(format!("    for (uint64_t chunk = 0; chunk < {nloop}ull; ++chunk) {{"));
    lines.push(format!("        uint32_t width = remain < {vl}ull ? (uint32_t)remain : {vl}u;"));
    lines.push("        body(a, b, width, user);".into());
    lines.push("        remain -= width;".into());
    lines.push(format!("        if (chunk + 1 == {nloop}ull) break;"));

    match formula.step {
        StepRule::None => {}
        StepRule::AddToA { step } => {
            lines.push(format!("        for (uint32_t k = 0; k < {vl}u; ++k) a[k] += {step}ull;"));
        }
        StepRule::AddToB { step } => {
            lines.push(format!("        for (uint32_t k = 0; k < {vl}u; ++k) b[k] += {step}ull;"));
        }
        StepRule::ResetCycle { period } => {
            lines.push(format!("        pos = pos + 1 == {period}u ? 0 : pos + 1;"));
            lines.push("        if (pos == 0) {".into());
            lines.push(format!("            for (uint32_t k = 0; k < {vl}u; ++k) {{ a[k] += 1; b[k] = k; }}"));
            lines.push("        } else {".into());
            lines.push(format!("            for (uint32_t k = 0; k < {vl}u; ++k) b[k] += {vl}ull;"));
            lines.push("        }".into());
        }
        StepRule::CarryMask { shift, mask } => {
            lines.push(format!("        for (uint32_t k = 0; k < {vl}u; ++k) {{"));
            lines.push(format!("            uint64_t t = b[k] + {vl}ull;"));
            lines.push(format!("            a[k] += t >> {shift};"));
            lines.push(format!("            b[k] = t & {mask}ull;"));
            lines.push("        }".into());
        }
        StepRule::UnrolledTable { .. } => {
            lines.push(format!("        for (uint32_t k = 0; k < {vl}u; ++k) {{"));
            lines.push(format!("            a[k] = {kernel_name}_tab_a[chunk + 1][k];"));
            lines.push(format!("            b[k] = {kernel_name}_tab_b[chunk + 1][k];"));
            lines.push("        }".into());
        }
        StepRule::CycleTable { cycle, a_step, .. } => {
            lines.push(format!("        pos = pos + 1 == {cycle}u ? 0 : pos + 1;"));
            lines.push(format!("        if (pos == 0) aoff += {a_step}ull;"));
            lines.push(format!("        for (uint32_t k = 0; k < {vl}u; ++k) {{"));
            lines.push(format!("            a[k] = {kernel_name}_tab_a[pos][k] + aoff;"));
            lines.push(format!("            b[k] = {kernel_name}_tab_b[pos][k];"));
            lines.push("        }".into());
        }
        StepRule::DivMod { div } => {
            lines.push(format!("        for (uint32_t k = 0; k < {vl}u; ++k) {{"));
            lines.push(format!("            uint64_t t = b[k] + {vl}ull;"));
            lines.push(format!("            uint64_t q = {};", div_expr(&div, "t")));
            lines.push("            a[k] += q;".into());
            lines.push(format!("            b[k] = t - q * {jj}ull;"));
            lines.push("        }".into());
        }
    }

    lines.push("    }".into());
    lines.push("}".into());

    Ok(RenderedKernel::new(lines.join("\n"), kernel_name.to_string(), kernel_name.to_string()))
}

/// The quotient expression for a fast-division plan.
///
/// Powers of two are a bare shift; the multiply forms widen through
/// `unsigned __int128` so the 33-bit generic multipliers cannot overflow.
fn div_expr(div: &FastDivPlan, x: &str) -> String {
    if div.multiplier == 1 && div.addend == 0 {
        format!("({x} >> {})", div.shift)
    } else if div.addend == 0 {
        format!("(uint64_t)(((unsigned __int128){x} * {}ull) >> {})", div.multiplier, div.shift)
    } else {
        format!("(uint64_t)(((unsigned __int128){x} * {m}ull + {a}ull) >> {s})", m = div.multiplier, a = div.addend, s = div.shift)
    }
}

/// Emit the `a` and `b` precompute tables for the first `entries` chunks.
fn emit_tables(lines: &mut Vec<String>, kernel_name: &str, shape: &LoopShape, entries: u64) {
    let (vl, jj) = (shape.vl(), shape.jj());

    for (field, pick) in [("a", true), ("b", false)] {
        lines.push(format!("static const uint64_t {kernel_name}_tab_{field}[{entries}][{vl}] = {{"));
        for c in 0..entries {
            let row: Vec<String> = (0..vl)
                .map(|k| {
                    let lin = c * vl + k;
                    let value = if pick { lin / jj } else { lin % jj };
                    format!("{value}ull")
                })
                .collect();
            lines.push(format!("    {{{}}},", row.join(", ")));
        }
        lines.push("};".into());
        lines.push(String::new());
    }
}

fn is_c_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
