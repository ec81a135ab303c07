//! Core traits for plan emission.

use weft_plan::KernelFormula;

use crate::{RenderedKernel, Result};

/// Backend-agnostic emission interface.
///
/// Implementers turn a resolved [`KernelFormula`] into source text in their
/// target language. The formula already carries every constant the backend
/// needs (steps, shifts, masks, fast-division plans); renderers add no
/// decisions of their own.
pub trait Renderer {
    /// Render `formula` into a compilable kernel.
    ///
    /// # Arguments
    ///
    /// * `formula` - The resolved induction formulas for one shape
    /// * `name` - Optional kernel name (used as the emitted function name)
    fn render(&self, formula: &KernelFormula, name: Option<&str>) -> Result<RenderedKernel>;

    /// Get the backend name (e.g., "c").
    fn backend_name(&self) -> &str;
}
