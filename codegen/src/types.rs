//! Types for plan emission.

/// A rendered kernel ready for compilation.
#[derive(Debug, Clone)]
pub struct RenderedKernel {
    /// The generated source text.
    pub code: String,

    /// Entry point function name.
    pub entry_point: String,

    /// Kernel name (for debugging/caching).
    pub name: String,
}

impl RenderedKernel {
    pub fn new(code: String, entry_point: String, name: String) -> Self {
        Self { code, entry_point, name }
    }
}
