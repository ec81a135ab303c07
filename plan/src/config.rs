//! Environment-driven planner configuration.
//!
//! # Environment Variables
//!
//! * `WEFT_NO_ALT=1` - Disable the alternate-width search
//! * `WEFT_ALT_FLOOR=N` - Lowest vector width the search may report

use crate::shape::LoopShape;
use crate::strategy::{UnrollPlan, search_alt, select};

/// Knobs for the one-call planning entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Whether to run the alternate-width search at all.
    pub search_alt: bool,
    /// Explicit search floor; `None` uses the default 90% of `vl`.
    pub alt_floor: Option<u64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self { search_alt: true, alt_floor: None }
    }
}

impl PlannerConfig {
    /// Read configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if std::env::var("WEFT_NO_ALT").is_ok() {
            config.search_alt = false;
        }
        if let Ok(floor_str) = std::env::var("WEFT_ALT_FLOOR")
            && let Ok(floor) = floor_str.parse::<u64>()
            && floor > 0
        {
            config.alt_floor = Some(floor);
        }
        config
    }

    /// Select a strategy and, when enabled, fill in the alternate-width
    /// report.
    pub fn plan(&self, shape: &LoopShape) -> UnrollPlan {
        let mut plan = select(shape);
        if self.search_alt {
            plan.alt_width = search_alt(shape, self.alt_floor);
        }
        plan
    }
}
