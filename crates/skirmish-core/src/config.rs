//! Per-match configuration for the adjudicator.
//!
//! Defaults come from `constants`; a host can override any window or margin
//! when constructing the match context.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Tunable windows and margins, owned by the match context object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Kill-classification window (seconds, exclusive boundary).
    pub headshot_window: f64,
    /// Kill-steal disambiguation window (seconds).
    pub killsteal_window: f64,
    /// CPA prediction look-ahead horizon (seconds).
    pub cpa_horizon: f64,
    /// Time-to-CPA threshold for potential-collision checks (seconds).
    pub potential_window: f64,
    /// Multiple of `potential_window` after which a stale flag is cleared.
    pub potential_stale_factor: f64,
    /// Potential-collision separation margin (multiple of combined radii).
    pub potential_margin: f64,
    /// Contact-matching separation margin (multiple of combined radii).
    pub confirm_margin: f64,
    /// Delay between collision confirmation and part-loss settlement (seconds).
    pub settling_delay: f64,
    /// Mutual head-on approach-angle tolerance (degrees).
    pub head_on_tolerance_deg: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            headshot_window: HEADSHOT_WINDOW,
            killsteal_window: KILLSTEAL_WINDOW,
            cpa_horizon: CPA_HORIZON,
            potential_window: POTENTIAL_WINDOW,
            potential_stale_factor: POTENTIAL_STALE_FACTOR,
            potential_margin: POTENTIAL_MARGIN,
            confirm_margin: CONFIRM_MARGIN,
            settling_delay: SETTLING_DELAY,
            head_on_tolerance_deg: HEAD_ON_TOLERANCE_DEG,
        }
    }
}

impl MatchConfig {
    /// Seconds after which an un-retriggered potential collision is dropped.
    pub fn potential_stale_after(&self) -> f64 {
        self.potential_stale_factor * self.potential_window
    }
}
