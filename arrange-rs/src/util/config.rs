use serde::{Deserialize, Serialize};

use crate::arrange::Alignment;

/// Configuration of an arrangement run, forwarded to the placement solver
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ArrangeConfig {
    /// Search effort of the solver, between 0.0 and 1.0
    pub accuracy: f64,
    /// Whether the solver may evaluate candidate placements in parallel
    pub parallel: bool,
    /// Post-processing of the pile on each bed. Forced to [`Alignment::DontAlign`] when fixed items are present
    #[serde(default)]
    pub alignment: Alignment,
}

impl Default for ArrangeConfig {
    fn default() -> Self {
        Self {
            accuracy: 0.65,
            parallel: true,
            alignment: Alignment::Center,
        }
    }
}
