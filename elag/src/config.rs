//! Tuning knobs shared by the automaton transforms and the product builder.
use serde::{Deserialize, Serialize};

/// Configuration of the automaton algebra.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlgebraConfig {
    /// Upper bound on label splits performed while refining the alphabet of
    /// one product state. `None` lets refinement run to its fixpoint.
    #[serde(default = "default_max_refinement_steps")]
    pub max_refinement_steps: Option<usize>,
    /// Whether complementation checks its input for determinism before
    /// touching it.
    #[serde(default = "default_verify_determinism")]
    pub verify_determinism: bool,
}

const fn default_max_refinement_steps() -> Option<usize> {
    Some(100_000)
}

const fn default_verify_determinism() -> bool {
    true
}

impl AlgebraConfig {
    /// The configuration used by the operations without a `_with_config` suffix.
    pub const fn default() -> AlgebraConfig {
        AlgebraConfig {
            max_refinement_steps: default_max_refinement_steps(),
            verify_determinism: default_verify_determinism(),
        }
    }

    /// Reads a configuration from JSON. Missing fields take their values
    /// from [`AlgebraConfig::default`]; an explicit `null` lifts the
    /// refinement cap.
    pub fn from_json_str(json: &str) -> Result<AlgebraConfig, serde_json::Error> {
        serde_json::from_str(json)
    }
}
