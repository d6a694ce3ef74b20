//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tolerance::{CheckPolicy, Tolerance};

/// Settings shared by the surface builder and the distance engine.
///
/// Every field has a default, so a partial JSON document such as
/// `{"parallel": false}` is a valid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tolerance: Tolerance,
    /// Consistency check applied to surfaces synthesized by the builder.
    pub builder_check: CheckPolicy,
    /// Evaluate distance batches across surfaces with rayon.
    pub parallel: bool,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::default(),
            builder_check: CheckPolicy::DebugOnly,
            parallel: true,
        }
    }
}
