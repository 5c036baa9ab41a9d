use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::operators::DEFAULT_MAX_DEPTH;

/// Evaluation limits
///
/// Example:
/// ```json
/// {
///   "maxRangeLength": 100000,
///   "maxExpressionDepth": 64
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Largest array `$range` may produce; unbounded when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub max_range_length: Option<u64>,

    /// Deepest expression nesting accepted while compiling
    #[serde(default = "default_max_expression_depth")]
    #[validate(range(min = 1))]
    pub max_expression_depth: usize,
}

fn default_max_expression_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_range_length: None,
            max_expression_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
