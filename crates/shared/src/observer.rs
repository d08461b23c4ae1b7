//! Route observer interface

use crate::matcher::ConfigOverrides;
use serde::{Deserialize, Serialize};

/// Outcome of evaluating a single rule, recorded in debug mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEvaluation {
    /// Position of the rule in its agent's rule list
    pub index: usize,
    pub matcher_type: String,
    pub target_agent: String,
    pub matched: bool,
}

/// What an observer receives when a rule matched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEvent {
    pub target_agent: String,
    pub matcher_type: String,
    /// Human-readable description of what matched
    pub matched_content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_overrides: Option<ConfigOverrides>,
    /// Every evaluated rule, present only when debug mode is on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_trace: Option<Vec<RuleEvaluation>>,
}

/// Side-channel observer for routing decisions.
///
/// Observers are purely additive: resolution results never depend on them.
pub trait RouteObserver: Send + Sync {
    fn on_route(&self, event: &RouteEvent);
}
