//! Matcher and routing rule types

use serde::{Deserialize, Serialize};

/// How a keyword matcher combines its keywords
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordMode {
    /// At least one keyword must appear
    #[default]
    Any,
    /// Every keyword must appear
    All,
}

/// Complexity threshold levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
}

impl ComplexityLevel {
    /// Minimum score required to reach this level (inclusive)
    pub fn threshold(&self) -> u32 {
        match self {
            ComplexityLevel::Low => 2,
            ComplexityLevel::Medium => 5,
            ComplexityLevel::High => 10,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityLevel::Low => "low",
            ComplexityLevel::Medium => "medium",
            ComplexityLevel::High => "high",
        }
    }
}

/// Declarative predicate over a routing context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Matcher {
    /// Substring match on the lower-cased prompt
    Keyword {
        keywords: Vec<String>,
        #[serde(default)]
        mode: KeywordMode,
    },

    /// Heuristic prompt complexity score
    Complexity { threshold: ComplexityLevel },

    /// Regular expression test against the prompt
    Regex {
        pattern: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        flags: Option<String>,
    },

    /// Project file / dependency presence
    ProjectContext {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        has_files: Option<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        has_deps: Option<Vec<String>>,
    },

    /// Constant true, used as a terminal fallback rule
    Always,
}

impl Matcher {
    /// Tag name as written in configuration files
    pub fn type_name(&self) -> &'static str {
        match self {
            Matcher::Keyword { .. } => "keyword",
            Matcher::Complexity { .. } => "complexity",
            Matcher::Regex { .. } => "regex",
            Matcher::ProjectContext { .. } => "project_context",
            Matcher::Always => "always",
        }
    }
}

/// Per-route configuration overrides. Each present field replaces the base value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

/// One ordered routing rule: matcher, target and optional overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingRule {
    pub matcher: Matcher,

    pub target_agent: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_overrides: Option<ConfigOverrides>,
}

impl RoutingRule {
    /// Create a rule without overrides
    pub fn new(matcher: Matcher, target_agent: impl Into<String>) -> Self {
        Self {
            matcher,
            target_agent: target_agent.into(),
            config_overrides: None,
        }
    }

    /// Attach overrides to the rule
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.config_overrides = Some(overrides);
        self
    }
}
