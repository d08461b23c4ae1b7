//! Agent definition and resolution types

use crate::matcher::{ConfigOverrides, RoutingRule};
use serde::{Deserialize, Serialize};

/// A named handler with a base configuration and ordered routing rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDefinition {
    /// Model used when no override applies
    pub base_model: String,

    /// Agents this agent may hand a request to
    #[serde(default)]
    pub delegates_to: Vec<String>,

    /// Evaluated in declaration order, first match wins
    #[serde(default)]
    pub routing_rules: Vec<RoutingRule>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<String>,

    /// Display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl AgentDefinition {
    /// Create a definition with only a base model
    pub fn new(base_model: impl Into<String>) -> Self {
        Self {
            base_model: base_model.into(),
            delegates_to: Vec::new(),
            routing_rules: Vec::new(),
            temperature: None,
            prompt_template: None,
            description: None,
            color: None,
        }
    }

    pub fn with_delegates<I, S>(mut self, delegates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.delegates_to = delegates.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_rule(mut self, rule: RoutingRule) -> Self {
        self.routing_rules.push(rule);
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_prompt_template(mut self, prompt: impl Into<String>) -> Self {
        self.prompt_template = Some(prompt.into());
        self
    }

    /// Every agent this definition may hand off to: `delegates_to` first,
    /// then rule targets, in declaration order (duplicates kept).
    pub fn delegation_targets(&self) -> impl Iterator<Item = &str> {
        self.delegates_to
            .iter()
            .map(String::as_str)
            .chain(self.routing_rules.iter().map(|r| r.target_agent.as_str()))
    }

    /// Base configuration with no overrides applied
    pub fn base_config(&self) -> AgentConfig {
        AgentConfig {
            model: self.base_model.clone(),
            temperature: self.temperature,
            prompt: self.prompt_template.clone(),
            variant: None,
        }
    }
}

/// Final configuration handed to the host after resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

impl AgentConfig {
    /// Apply overrides field by field; present values replace, absent values keep.
    pub fn apply(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(model) = &overrides.model {
            self.model = model.clone();
        }
        if let Some(temperature) = overrides.temperature {
            self.temperature = Some(temperature);
        }
        if let Some(prompt) = &overrides.prompt {
            self.prompt = Some(prompt.clone());
        }
        if let Some(variant) = &overrides.variant {
            self.variant = Some(variant.clone());
        }
        self
    }
}

/// Per-request input to resolution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingContext {
    pub prompt: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_files: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_deps: Option<Vec<String>>,
}

impl RoutingContext {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            project_files: None,
            project_deps: None,
        }
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.project_files = Some(files.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_deps<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.project_deps = Some(deps.into_iter().map(Into::into).collect());
        self
    }
}

/// Output of rule resolution when a rule matched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRoute {
    pub target_agent: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_overrides: Option<ConfigOverrides>,
}
