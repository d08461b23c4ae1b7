//! Validation result types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal configuration problem. Any one of these rejects the whole configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("{path}: circular delegation between {}", agents.join(" -> "))]
    CircularDependency { path: String, agents: Vec<String> },

    #[error("{path}: unknown agent '{reference}'")]
    InvalidAgentReference { path: String, reference: String },

    #[error("{path}: {message}")]
    SchemaValidation { path: String, message: String },
}

impl ValidationError {
    pub fn path(&self) -> &str {
        match self {
            ValidationError::CircularDependency { path, .. }
            | ValidationError::InvalidAgentReference { path, .. }
            | ValidationError::SchemaValidation { path, .. } => path,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::CircularDependency { .. } => "circular_dependency",
            ValidationError::InvalidAgentReference { .. } => "invalid_agent_reference",
            ValidationError::SchemaValidation { .. } => "schema_validation",
        }
    }
}

/// Advisory finding. Never affects validity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValidationWarning {
    RegexPerformance {
        path: String,
        pattern: String,
        reason: String,
    },
}

impl ValidationWarning {
    pub fn path(&self) -> &str {
        match self {
            ValidationWarning::RegexPerformance { path, .. } => path,
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationWarning::RegexPerformance { path, pattern, reason } => {
                write!(f, "{}: pattern /{}/ {}", path, pattern, reason)
            }
        }
    }
}

/// Aggregated outcome of one validation pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Build a result; validity is derived from the error list alone.
    pub fn new(errors: Vec<ValidationError>, warnings: Vec<ValidationWarning>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Merge another pass into this one (e.g. schema checks + graph checks)
    pub fn merge(mut self, other: ValidationResult) -> Self {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.valid = self.errors.is_empty();
        self
    }

    /// Multi-line, path-qualified report: errors first, then warnings
    pub fn format_report(&self) -> String {
        let mut lines = Vec::new();

        if self.valid {
            lines.push("Configuration is valid".to_string());
        } else {
            lines.push(format!(
                "Configuration validation failed with {} error(s):",
                self.errors.len()
            ));
            for error in &self.errors {
                lines.push(format!("  - [{}] {}", error.kind(), error));
            }
        }

        if !self.warnings.is_empty() {
            lines.push(format!("{} warning(s):", self.warnings.len()));
            for warning in &self.warnings {
                lines.push(format!("  - [regex_performance] {}", warning));
            }
        }

        lines.join("\n")
    }
}
