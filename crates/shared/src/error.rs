//! Error types for Switchboard

use crate::validation::ValidationResult;
use std::path::PathBuf;
use thiserror::Error;

/// Error returned when an agent is not registered
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Agent '{name}' not found. Available agents: {}", available.join(", "))]
pub struct AgentNotFoundError {
    pub name: String,
    pub available: Vec<String>,
}

/// Error returned when a registration would close a delegation cycle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Delegation '{from}' -> '{to}' would create a cycle (max depth {max_depth})")]
pub struct CircularDelegationError {
    pub from: String,
    pub to: String,
    pub max_depth: usize,
}

/// Errors raised by the agent registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error(transparent)]
    AgentNotFound(#[from] AgentNotFoundError),

    #[error(transparent)]
    CircularDelegation(#[from] CircularDelegationError),
}

/// Errors raised while reading configuration files
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported configuration format: {} (expected .json, .yaml or .yml)", path.display())]
    UnsupportedFormat { path: PathBuf },
}

/// General Switchboard error type
#[derive(Debug, Error)]
pub enum SwitchboardError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{}", .0.format_report())]
    Rejected(ValidationResult),
}

impl From<AgentNotFoundError> for SwitchboardError {
    fn from(err: AgentNotFoundError) -> Self {
        SwitchboardError::Registry(err.into())
    }
}

pub type Result<T> = std::result::Result<T, SwitchboardError>;
