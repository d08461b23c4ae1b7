//! # Switchboard Shared
//!
//! Common types and interfaces used across all Switchboard crates.

pub mod agent;
pub mod config;
pub mod error;
pub mod matcher;
pub mod observer;
pub mod validation;

// Re-exports
pub use agent::*;
pub use config::*;
pub use error::*;
pub use matcher::*;
pub use observer::*;
pub use validation::*;
