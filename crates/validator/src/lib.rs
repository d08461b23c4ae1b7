//! # Switchboard Validator
//!
//! Whole-configuration checks run once, before any agent is registered.
//!
//! ## Components
//!
//! - `ConfigValidator` - Circular delegation, reference and regex checks
//! - `regex_heuristics` - Advisory pattern analysis

pub mod config_validator;
pub mod regex_heuristics;

pub use config_validator::{ConfigValidator, ValidatorOptions};
pub use regex_heuristics::analyze_pattern;
