//! # Switchboard Engine
//!
//! One-way pipeline: parsed configuration -> validation gate -> registry -> resolution.

mod router;

pub use router::{Router, RouterOptions};

// Re-export dependencies
pub use registry::{AgentRegistry, DelegationGraph};
pub use routing::{MatcherEvaluator, RouteLog, RuleResolver, TracingObserver};
pub use shared::{
    AgentConfig, AgentDefinition, ConfigLoader, RoutingContext, RouterConfig, SwitchboardError,
    ValidationResult,
};
pub use validator::{ConfigValidator, ValidatorOptions};
