//! # Switchboard Registry
//!
//! Live agent registry for Switchboard.
//!
//! ## Components
//!
//! - `DelegationGraph` - Hand-off edges and the depth-bounded cycle test
//! - `AgentRegistry` - Agent definitions, registration and resolution

pub mod agent_registry;
pub mod delegation_graph;

pub use agent_registry::AgentRegistry;
pub use delegation_graph::DelegationGraph;
