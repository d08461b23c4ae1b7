//! # Switchboard Routing
//!
//! Per-request routing for Switchboard.
//!
//! ## Components
//!
//! - `MatcherEvaluator` - Evaluates one matcher against a request context
//! - `RuleResolver` - First-match-wins scan over an ordered rule list
//! - `RouteLog` / `TracingObserver` - Route observers

pub mod evaluator;
pub mod resolver;
pub mod route_log;

pub use evaluator::{complexity_score, compile_pattern, MatcherEvaluator, TECHNICAL_KEYWORDS};
pub use resolver::RuleResolver;
pub use route_log::{RouteEntry, RouteLog, RouteStats, TracingObserver};
