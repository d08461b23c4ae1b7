//! RuleResolver - First-match-wins evaluation of an ordered rule list

use crate::evaluator::MatcherEvaluator;
use shared::{ResolvedRoute, RouteEvent, RouteObserver, RoutingContext, RoutingRule, RuleEvaluation};
use std::sync::Arc;

/// Resolves an ordered rule list to the first matching rule
#[derive(Clone, Default)]
pub struct RuleResolver {
    evaluator: MatcherEvaluator,
    observer: Option<Arc<dyn RouteObserver>>,
    debug: bool,
}

impl std::fmt::Debug for RuleResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleResolver")
            .field("observer", &self.observer.is_some())
            .field("debug", &self.debug)
            .finish()
    }
}

impl RuleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an observer notified on every match
    pub fn with_observer(mut self, observer: Arc<dyn RouteObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Include per-rule evaluation results in observer events
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Scan `rules` in declaration order and return the first match.
    ///
    /// Rules after the first match are not evaluated. `None` means no rule
    /// matched, which callers treat as "use the base configuration".
    pub fn resolve(&self, rules: &[RoutingRule], context: &RoutingContext) -> Option<ResolvedRoute> {
        let mut trace = Vec::new();

        for (index, rule) in rules.iter().enumerate() {
            let matched = self.evaluator.evaluate(&rule.matcher, context);

            tracing::debug!(
                index,
                matcher = rule.matcher.type_name(),
                target = %rule.target_agent,
                matched,
                "evaluated routing rule"
            );

            if self.debug {
                trace.push(RuleEvaluation {
                    index,
                    matcher_type: rule.matcher.type_name().to_string(),
                    target_agent: rule.target_agent.clone(),
                    matched,
                });
            }

            if matched {
                self.notify(rule, context, trace);
                return Some(ResolvedRoute {
                    target_agent: rule.target_agent.clone(),
                    config_overrides: rule.config_overrides.clone(),
                });
            }
        }

        tracing::debug!(rules = rules.len(), "no routing rule matched");
        None
    }

    fn notify(&self, rule: &RoutingRule, context: &RoutingContext, trace: Vec<RuleEvaluation>) {
        let Some(observer) = &self.observer else {
            return;
        };

        observer.on_route(&RouteEvent {
            target_agent: rule.target_agent.clone(),
            matcher_type: rule.matcher.type_name().to_string(),
            matched_content: self.evaluator.summarize(&rule.matcher, context),
            config_overrides: rule.config_overrides.clone(),
            debug_trace: self.debug.then_some(trace),
        });
    }
}
