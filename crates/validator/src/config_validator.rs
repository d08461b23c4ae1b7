//! ConfigValidator - One-shot gate over a complete configuration

use crate::regex_heuristics::analyze_pattern;
use registry::DelegationGraph;
use shared::{
    AgentDefinition, Matcher, RouterConfig, ValidationError, ValidationResult, ValidationWarning,
    BUILTIN_AGENTS,
};
use std::collections::{BTreeSet, HashSet};

/// Validator options
#[derive(Debug, Clone)]
pub struct ValidatorOptions {
    /// Names that are valid targets without being declared
    pub builtin_agents: BTreeSet<String>,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            builtin_agents: BUILTIN_AGENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Runs the circular-dependency, reference and regex checks
#[derive(Debug, Clone, Default)]
pub struct ConfigValidator {
    options: ValidatorOptions,
}

impl ConfigValidator {
    pub fn new(options: ValidatorOptions) -> Self {
        Self { options }
    }

    /// Collect every error and warning in one pass. Warnings never affect validity.
    pub fn validate(&self, config: &RouterConfig) -> ValidationResult {
        let mut errors = self.check_circular_dependencies(config);
        errors.extend(self.check_references(config));
        let warnings = self.check_regex_performance(config);

        let result = ValidationResult::new(errors, warnings);
        tracing::debug!(
            agents = config.agents.len(),
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "validated configuration"
        );
        result
    }

    /// One error per unordered agent pair whose edge closes a cycle
    pub fn check_circular_dependencies(&self, config: &RouterConfig) -> Vec<ValidationError> {
        let graph = DelegationGraph::from_definitions(&config.agents);
        let max_depth = config.max_delegation_depth;
        let mut reported: HashSet<(&str, &str)> = HashSet::new();
        let mut errors = Vec::new();

        for (name, delegate) in graph.edges() {
            if !graph.reachable_within_cycle(delegate, name, max_depth) {
                continue;
            }

            let pair = if name <= delegate {
                (name, delegate)
            } else {
                (delegate, name)
            };
            if !reported.insert(pair) {
                continue;
            }

            let path = config
                .agents
                .get(name)
                .and_then(|def| edge_path(name, def, delegate))
                .unwrap_or_else(|| format!("agents.{}", name));

            errors.push(ValidationError::CircularDependency {
                path,
                agents: vec![name.to_string(), delegate.to_string()],
            });
        }

        errors
    }

    /// One error per reference that is neither built in nor declared
    pub fn check_references(&self, config: &RouterConfig) -> Vec<ValidationError> {
        let valid: BTreeSet<&str> = self
            .options
            .builtin_agents
            .iter()
            .chain(config.agents.keys())
            .map(String::as_str)
            .collect();

        let mut errors = Vec::new();

        for (name, def) in &config.agents {
            for (i, delegate) in def.delegates_to.iter().enumerate() {
                if !valid.contains(delegate.as_str()) {
                    errors.push(ValidationError::InvalidAgentReference {
                        path: format!("agents.{}.delegates_to[{}]", name, i),
                        reference: delegate.clone(),
                    });
                }
            }

            for (i, rule) in def.routing_rules.iter().enumerate() {
                if !valid.contains(rule.target_agent.as_str()) {
                    errors.push(ValidationError::InvalidAgentReference {
                        path: format!("agents.{}.routing_rules[{}].target_agent", name, i),
                        reference: rule.target_agent.clone(),
                    });
                }
            }
        }

        errors
    }

    /// Advisory findings for every regex matcher
    pub fn check_regex_performance(&self, config: &RouterConfig) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        for (name, def) in &config.agents {
            for (i, rule) in def.routing_rules.iter().enumerate() {
                let Matcher::Regex { pattern, flags } = &rule.matcher else {
                    continue;
                };

                let mut reasons = analyze_pattern(pattern);
                if routing::compile_pattern(pattern, flags.as_deref()).is_none() {
                    reasons.push("does not compile and will never match".to_string());
                }
                if reasons.is_empty() {
                    continue;
                }

                let path = format!("agents.{}.routing_rules[{}].matcher.pattern", name, i);
                tracing::warn!(path = %path, pattern = %pattern, "risky regex pattern");

                warnings.push(ValidationWarning::RegexPerformance {
                    path,
                    pattern: pattern.clone(),
                    reason: reasons.join("; "),
                });
            }
        }

        warnings
    }
}

/// Where `from -> to` is declared: the first `delegates_to` entry, else the first rule
fn edge_path(from: &str, def: &AgentDefinition, to: &str) -> Option<String> {
    if let Some(i) = def.delegates_to.iter().position(|d| d == to) {
        return Some(format!("agents.{}.delegates_to[{}]", from, i));
    }
    def.routing_rules
        .iter()
        .position(|r| r.target_agent == to)
        .map(|i| format!("agents.{}.routing_rules[{}].target_agent", from, i))
}
