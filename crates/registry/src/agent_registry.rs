//! AgentRegistry - Agent definitions, live cycle refusal and resolution

use crate::delegation_graph::DelegationGraph;
use routing::RuleResolver;
use shared::{
    AgentConfig, AgentDefinition, AgentNotFoundError, CircularDelegationError, RegistryError,
    ResolvedRoute, RoutingContext, DEFAULT_MAX_DELEGATION_DEPTH,
};
use std::collections::BTreeMap;

/// Owns the name -> definition map and the live delegation graph
#[derive(Debug)]
pub struct AgentRegistry {
    agents: BTreeMap<String, AgentDefinition>,
    graph: DelegationGraph,
    resolver: RuleResolver,
    max_depth: usize,
}

impl AgentRegistry {
    /// Create a registry with the default depth bound
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DELEGATION_DEPTH)
    }

    /// Create a registry whose cycle checks all use `max_depth`
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            agents: BTreeMap::new(),
            graph: DelegationGraph::new(),
            resolver: RuleResolver::new(),
            max_depth,
        }
    }

    /// Replace the resolver (e.g. to attach an observer)
    pub fn with_resolver(mut self, resolver: RuleResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Insert or replace `name`.
    ///
    /// Refused, with no state change, if any declared edge would close a
    /// delegation cycle within the depth bound.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        definition: AgentDefinition,
    ) -> Result<(), RegistryError> {
        let name = name.into();

        let mut candidate = self.graph.clone();
        candidate.remove_agent(&name);
        candidate.add_definition(&name, &definition);

        for to in candidate.delegates_of(&name) {
            if candidate.reachable_within_cycle(to, &name, self.max_depth) {
                tracing::warn!(agent = %name, delegate = %to, "refused registration: delegation cycle");
                return Err(CircularDelegationError {
                    from: name.clone(),
                    to: to.to_string(),
                    max_depth: self.max_depth,
                }
                .into());
            }
        }

        tracing::debug!(
            agent = %name,
            rules = definition.routing_rules.len(),
            delegates = definition.delegates_to.len(),
            "registered agent"
        );

        self.graph = candidate;
        self.agents.insert(name, definition);
        Ok(())
    }

    /// Replace an existing definition; fails if `name` is not registered
    pub fn update(
        &mut self,
        name: &str,
        definition: AgentDefinition,
    ) -> Result<(), RegistryError> {
        if !self.agents.contains_key(name) {
            return Err(self.not_found(name).into());
        }
        self.register(name, definition)
    }

    /// Run `name`'s rules against `context` and return the matched route, if any
    pub fn route(
        &self,
        name: &str,
        context: &RoutingContext,
    ) -> Result<Option<ResolvedRoute>, AgentNotFoundError> {
        let definition = self.get(name).ok_or_else(|| self.not_found(name))?;
        Ok(self.resolver.resolve(&definition.routing_rules, context))
    }

    /// Final configuration for `name`: base fields with the matched rule's
    /// overrides on top, or the base fields unchanged when nothing matched.
    pub fn resolve(
        &self,
        name: &str,
        context: &RoutingContext,
    ) -> Result<AgentConfig, AgentNotFoundError> {
        self.resolve_with_route(name, context).map(|(_, config)| config)
    }

    /// The matched route and the final configuration from a single pass over
    /// `name`'s rules, so observers see one event per request.
    pub fn resolve_with_route(
        &self,
        name: &str,
        context: &RoutingContext,
    ) -> Result<(Option<ResolvedRoute>, AgentConfig), AgentNotFoundError> {
        let definition = self.get(name).ok_or_else(|| self.not_found(name))?;
        let base = definition.base_config();

        let route = self.resolver.resolve(&definition.routing_rules, context);
        let config = match route.as_ref().and_then(|r| r.config_overrides.as_ref()) {
            Some(overrides) => base.apply(overrides),
            None => base,
        };

        Ok((route, config))
    }

    /// The shared cycle test, bounded by this registry's depth
    pub fn check_circular(&self, from: &str, target: &str) -> bool {
        self.graph.reachable_within_cycle(from, target, self.max_depth)
    }

    /// The cycle test with an explicit bound
    pub fn check_circular_within(&self, from: &str, target: &str, max_depth: usize) -> bool {
        self.graph.reachable_within_cycle(from, target, max_depth)
    }

    pub fn get(&self, name: &str) -> Option<&AgentDefinition> {
        self.agents.get(name)
    }

    pub fn has_agent(&self, name: &str) -> bool {
        self.agents.contains_key(name)
    }

    /// Registered names in order
    pub fn names(&self) -> Vec<&str> {
        self.agents.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn graph(&self) -> &DelegationGraph {
        &self.graph
    }

    fn not_found(&self, name: &str) -> AgentNotFoundError {
        AgentNotFoundError {
            name: name.to_string(),
            available: self.agents.keys().cloned().collect(),
        }
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
