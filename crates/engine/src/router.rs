//! Router - Configuration gate, registration and per-request resolution

use registry::AgentRegistry;
use routing::RuleResolver;
use shared::{
    AgentConfig, ConfigLoader, ResolvedRoute, Result, RouteObserver, RouterConfig, RoutingContext,
    SwitchboardError, ValidationResult, ValidationWarning,
};
use std::sync::Arc;
use validator::{ConfigValidator, ValidatorOptions};

/// Router options
#[derive(Clone, Default)]
pub struct RouterOptions {
    pub validator: ValidatorOptions,
    pub observer: Option<Arc<dyn RouteObserver>>,
    /// Pass per-rule evaluation traces to the observer
    pub debug: bool,
}

impl RouterOptions {
    pub fn with_observer(mut self, observer: Arc<dyn RouteObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_validator(mut self, validator: ValidatorOptions) -> Self {
        self.validator = validator;
        self
    }
}

/// A validated, fully registered set of agents
#[derive(Debug)]
pub struct Router {
    registry: AgentRegistry,
    warnings: Vec<ValidationWarning>,
}

impl Router {
    /// Schema checks plus the whole-configuration validator, in one result
    pub fn validate(config: &RouterConfig, options: &ValidatorOptions) -> ValidationResult {
        let validator = ConfigValidator::new(options.clone());
        config.check_schema().merge(validator.validate(config))
    }

    /// Validate `config` and register every agent.
    ///
    /// A configuration with any error is rejected as a whole and no router is built.
    pub fn from_config(config: &RouterConfig, options: RouterOptions) -> Result<Self> {
        let result = Self::validate(config, &options.validator);
        if !result.valid {
            tracing::warn!(errors = result.errors.len(), "configuration rejected");
            return Err(SwitchboardError::Rejected(result));
        }

        for warning in &result.warnings {
            tracing::warn!(path = %warning.path(), "{}", warning);
        }

        let resolver = RuleResolver::new().with_debug(options.debug);
        let resolver = match options.observer {
            Some(observer) => resolver.with_observer(observer),
            None => resolver,
        };

        let mut registry =
            AgentRegistry::with_max_depth(config.max_delegation_depth).with_resolver(resolver);
        for (name, definition) in &config.agents {
            registry.register(name.as_str(), definition.clone())?;
        }

        tracing::info!(
            agents = registry.len(),
            warnings = result.warnings.len(),
            max_depth = config.max_delegation_depth,
            "configuration accepted"
        );

        Ok(Self {
            registry,
            warnings: result.warnings,
        })
    }

    /// Load user and project sources, then build as [`Router::from_config`]
    pub fn load(loader: &ConfigLoader, options: RouterOptions) -> Result<Self> {
        let config = loader.load()?;
        Self::from_config(&config, options)
    }

    /// Final configuration for `agent` given this request
    pub fn resolve(&self, agent: &str, context: &RoutingContext) -> Result<AgentConfig> {
        Ok(self.registry.resolve(agent, context)?)
    }

    /// Matched route and final configuration from one pass over `agent`'s rules
    pub fn resolve_with_route(
        &self,
        agent: &str,
        context: &RoutingContext,
    ) -> Result<(Option<ResolvedRoute>, AgentConfig)> {
        Ok(self.registry.resolve_with_route(agent, context)?)
    }

    /// Matched route for `agent`, `None` when no rule matched
    pub fn route(&self, agent: &str, context: &RoutingContext) -> Result<Option<ResolvedRoute>> {
        Ok(self.registry.route(agent, context)?)
    }

    /// Advisory warnings from the accepted configuration
    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    pub fn agent_names(&self) -> Vec<&str> {
        self.registry.names()
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }
}
