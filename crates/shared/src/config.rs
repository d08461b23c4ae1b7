//! Configuration types and loading for Switchboard

use crate::agent::AgentDefinition;
use crate::error::{ConfigError, Result, SwitchboardError};
use crate::matcher::Matcher;
use crate::validation::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default bound for delegation cycle checks
pub const DEFAULT_MAX_DELEGATION_DEPTH: usize = 3;

/// Agent names that are always valid delegation targets
pub const BUILTIN_AGENTS: &[&str] = &["build", "plan", "general", "explore"];

const MAX_TEMPERATURE: f64 = 2.0;

fn default_max_delegation_depth() -> usize {
    DEFAULT_MAX_DELEGATION_DEPTH
}

/// Complete, parsed routing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Agents by unique name, iterated in name order
    #[serde(default)]
    pub agents: BTreeMap<String, AgentDefinition>,

    #[serde(default = "default_max_delegation_depth")]
    pub max_delegation_depth: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            agents: BTreeMap::new(),
            max_delegation_depth: DEFAULT_MAX_DELEGATION_DEPTH,
        }
    }
}

impl RouterConfig {
    pub fn with_agent(mut self, name: impl Into<String>, definition: AgentDefinition) -> Self {
        self.agents.insert(name.into(), definition);
        self
    }

    pub fn with_max_delegation_depth(mut self, depth: usize) -> Self {
        self.max_delegation_depth = depth;
        self
    }

    /// Load a single configuration file (JSON or YAML by extension)
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = ConfigFile::from_file(path)?;
        Ok(RouterConfig::default().overlay(file))
    }

    /// Apply a partial file on top of this configuration
    fn overlay(mut self, file: ConfigFile) -> Self {
        if let Some(depth) = file.max_delegation_depth {
            self.max_delegation_depth = depth;
        }
        // Whole-definition replacement by name, no deep merge
        self.agents.extend(file.agents);
        self
    }

    /// Structural checks the type system does not enforce
    pub fn check_schema(&self) -> ValidationResult {
        let mut errors = Vec::new();

        if self.max_delegation_depth == 0 {
            errors.push(schema_error("max_delegation_depth", "must be at least 1"));
        }

        for (name, agent) in &self.agents {
            let base = format!("agents.{}", name);

            if name.trim().is_empty() {
                errors.push(schema_error(&base, "agent name cannot be empty"));
            }

            if agent.base_model.trim().is_empty() {
                errors.push(schema_error(
                    &format!("{}.base_model", base),
                    "base_model cannot be empty",
                ));
            }

            if let Some(t) = agent.temperature {
                if !valid_temperature(t) {
                    errors.push(schema_error(
                        &format!("{}.temperature", base),
                        &format!("temperature {} is outside [0, {}]", t, MAX_TEMPERATURE),
                    ));
                }
            }

            for (i, delegate) in agent.delegates_to.iter().enumerate() {
                if delegate.trim().is_empty() {
                    errors.push(schema_error(
                        &format!("{}.delegates_to[{}]", base, i),
                        "agent reference cannot be empty",
                    ));
                }
            }

            for (i, rule) in agent.routing_rules.iter().enumerate() {
                let rule_path = format!("{}.routing_rules[{}]", base, i);

                if rule.target_agent.trim().is_empty() {
                    errors.push(schema_error(
                        &format!("{}.target_agent", rule_path),
                        "target_agent cannot be empty",
                    ));
                }

                if let Matcher::Keyword { keywords, .. } = &rule.matcher {
                    if keywords.is_empty() {
                        errors.push(schema_error(
                            &format!("{}.matcher.keywords", rule_path),
                            "keyword matcher needs at least one keyword",
                        ));
                    }
                }

                let temperature = rule.config_overrides.as_ref().and_then(|o| o.temperature);
                if let Some(t) = temperature {
                    if !valid_temperature(t) {
                        errors.push(schema_error(
                            &format!("{}.config_overrides.temperature", rule_path),
                            &format!("temperature {} is outside [0, {}]", t, MAX_TEMPERATURE),
                        ));
                    }
                }
            }
        }

        ValidationResult::new(errors, Vec::new())
    }
}

fn valid_temperature(t: f64) -> bool {
    (0.0..=MAX_TEMPERATURE).contains(&t)
}

fn schema_error(path: &str, message: &str) -> ValidationError {
    ValidationError::SchemaValidation {
        path: path.to_string(),
        message: message.to_string(),
    }
}

/// One configuration source; every field optional so sources can be layered
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    agents: BTreeMap<String, AgentDefinition>,

    #[serde(default)]
    max_delegation_depth: Option<usize>,
}

impl ConfigFile {
    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let parsed = match extension.as_deref() {
            Some("json") => serde_json::from_str(&content).map_err(|e| e.to_string()),
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                }
                .into())
            }
        };

        parsed.map_err(|message| {
            SwitchboardError::Rejected(ValidationResult::new(
                vec![schema_error(&path.display().to_string(), &message)],
                Vec::new(),
            ))
        })
    }
}

/// Loads and layers the user-level and project-level configuration files
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    user_file: Option<PathBuf>,
    project_file: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.user_file = Some(path.into());
        self
    }

    pub fn with_project_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_file = Some(path.into());
        self
    }

    /// Load both sources; the project source wins. Missing files are skipped.
    pub fn load(&self) -> Result<RouterConfig> {
        let mut config = RouterConfig::default();

        for path in [&self.user_file, &self.project_file].into_iter().flatten() {
            if !path.exists() {
                tracing::debug!(path = %path.display(), "configuration file not found, skipping");
                continue;
            }
            let file = ConfigFile::from_file(path)?;
            tracing::debug!(
                path = %path.display(),
                agents = file.agents.len(),
                "loaded configuration file"
            );
            config = config.overlay(file);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{ConfigOverrides, KeywordMode, RoutingRule};
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    // ============== Parsing Tests ==============

    #[test]
    fn test_config_parse_defaults() {
        let config: RouterConfig = serde_json::from_str("{}").unwrap();
        assert!(config.agents.is_empty());
        assert_eq!(config.max_delegation_depth, 3);
    }

    #[test]
    fn test_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "switchboard.yaml",
            r#"
max_delegation_depth: 5
agents:
  sisyphus:
    base_model: claude-opus
    delegates_to: [oracle]
    routing_rules:
      - matcher: { type: keyword, keywords: [debug], mode: all }
        target_agent: oracle
  oracle:
    base_model: gpt-5
"#,
        );

        let config = RouterConfig::from_file(&path).unwrap();
        assert_eq!(config.max_delegation_depth, 5);
        assert_eq!(config.agents.len(), 2);
        let rule = &config.agents["sisyphus"].routing_rules[0];
        assert!(matches!(
            rule.matcher,
            Matcher::Keyword { mode: KeywordMode::All, .. }
        ));
    }

    #[test]
    fn test_parse_failure_is_schema_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "bad.json",
            r#"{"agents": {"a": {"base_model": "m", "routing_rules": [{"matcher": {"type": "nope"}, "target_agent": "b"}]}}}"#,
        );

        match RouterConfig::from_file(&path) {
            Err(SwitchboardError::Rejected(result)) => {
                assert!(!result.valid);
                assert_eq!(result.errors.len(), 1);
                assert_eq!(result.errors[0].kind(), "schema_validation");
            }
            other => panic!("expected schema rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "config.toml", "agents = {}");
        assert!(matches!(
            RouterConfig::from_file(&path),
            Err(SwitchboardError::Config(ConfigError::UnsupportedFormat { .. }))
        ));
    }

    // ============== Loader Tests ==============

    #[test]
    fn test_project_overrides_user() {
        let dir = tempfile::tempdir().unwrap();
        let user = write_file(
            dir.path(),
            "user.json",
            r#"{"max_delegation_depth": 4, "agents": {
                "a": {"base_model": "user-model", "temperature": 0.5},
                "b": {"base_model": "only-user"}
            }}"#,
        );
        let project = write_file(
            dir.path(),
            "project.yaml",
            "agents:\n  a:\n    base_model: project-model\n",
        );

        let config = ConfigLoader::new()
            .with_user_file(&user)
            .with_project_file(&project)
            .load()
            .unwrap();

        assert_eq!(config.max_delegation_depth, 4);
        assert_eq!(config.agents["a"].base_model, "project-model");
        // Replacement is whole-definition: user temperature is gone
        assert_eq!(config.agents["a"].temperature, None);
        assert_eq!(config.agents["b"].base_model, "only-user");
    }

    #[test]
    fn test_missing_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::new()
            .with_user_file(dir.path().join("missing.json"))
            .load()
            .unwrap();
        assert_eq!(config, RouterConfig::default());
    }

    // ============== Schema Tests ==============

    #[test]
    fn test_schema_accepts_empty_config() {
        assert!(RouterConfig::default().check_schema().valid);
    }

    #[test]
    fn test_schema_errors_are_path_qualified() {
        let mut agent = AgentDefinition::new("").with_temperature(3.0);
        agent.routing_rules.push(RoutingRule::new(
            Matcher::Keyword {
                keywords: Vec::new(),
                mode: KeywordMode::Any,
            },
            "",
        ));
        agent.routing_rules.push(
            RoutingRule::new(Matcher::Always, "b").with_overrides(ConfigOverrides {
                temperature: Some(-1.0),
                ..Default::default()
            }),
        );

        let config = RouterConfig::default()
            .with_max_delegation_depth(0)
            .with_agent("a", agent);
        let result = config.check_schema();

        let paths: Vec<_> = result.errors.iter().map(|e| e.path()).collect();
        assert_eq!(
            paths,
            vec![
                "max_delegation_depth",
                "agents.a.base_model",
                "agents.a.temperature",
                "agents.a.routing_rules[0].target_agent",
                "agents.a.routing_rules[0].matcher.keywords",
                "agents.a.routing_rules[1].config_overrides.temperature",
            ]
        );
        assert!(!result.valid);
    }
}
