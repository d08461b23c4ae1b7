//! switchboard route command

use super::check::{print_report, ConfigArgs};
use clap::Args;
use console::style;
use engine::{Router, RouterOptions, RoutingContext, TracingObserver};
use shared::SwitchboardError;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct RouteCommand {
    /// Agent whose rules are evaluated
    pub agent: String,

    /// Request text
    pub prompt: String,

    /// Project file present in the workspace (repeatable)
    #[arg(long = "file")]
    pub files: Vec<String>,

    /// Project dependency name (repeatable)
    #[arg(long = "dep")]
    pub deps: Vec<String>,

    /// Log every rule evaluation
    #[arg(long)]
    pub debug: bool,

    /// Print the resolved configuration as JSON
    #[arg(long)]
    pub json: bool,
}

impl RouteCommand {
    pub fn context(&self) -> RoutingContext {
        RoutingContext::new(self.prompt.clone())
            .with_files(self.files.clone())
            .with_deps(self.deps.clone())
    }

    pub fn run(&self, config: &ConfigArgs) -> anyhow::Result<()> {
        let options = RouterOptions::default()
            .with_observer(Arc::new(TracingObserver))
            .with_debug(self.debug);

        let router = match Router::load(&config.loader(), options) {
            Ok(router) => router,
            Err(SwitchboardError::Rejected(result)) => {
                print_report(&result);
                anyhow::bail!("configuration rejected");
            }
            Err(e) => return Err(e.into()),
        };

        let context = self.context();
        let (route, resolved) = router.resolve_with_route(&self.agent, &context)?;

        if self.json {
            let output = serde_json::json!({
                "agent": self.agent,
                "route": route,
                "config": resolved,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        match &route {
            Some(route) => println!(
                "{} {} -> {}",
                style("routed").green(),
                self.agent,
                style(&route.target_agent).bold()
            ),
            None => println!("{} no rule matched, using base configuration", style("fallback").yellow()),
        }
        println!("  model:       {}", resolved.model);
        if let Some(t) = resolved.temperature {
            println!("  temperature: {}", t);
        }
        if let Some(variant) = &resolved.variant {
            println!("  variant:     {}", variant);
        }
        if let Some(prompt) = &resolved.prompt {
            println!("  prompt:      {}", prompt);
        }

        Ok(())
    }
}
