// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `layenv show` command.

use clap::Args;
use colored::Colorize;
use miette::{IntoDiagnostic, Result};
use serde_json::json;

/// Display the composed environment
#[derive(Debug, Args)]
pub struct CmdShow {
    #[clap(flatten)]
    layers: crate::LayerFlags,

    /// Show loaded files
    #[clap(long)]
    files: bool,

    /// Show the composed model
    #[clap(long)]
    model: bool,

    /// Output format: table, yaml, json
    #[clap(long, default_value = "table")]
    format: String,
}

impl CmdShow {
    pub fn run(&mut self) -> Result<i32> {
        let (loaded, composed) = self.layers.compose()?;

        let show_files = self.files || !self.model;
        let show_model = self.model || !self.files;

        match self.format.as_str() {
            "yaml" => {
                let yaml = serde_yaml::to_string(&summary(&composed)).into_diagnostic()?;
                print!("{yaml}");
            }
            "json" => {
                let json = serde_json::to_string_pretty(&summary(&composed)).into_diagnostic()?;
                println!("{json}");
            }
            _ => {
                if show_files {
                    self.show_files_table(&loaded);
                }
                if show_files && show_model {
                    println!();
                }
                if show_model {
                    self.show_model_table(&composed.environment);
                }
            }
        }

        Ok(0)
    }

    fn show_files_table(&self, loaded: &layenv::LoadedLayers) {
        println!("{}", "Loaded Files:".bold());
        println!();

        let base_files = loaded.base.source_files();
        for (i, path) in loaded.source_files().iter().enumerate() {
            let marker = if i == 0 {
                " [base]"
            } else if i < base_files.len() {
                " [import]"
            } else {
                " [customization]"
            };
            println!("  {}. {}{}", i + 1, path.display().to_string().cyan(), marker.yellow());
        }

        println!();
        println!("Total: {} file(s)", loaded.source_files().len());
    }

    fn show_model_table(&self, env: &layenv::Environment) {
        println!("{} {}", "Environment:".bold(), env.qualified_name().to_string().green());
        if let Some(description) = &env.description {
            println!("  {}", description.dimmed());
        }

        println!();
        println!("{}", "Components:".bold());
        if env.platform.components.is_empty() {
            println!("  {}", "(no components)".dimmed());
        }
        for component in env.platform.components.iter() {
            let git_ref = component
                .repository
                .git_ref
                .as_deref()
                .map(|r| format!(" @ {r}"))
                .unwrap_or_default();
            println!(
                "  {} {}{}",
                component.id.cyan(),
                component.resolved_url(env),
                git_ref.dimmed()
            );
        }

        println!();
        println!("{}", "Distribution:".bold());
        match env.platform.distribution.component.id() {
            Some(id) => println!("  component: {}", id.cyan()),
            None => println!("  {}", "(not set)".dimmed()),
        }
        if let Some(id) = env.platform.orchestrator.id() {
            println!("  orchestrator: {}", id.cyan());
        }

        println!();
        println!("{}", "Providers:".bold());
        if env.providers.is_empty() {
            println!("  {}", "(no providers)".dimmed());
        }
        for provider in env.providers.iter() {
            let component = provider.component.id().unwrap_or("-");
            println!("  {} -> {}", provider.name.cyan(), component);
            for (key, value) in provider.parameters.iter() {
                println!("    {} = {}", key, display_value(value).green());
            }
        }

        println!();
        println!("{}", "Node Sets:".bold());
        if env.node_sets.is_empty() {
            println!("  {}", "(no node sets)".dimmed());
        }
        for node_set in env.node_sets.iter() {
            let provider = node_set.provider.name.as_deref().unwrap_or("-");
            println!(
                "  {} x{} on {}",
                node_set.name.cyan(),
                node_set.instances.to_string().yellow(),
                provider
            );
        }

        println!();
        println!("Total: {} instance(s)", env.node_sets.instance_count());
    }
}

fn display_value(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Build a serializable view of the composed environment.
fn summary(composed: &layenv::ComposedEnvironment) -> serde_json::Value {
    let env = &composed.environment;

    let components: serde_json::Map<_, _> = env
        .platform
        .components
        .iter()
        .map(|c| {
            let value = json!({
                "repository": c.resolved_url(env),
                "ref": c.repository.git_ref,
            });
            (c.id.clone(), value)
        })
        .collect();

    let providers: serde_json::Map<_, _> = env
        .providers
        .iter()
        .map(|p| {
            let value = json!({
                "component": p.component.id(),
                "params": p.parameters,
                "env": p.env_vars,
                "proxy": p.proxy,
            });
            (p.name.clone(), value)
        })
        .collect();

    let nodes: serde_json::Map<_, _> = env
        .node_sets
        .iter()
        .map(|n| {
            let value = json!({
                "instances": n.instances,
                "provider": n.provider.name,
            });
            (n.name.clone(), value)
        })
        .collect();

    json!({
        "name": env.name,
        "qualifier": env.qualifier,
        "description": env.description,
        "files": composed
            .source_files
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>(),
        "platform": {
            "base": env.platform.base.repository,
            "orchestrator": env.platform.orchestrator.id(),
            "distribution": {
                "component": env.platform.distribution.component.id(),
                "params": env.platform.distribution.parameters,
                "env": env.platform.distribution.env_vars,
            },
            "components": components,
        },
        "providers": providers,
        "nodes": nodes,
    })
}

#[cfg(test)]
#[path = "./cmd_show_test.rs"]
mod cmd_show_test;
