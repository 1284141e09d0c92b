//! Stack roster CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::{AgentType, StackRole};
use crate::domain::ports::StackStore;
use crate::infrastructure::stores::InMemoryStackStore;
use crate::services::registry;

#[derive(Args, Debug)]
pub struct StackArgs {
    #[command(subcommand)]
    pub command: StackCommands,
}

#[derive(Subcommand, Debug)]
pub enum StackCommands {
    /// List available stacks
    List,
    /// Show details of a specific stack
    Show {
        /// Stack slug (e.g. "speed-demon")
        slug: String,
    },
    /// List the workflow agent types and their roles
    Agents,
}

// ── Output structs ──────────────────────────────────────────────────────

#[derive(Debug, serde::Serialize)]
struct StackSummary {
    name: String,
    slug: String,
    description: String,
    default_model: String,
}

#[derive(Debug, serde::Serialize)]
struct StackListOutput {
    stacks: Vec<StackSummary>,
}

impl CommandOutput for StackListOutput {
    fn to_human(&self) -> String {
        let mut lines = vec!["Available stacks:".to_string()];
        for stack in &self.stacks {
            lines.push(format!(
                "  {} ({}) — {}",
                stack.slug,
                stack.default_model,
                truncate(&stack.description, 70)
            ));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
struct StackRoleDetail {
    role: String,
    model: String,
    temperature: f64,
}

#[derive(Debug, serde::Serialize)]
struct StackDetailOutput {
    name: String,
    slug: String,
    description: String,
    default_model: String,
    roles: Vec<StackRoleDetail>,
}

impl CommandOutput for StackDetailOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("Stack: {} ({})", self.name, self.slug),
            format!("Description: {}", self.description),
            format!("Default model: {}", self.default_model),
            format!("Roles ({}):", self.roles.len()),
        ];
        for role in &self.roles {
            lines.push(format!(
                "  {} — {} (temperature {})",
                role.role, role.model, role.temperature
            ));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
struct AgentCatalogEntry {
    id: String,
    name: String,
    description: String,
    role: String,
}

#[derive(Debug, serde::Serialize)]
struct AgentCatalogOutput {
    agent_types: Vec<AgentCatalogEntry>,
}

impl CommandOutput for AgentCatalogOutput {
    fn to_human(&self) -> String {
        let mut lines = vec!["Agent types:".to_string()];
        for entry in &self.agent_types {
            lines.push(format!(
                "  {} ({}) — {}",
                entry.id, entry.role, entry.description
            ));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

// ── Command execution ───────────────────────────────────────────────────

pub async fn execute(args: StackArgs, json_mode: bool) -> Result<()> {
    let store = InMemoryStackStore::new();
    match args.command {
        StackCommands::List => list_stacks(&store, json_mode).await,
        StackCommands::Show { slug } => show_stack(&store, &slug, json_mode).await,
        StackCommands::Agents => list_agent_types(json_mode),
    }
}

fn list_agent_types(json_mode: bool) -> Result<()> {
    let agent_types = registry::AGENT_TYPE_CATALOG
        .iter()
        .map(|info| {
            let role = AgentType::parse(info.id).stack_role();
            AgentCatalogEntry {
                id: info.id.to_string(),
                name: info.name.to_string(),
                description: info.description.to_string(),
                role: registry::display_name(role).to_string(),
            }
        })
        .collect();

    output(&AgentCatalogOutput { agent_types }, json_mode);
    Ok(())
}

async fn list_stacks(store: &InMemoryStackStore, json_mode: bool) -> Result<()> {
    let stacks = store.list().await?;
    let out = StackListOutput {
        stacks: stacks
            .into_iter()
            .map(|s| StackSummary {
                name: s.name,
                slug: s.slug,
                description: s.description,
                default_model: s.default_model,
            })
            .collect(),
    };
    output(&out, json_mode);
    Ok(())
}

async fn show_stack(store: &InMemoryStackStore, slug: &str, json_mode: bool) -> Result<()> {
    let stack = store
        .get(slug)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Stack '{}' not found", slug))?;

    let mut roles: Vec<StackRoleDetail> = stack
        .agents
        .iter()
        .map(|(role, cfg)| StackRoleDetail {
            role: role.agent_name().to_string(),
            model: cfg.model.clone(),
            temperature: cfg.temperature,
        })
        .collect();
    roles.sort_by(|a, b| a.role.cmp(&b.role));

    // Surface what an unlisted role would get.
    let fallback = stack.agent_config(StackRole::Custom);
    let out = StackDetailOutput {
        name: stack.name,
        slug: stack.slug,
        description: stack.description,
        default_model: fallback.model,
        roles,
    };
    output(&out, json_mode);
    Ok(())
}
