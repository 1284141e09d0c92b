//! Workflow definition CLI commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::WorkflowDefinition;
use crate::services::{yaml, WorkflowCompiler};

#[derive(Args, Debug)]
pub struct WorkflowArgs {
    #[command(subcommand)]
    pub command: WorkflowCommands,
}

#[derive(Subcommand, Debug)]
pub enum WorkflowCommands {
    /// Validate a workflow YAML file and report its execution order
    Validate {
        /// Workflow YAML file
        file: PathBuf,
    },
    /// Show the execution plan for a workflow YAML file
    Plan {
        /// Workflow YAML file
        file: PathBuf,
    },
    /// Re-emit a workflow YAML file in canonical form
    Export {
        /// Workflow YAML file
        file: PathBuf,
    },
}

// ── Output structs ──────────────────────────────────────────────────────

#[derive(Debug, serde::Serialize)]
struct ValidateOutput {
    name: String,
    agent_count: usize,
    edge_count: usize,
    valid: bool,
}

impl CommandOutput for ValidateOutput {
    fn to_human(&self) -> String {
        format!(
            "Workflow '{}' is valid: {} agents, {} connections",
            self.name, self.agent_count, self.edge_count
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
struct PlanStep {
    position: usize,
    id: String,
    label: String,
    agent_type: String,
}

#[derive(Debug, serde::Serialize)]
struct PlanOutput {
    name: String,
    steps: Vec<PlanStep>,
}

impl CommandOutput for PlanOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("Execution plan for '{}':", self.name)];
        for step in &self.steps {
            lines.push(format!(
                "  {}. {} ({}, {})",
                step.position, step.label, step.id, step.agent_type
            ));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

// ── Command execution ───────────────────────────────────────────────────

pub async fn execute(args: WorkflowArgs, json_mode: bool) -> Result<()> {
    match args.command {
        WorkflowCommands::Validate { file } => validate_workflow(&file, json_mode),
        WorkflowCommands::Plan { file } => plan_workflow(&file, json_mode),
        WorkflowCommands::Export { file } => export_workflow(&file),
    }
}

fn load_workflow(file: &Path) -> Result<WorkflowDefinition> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read workflow file {}", file.display()))?;
    let name = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workflow".to_string());
    Ok(yaml::from_yaml(&text, "local", &name)?)
}

fn validate_workflow(file: &Path, json_mode: bool) -> Result<()> {
    let workflow = load_workflow(file)?;
    // Compilation catches cycles that structural validation does not.
    WorkflowCompiler::new().compile(&workflow)?;

    let out = ValidateOutput {
        name: workflow.name.clone(),
        agent_count: workflow.nodes.len(),
        edge_count: workflow.edges.len(),
        valid: true,
    };
    output(&out, json_mode);
    Ok(())
}

fn plan_workflow(file: &Path, json_mode: bool) -> Result<()> {
    let workflow = load_workflow(file)?;
    let plan = WorkflowCompiler::new().compile(&workflow)?;

    let steps: Vec<PlanStep> = plan
        .order()
        .iter()
        .enumerate()
        .filter_map(|(i, id)| {
            workflow.node(id).map(|node| PlanStep {
                position: i + 1,
                id: node.id.clone(),
                label: node.label.clone(),
                agent_type: node.agent_type.as_str().to_string(),
            })
        })
        .collect();

    let out = PlanOutput {
        name: workflow.name.clone(),
        steps,
    };
    output(&out, json_mode);
    Ok(())
}

fn export_workflow(file: &Path) -> Result<()> {
    let workflow = load_workflow(file)?;
    print!("{}", yaml::to_yaml(&workflow)?);
    Ok(())
}
