//! Chat execution command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tokio::sync::mpsc;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{AgentSelector, ChatRequest, ChatResponse, Config, StreamEvent};
use crate::domain::ports::Workspace;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::providers::select_provider;
use crate::infrastructure::stores::{InMemoryStackStore, InMemoryWorkflowStore};
use crate::infrastructure::workspace::LocalWorkspace;
use crate::services::{yaml, Orchestrator, OrchestratorConfig};

const STREAM_CHANNEL_CAPACITY: usize = 64;

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// The message to execute
    pub message: String,

    /// Stack slug to route the message through
    #[arg(short, long, conflicts_with = "workflow_file")]
    pub stack: Option<String>,

    /// Workflow YAML file to execute instead of a stack
    #[arg(short, long)]
    pub workflow_file: Option<PathBuf>,

    /// Workspace directory to expose to agents
    #[arg(short = 'W', long)]
    pub workspace: Option<PathBuf>,

    /// Apply extracted file operations to the workspace
    #[arg(short, long, requires = "workspace")]
    pub apply: bool,

    /// Emit the response as a stream of JSON-line events
    #[arg(long)]
    pub stream: bool,
}

// ── Output structs ──────────────────────────────────────────────────────

#[derive(Debug, serde::Serialize)]
struct ChatOutput {
    #[serde(flatten)]
    response: ChatResponse,
}

impl CommandOutput for ChatOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.response.message.clone()];

        if let Some(agents) = &self.response.agents_used {
            lines.push(String::new());
            lines.push(format!("Agents: {}", agents.join(" -> ")));
        } else {
            lines.push(String::new());
            lines.push(format!("Agent: {}", self.response.agent));
        }

        if !self.response.artifacts.is_empty() {
            lines.push(format!(
                "Artifacts: {}",
                self.response
                    .artifacts
                    .iter()
                    .map(|op| op.path().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
        for result in &self.response.file_results {
            let status = if result.success { "applied" } else { "failed" };
            let mut line = format!("  {} — {}", result.path, status);
            if let Some(err) = &result.error {
                line.push_str(&format!(": {err}"));
            }
            lines.push(line);
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

// ── Command execution ───────────────────────────────────────────────────

pub async fn execute(args: ChatArgs, json_mode: bool) -> Result<()> {
    let config = ConfigLoader::load().context("Failed to load configuration")?;

    let provider = select_provider(&config)?;
    let workflow_store = Arc::new(InMemoryWorkflowStore::new());
    let stack_store = Arc::new(InMemoryStackStore::new());

    let selector = match &args.workflow_file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read workflow file {}", path.display()))?;
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "workflow".to_string());
            let workflow = yaml::from_yaml(&text, "local", &name)?;
            workflow_store.insert(workflow).await;
            AgentSelector::Workflow {
                id: "local".to_string(),
            }
        }
        None => match &args.stack {
            Some(slug) => AgentSelector::Stack { slug: slug.clone() },
            None => AgentSelector::default(),
        },
    };

    let workspace = build_workspace(args.workspace.as_deref(), &config).await?;

    let request = ChatRequest {
        message: args.message.clone(),
        selector,
        workspace_id: workspace.as_ref().map(|w| w.id().to_string()),
        apply_changes: args.apply,
    };

    let orchestrator = Orchestrator::new(
        provider,
        workflow_store,
        stack_store,
        OrchestratorConfig::from(&config),
    );

    if args.stream {
        stream_chat(&orchestrator, &request, workspace).await
    } else {
        let response = orchestrator.execute(&request, workspace).await?;
        output(&ChatOutput { response }, json_mode);
        Ok(())
    }
}

async fn build_workspace(
    path: Option<&std::path::Path>,
    config: &Config,
) -> Result<Option<Arc<dyn Workspace>>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let id = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workspace".to_string());
    let workspace = LocalWorkspace::new(id, path, config.workspaces.max_read_bytes);
    workspace.ensure_exists().await?;
    Ok(Some(Arc::new(workspace)))
}

/// Run the streaming variant, printing one JSON event per line.
async fn stream_chat(
    orchestrator: &Orchestrator,
    request: &ChatRequest,
    workspace: Option<Arc<dyn Workspace>>,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<StreamEvent>(STREAM_CHANNEL_CAPACITY);

    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let Ok(line) = serde_json::to_string(&event) {
                println!("{line}");
            }
        }
    });

    let outcome = orchestrator.execute_streaming(request, workspace, tx).await;

    // Channel is closed once the orchestrator drops its sender.
    printer.await.ok();
    outcome?;
    Ok(())
}
