//! Orchestrator: the execution core.
//!
//! Resolves a stack or workflow into a plan, runs each agent in order while
//! threading context between steps, extracts file operations from the
//! accumulated output, and assembles the final response or event stream.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::errors::{SwarmError, SwarmResult};
use crate::domain::models::{
    AgentSelector, AgentTurn, ChatRequest, ChatResponse, Config, FileApplyResult, FileOperation,
    StackConfig, StackRole, StreamEvent, WorkflowDefinition,
};
use crate::domain::ports::{
    CompletionProvider, CompletionRequest, StackStore, Workspace, WorkflowStore,
};
use crate::services::compiler::WorkflowCompiler;
use crate::services::extractor::extract_operations;
use crate::services::registry;
use crate::services::router::route_message;

/// Slug of the built-in stack used when the requested one is unknown.
const FALLBACK_STACK: &str = "speed-demon";

/// Sentinel returned when a workflow's output never diverged from its input.
const NO_OUTPUT_MESSAGE: &str = "Workflow completed with no output";

/// Tuning for one orchestrator instance.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub default_model: String,
    pub max_tokens: u32,
    /// Per-completion timeout; expiry is a provider failure.
    pub timeout_secs: u64,
    /// How many prior agent outputs each step sees.
    pub context_window: usize,
    /// Preview length per prior output, in characters.
    pub preview_chars: usize,
    /// Words per streamed chunk.
    pub chunk_words: usize,
    /// Pacing delay between streamed chunks (presentation only).
    pub chunk_delay_ms: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            default_model: "claude-3-5-sonnet-20241022".to_string(),
            max_tokens: 4096,
            timeout_secs: 120,
            context_window: 3,
            preview_chars: 500,
            chunk_words: 5,
            chunk_delay_ms: 50,
        }
    }
}

impl From<&Config> for OrchestratorConfig {
    fn from(config: &Config) -> Self {
        Self {
            default_model: config.providers.default_model.clone(),
            max_tokens: config.providers.max_tokens,
            timeout_secs: config.providers.timeout_secs,
            ..Self::default()
        }
    }
}

/// Orchestrates agent executions for chat requests.
pub struct Orchestrator {
    provider: Arc<dyn CompletionProvider>,
    workflow_store: Arc<dyn WorkflowStore>,
    stack_store: Arc<dyn StackStore>,
    compiler: WorkflowCompiler,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        workflow_store: Arc<dyn WorkflowStore>,
        stack_store: Arc<dyn StackStore>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            provider,
            workflow_store,
            stack_store,
            compiler: WorkflowCompiler::new(),
            config,
        }
    }

    /// Execute a chat request to completion and assemble the response.
    ///
    /// A provider failure aborts the remaining plan and fails the whole
    /// request; individual file-apply failures do not.
    pub async fn execute(
        &self,
        request: &ChatRequest,
        workspace: Option<Arc<dyn Workspace>>,
    ) -> SwarmResult<ChatResponse> {
        let run_id = Uuid::new_v4();
        info!(run_id = %run_id, provider = self.provider.name(), "executing chat request");

        let mut response = match &request.selector {
            AgentSelector::Workflow { id } => {
                let workflow = self
                    .workflow_store
                    .get(id)
                    .await?
                    .ok_or_else(|| SwarmError::WorkflowNotFound(id.clone()))?;
                self.run_workflow(&workflow, &request.message, workspace.as_deref())
                    .await?
            }
            AgentSelector::Stack { slug } => {
                let stack = self.load_stack(slug).await?;
                self.run_stack(&stack, &request.message, workspace.as_deref())
                    .await?
            }
        };

        if request.apply_changes {
            if let Some(ws) = workspace.as_deref() {
                response.file_results =
                    apply_file_operations(ws, &response.artifacts).await;
            }
        }

        Ok(response)
    }

    /// Execute the streaming variant: the single-agent stack-mode path with
    /// the completion text re-segmented into word-group chunks.
    ///
    /// Always emits exactly one terminal event. Emission stops early when
    /// the receiver is dropped; the in-flight provider call is not
    /// force-cancelled.
    pub async fn execute_streaming(
        &self,
        request: &ChatRequest,
        workspace: Option<Arc<dyn Workspace>>,
        tx: mpsc::Sender<StreamEvent>,
    ) -> SwarmResult<()> {
        let slug = match &request.selector {
            AgentSelector::Stack { slug } => slug.clone(),
            AgentSelector::Workflow { .. } => FALLBACK_STACK.to_string(),
        };

        let role = route_message(&request.message);
        let agent = role.agent_name().to_string();

        if tx
            .send(StreamEvent::Status {
                status: "processing".to_string(),
                agent: agent.clone(),
            })
            .await
            .is_err()
        {
            return Ok(());
        }

        let outcome = async {
            let stack = self.load_stack(&slug).await?;
            self.run_role(&stack, role, &request.message, workspace.as_deref())
                .await
        }
        .await;

        let output = match outcome {
            Ok(output) => output,
            Err(err) => {
                warn!(error = %err, agent = %agent, "streaming execution failed");
                let _ = tx
                    .send(StreamEvent::Error {
                        message: err.to_string(),
                    })
                    .await;
                return Err(err);
            }
        };

        // The text is fully generated first, then re-segmented for
        // progressive delivery.
        for chunk in chunk_words(&output, self.config.chunk_words) {
            if tx
                .send(StreamEvent::Chunk {
                    content: chunk,
                    agent: agent.clone(),
                })
                .await
                .is_err()
            {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(self.config.chunk_delay_ms)).await;
        }

        let operations = extract_operations(&output);
        let mut file_results = Vec::new();
        if request.apply_changes {
            if let Some(ws) = workspace.as_deref() {
                file_results = apply_file_operations(ws, &operations).await;
            }
        }

        for op in &operations {
            let kind = match op {
                FileOperation::Write { .. } => "write",
                FileOperation::Delete { .. } => "delete",
            };
            if tx
                .send(StreamEvent::FileOperation {
                    operation: kind.to_string(),
                    path: op.path().to_string(),
                    agent: agent.clone(),
                })
                .await
                .is_err()
            {
                return Ok(());
            }
        }

        let files_modified = if file_results.is_empty() {
            operations.iter().map(|op| op.path().to_string()).collect()
        } else {
            file_results
                .iter()
                .filter(|r| r.success)
                .map(|r| r.path.clone())
                .collect()
        };

        let _ = tx
            .send(StreamEvent::Complete {
                agent,
                files_modified,
            })
            .await;

        Ok(())
    }

    /// Stack mode: route the message to exactly one agent and run it.
    async fn run_stack(
        &self,
        stack: &StackConfig,
        message: &str,
        workspace: Option<&dyn Workspace>,
    ) -> SwarmResult<ChatResponse> {
        let role = route_message(message);
        info!(stack = %stack.slug, agent = %role, "routing stack-mode message");

        let output = self.run_role(stack, role, message, workspace).await?;
        let artifacts = extract_operations(&output);
        let files_modified = artifacts.iter().map(|op| op.path().to_string()).collect();

        Ok(ChatResponse {
            message: output,
            agent: role.agent_name().to_string(),
            workflow_id: None,
            workflow_name: None,
            agents_used: None,
            artifacts,
            files_modified,
            file_results: Vec::new(),
            status: "complete".to_string(),
        })
    }

    /// Workflow mode: compile the graph and run every agent in plan order,
    /// threading context between steps.
    ///
    /// Nodes with multiple predecessors receive the linearly threaded
    /// `current_input` (the last executed node's output), not a structured
    /// merge of their direct predecessors. Nodes with no edges at all
    /// receive exactly the original request text, never a prior output.
    async fn run_workflow(
        &self,
        workflow: &WorkflowDefinition,
        message: &str,
        workspace: Option<&dyn Workspace>,
    ) -> SwarmResult<ChatResponse> {
        let plan = self.compiler.compile(workflow)?;
        info!(
            workflow = %workflow.id,
            steps = plan.len(),
            "executing workflow plan"
        );

        let workspace_block = match workspace {
            Some(ws) => Some(workspace_context_block(ws).await?),
            None => None,
        };

        let connected: std::collections::HashSet<&str> = workflow
            .edges
            .iter()
            .flat_map(|e| [e.from.as_str(), e.to.as_str()])
            .collect();

        let mut turns: Vec<AgentTurn> = Vec::with_capacity(plan.len());
        let mut previews: Vec<String> = Vec::new();
        let mut artifacts: Vec<FileOperation> = Vec::new();
        let mut current_input = message.to_string();
        let mut last_agent = "Orchestrator".to_string();

        for node_id in &plan {
            // Plan ids come from the validated node set.
            let Some(node) = workflow.node(node_id) else {
                continue;
            };

            let persona = registry::persona_for_type(node.agent_type);
            let system_prompt = build_system_prompt(
                persona,
                node.system_prompt.as_deref(),
                workspace_block.as_deref(),
            );

            let input = if !connected.contains(node.id.as_str()) {
                // A node with no edges sees only the original request.
                message.to_string()
            } else if previews.is_empty() {
                current_input.clone()
            } else {
                let window: Vec<&str> = previews
                    .iter()
                    .rev()
                    .take(self.config.context_window)
                    .rev()
                    .map(String::as_str)
                    .collect();
                format!(
                    "{current_input}\n\n[Previous agent outputs:]\n{}",
                    window.join("\n---\n")
                )
            };

            let model = node
                .model
                .clone()
                .unwrap_or_else(|| workflow.global.default_model.clone());
            let temperature = node.temperature.unwrap_or(workflow.global.temperature);

            debug!(agent = %node.label, model = %model, "running workflow step");
            let output = self
                .complete_bounded(&system_prompt, &input, &model, temperature)
                .await?;

            artifacts.extend(extract_operations(&output));
            previews.push(format!(
                "[{}]: {}...",
                node.label,
                truncate_chars(&output, self.config.preview_chars)
            ));
            turns.push(AgentTurn {
                agent_id: node.id.clone(),
                agent_label: node.label.clone(),
                persona_prompt: persona.to_string(),
                input_text: input,
                output_text: output.clone(),
            });
            last_agent = node.label.clone();
            current_input = output;
        }

        let final_output = if current_input == message {
            NO_OUTPUT_MESSAGE.to_string()
        } else {
            current_input
        };

        let files_modified = artifacts.iter().map(|op| op.path().to_string()).collect();
        let agents_used = turns.iter().map(|t| t.agent_id.clone()).collect();

        Ok(ChatResponse {
            message: final_output,
            agent: last_agent,
            workflow_id: Some(workflow.id.clone()),
            workflow_name: Some(workflow.name.clone()),
            agents_used: Some(agents_used),
            artifacts,
            files_modified,
            file_results: Vec::new(),
            status: "complete".to_string(),
        })
    }

    /// Run one roster role against the provider.
    async fn run_role(
        &self,
        stack: &StackConfig,
        role: StackRole,
        message: &str,
        workspace: Option<&dyn Workspace>,
    ) -> SwarmResult<String> {
        let agent_config = stack.agent_config(role);
        let workspace_block = match workspace {
            Some(ws) => Some(workspace_context_block(ws).await?),
            None => None,
        };
        let system_prompt = build_system_prompt(
            registry::persona_prompt(role),
            agent_config.system_prompt.as_deref(),
            workspace_block.as_deref(),
        );

        self.complete_bounded(
            &system_prompt,
            message,
            &agent_config.model,
            agent_config.temperature,
        )
        .await
    }

    /// One provider call, bounded by the configured timeout.
    async fn complete_bounded(
        &self,
        system_prompt: &str,
        user_text: &str,
        model: &str,
        temperature: f64,
    ) -> SwarmResult<String> {
        let request = CompletionRequest::new(system_prompt, user_text)
            .with_model(model)
            .with_temperature(temperature)
            .with_max_tokens(self.config.max_tokens);

        match timeout(
            Duration::from_secs(self.config.timeout_secs),
            self.provider.complete(request),
        )
        .await
        {
            Ok(Ok(response)) => Ok(response.text),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(SwarmError::Timeout(self.config.timeout_secs)),
        }
    }

    /// Resolve a stack slug, falling back to the built-in default for
    /// unknown slugs.
    async fn load_stack(&self, slug: &str) -> SwarmResult<StackConfig> {
        if let Some(stack) = self.stack_store.get(slug).await? {
            return Ok(stack);
        }
        warn!(slug = %slug, fallback = FALLBACK_STACK, "unknown stack, using fallback");
        self.stack_store
            .get(FALLBACK_STACK)
            .await?
            .ok_or_else(|| SwarmError::StackNotFound(slug.to_string()))
    }
}

/// Apply extracted operations to a workspace, one by one.
///
/// Failures are captured per operation and never abort siblings.
pub async fn apply_file_operations(
    workspace: &dyn Workspace,
    operations: &[FileOperation],
) -> Vec<FileApplyResult> {
    let mut results = Vec::with_capacity(operations.len());
    for op in operations {
        let outcome = match op {
            FileOperation::Write { path, content } => workspace.write_file(path, content).await,
            FileOperation::Delete { path } => workspace.delete_file(path).await,
        };
        results.push(match outcome {
            Ok(()) => FileApplyResult {
                path: op.path().to_string(),
                success: true,
                error: None,
            },
            Err(err) => FileApplyResult {
                path: op.path().to_string(),
                success: false,
                error: Some(err.to_string()),
            },
        });
    }
    results
}

/// Assemble a system prompt: optional per-agent override first, then the
/// persona, then workspace context, then the file-path coda.
fn build_system_prompt(
    persona: &str,
    override_prompt: Option<&str>,
    workspace_block: Option<&str>,
) -> String {
    let mut prompt = String::new();
    if let Some(custom) = override_prompt {
        prompt.push_str(custom);
        prompt.push_str("\n\n");
    }
    prompt.push_str(persona);
    if let Some(block) = workspace_block {
        prompt.push_str(block);
    }
    prompt.push_str("\n\nWhen providing code, be specific about file paths and complete implementations.");
    prompt
}

/// Describe the bound workspace for agent prompts: kind, id, and a shallow
/// file-tree summary.
async fn workspace_context_block(workspace: &dyn Workspace) -> SwarmResult<String> {
    let mut block = format!(
        "\n\nYou have access to a workspace:\n- Type: {}\n- Workspace: {}",
        workspace.kind(),
        workspace.id()
    );

    let tree = workspace.list_files("", 2).await?;
    if !tree.is_empty() {
        let mut lines = Vec::new();
        format_tree_summary(&tree, 0, &mut lines);
        block.push_str("\n- Files:\n");
        block.push_str(&lines.join("\n"));
    }

    Ok(block)
}

/// Indented tree listing, capped at 20 entries per level and depth 2.
fn format_tree_summary(
    entries: &[crate::domain::ports::FileEntry],
    depth: usize,
    lines: &mut Vec<String>,
) {
    if depth > 2 {
        return;
    }
    for entry in entries.iter().take(20) {
        let indent = "  ".repeat(depth);
        if entry.is_dir {
            lines.push(format!("{indent}{}/", entry.name));
            format_tree_summary(&entry.children, depth + 1, lines);
        } else {
            lines.push(format!("{indent}{}", entry.name));
        }
    }
}

/// Split text into groups of `words_per_chunk` whitespace-separated words,
/// each chunk trailing one space, matching the presentation format of the
/// chunked stream.
fn chunk_words(text: &str, words_per_chunk: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(words_per_chunk.max(1))
        .map(|group| {
            let mut chunk = group.join(" ");
            chunk.push(' ');
            chunk
        })
        .collect()
}

/// Truncate to at most `max_chars` characters on a char boundary.
fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
