//! Sequential task pipeline
//!
//! Runs the four tasks in their declared order. For each task: render the
//! instruction template, gather bound tool output, compose the agent
//! prompt (with prior task outputs when the agent has memory) and call
//! the model backend. Tool failures stay inline in the prompt text;
//! model failures abort the run.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use chrono::Utc;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::AnalyzerError;
use crate::llm::CompletionModel;
use crate::models::{AgentConfig, AnalysisResult, TaskConfig, TaskParams, TaskReport};
use crate::tools::document::DOCUMENT_READER_TOOL;
use crate::tools::ToolRegistry;
use crate::Result;

/// Character cap on the document excerpt included in a prompt.
const MAX_DOCUMENT_CHARS: usize = 12_000;

const RATE_WINDOW: Duration = Duration::from_secs(60);

/// Runs the declared tasks strictly in order against one model backend.
pub struct Pipeline {
    model: Box<dyn CompletionModel>,
    registry: ToolRegistry,
    tasks: Vec<TaskConfig>,
    rate_gate: RateGate,
}

impl Pipeline {
    pub fn new(model: Box<dyn CompletionModel>, registry: ToolRegistry, tasks: Vec<TaskConfig>) -> Self {
        Self {
            model,
            registry,
            tasks,
            rate_gate: RateGate::new(),
        }
    }

    /// Run the full pipeline for one document + query pair.
    pub async fn run(&self, params: TaskParams) -> Result<AnalysisResult> {
        let start_time = Instant::now();
        let run_id = Uuid::new_v4();

        info!(
            %run_id,
            file_path = %params.file_path,
            query = %params.query,
            "Pipeline: starting run"
        );

        let mut reports: Vec<TaskReport> = Vec::with_capacity(self.tasks.len());
        let mut document_fingerprint = String::new();

        for task in &self.tasks {
            let task_start = Instant::now();
            let agent = &task.agent;

            if agent.verbose {
                info!(
                    task = task.name,
                    agent = %agent.role,
                    allow_delegation = agent.allow_delegation,
                    "Task starting"
                );
            } else {
                debug!(task = task.name, agent = %agent.role, "Task starting");
            }

            let mut tool_sections = Vec::with_capacity(task.tool_names.len());
            for tool_name in &task.tool_names {
                let tool = self
                    .registry
                    .get(tool_name)
                    .ok_or_else(|| AnalyzerError::ToolNotFound(tool_name.clone()))?;

                let output = tool.run(&params.file_path).await;
                if tool_name == DOCUMENT_READER_TOOL && document_fingerprint.is_empty() {
                    document_fingerprint = fingerprint(&output);
                }
                tool_sections.push(output);
            }

            let prompt = compose_prompt(task, &params, &tool_sections, &reports);
            let system = compose_system_instruction(agent, &params.query);

            let output = self.call_with_retries(task, &system, &prompt).await?;

            reports.push(TaskReport {
                task_name: task.name.to_string(),
                agent_role: agent.role.clone(),
                output,
                execution_time_ms: task_start.elapsed().as_millis() as u64,
                created_at: Utc::now(),
            });
        }

        let final_output = reports
            .last()
            .map(|r| r.output.clone())
            .unwrap_or_default();

        info!(%run_id, tasks = reports.len(), "Pipeline: run complete");

        Ok(AnalysisResult {
            run_id,
            file_path: params.file_path,
            query: params.query,
            final_output,
            reports,
            document_fingerprint,
            created_at: Utc::now(),
            execution_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    async fn call_with_retries(
        &self,
        task: &TaskConfig,
        system: &str,
        prompt: &str,
    ) -> Result<String> {
        let agent = &task.agent;
        let attempts = agent.max_iterations.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            self.rate_gate
                .admit(&agent.role, agent.max_requests_per_minute)
                .await;

            match self.model.complete(system, prompt).await {
                Ok(text) if !text.trim().is_empty() => {
                    debug!(task = task.name, attempt, "Task completed");
                    return Ok(text);
                }
                Ok(_) => {
                    warn!(task = task.name, attempt, "Empty model response");
                    last_error = Some(AnalyzerError::LlmError(
                        "Empty model response".to_string(),
                    ));
                }
                Err(e) => {
                    warn!(task = task.name, attempt, error = %e, "Model call failed");
                    last_error = Some(e);
                }
            }
        }

        let reason = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempts made".to_string());
        Err(AnalyzerError::TaskError(format!(
            "{} failed after {} attempts: {}",
            task.name, attempts, reason
        )))
    }
}

fn compose_system_instruction(agent: &AgentConfig, query: &str) -> String {
    format!(
        "You are {}.\n\nGoal: {}\n\nBackstory: {}",
        agent.role,
        agent.render_goal(query),
        agent.backstory
    )
}

fn compose_prompt(
    task: &TaskConfig,
    params: &TaskParams,
    tool_sections: &[String],
    prior_reports: &[TaskReport],
) -> String {
    let mut prompt = task.render_description(params);

    prompt.push_str("\n\nExpected output: ");
    prompt.push_str(&task.expected_output);

    for section in tool_sections {
        let excerpt = clamp_chars(section, MAX_DOCUMENT_CHARS);
        prompt.push_str("\n\nFinancial document content:\n");
        prompt.push_str(excerpt);
        if excerpt.len() < section.len() {
            prompt.push_str("\n[document truncated]");
        }
    }

    if task.agent.memory && !prior_reports.is_empty() {
        prompt.push_str("\n\nContext from previous tasks:");
        for report in prior_reports {
            prompt.push_str(&format!(
                "\n\n## {} ({})\n{}",
                report.task_name, report.agent_role, report.output
            ));
        }
    }

    prompt
}

/// Clamp a string to at most `max` characters, on a char boundary.
fn clamp_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((cut, _)) => &s[..cut],
        None => s,
    }
}

/// SHA-256 of the extracted document text, for the run record.
fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

//
// ================= Rate Gate =================
//

/// Per-agent sliding-window request ceiling.
struct RateGate {
    windows: Mutex<HashMap<String, VecDeque<tokio::time::Instant>>>,
}

impl RateGate {
    fn new() -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Wait until another request for `key` fits under `max_per_minute`.
    /// A ceiling of zero disables the gate.
    async fn admit(&self, key: &str, max_per_minute: u32) {
        if max_per_minute == 0 {
            return;
        }

        loop {
            let wait = {
                let mut windows = self.windows.lock().await;
                let window = windows.entry(key.to_string()).or_default();
                let now = tokio::time::Instant::now();

                while window
                    .front()
                    .map_or(false, |t| now.duration_since(*t) >= RATE_WINDOW)
                {
                    window.pop_front();
                }

                if (window.len() as u32) < max_per_minute {
                    window.push_back(now);
                    None
                } else {
                    window
                        .front()
                        .map(|front| RATE_WINDOW.saturating_sub(now.duration_since(*front)))
                }
            };

            match wait {
                None => return,
                Some(delay) => tokio::time::sleep(delay).await,
            }
        }
    }
}
