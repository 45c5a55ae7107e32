//! Core data models for the document analysis pipeline

use crate::config::ModelBinding;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

//
// ================= Agent =================
//

/// A persona configuration consumed by the task pipeline.
///
/// Built once at startup and never mutated. Tasks hold these behind `Arc`.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub role: String,
    /// Goal template; may contain a `{query}` placeholder.
    pub goal: String,
    pub backstory: String,
    pub model: ModelBinding,
    /// Maximum model-call attempts per task.
    pub max_iterations: u32,
    /// Request ceiling enforced by the pipeline's rate gate.
    pub max_requests_per_minute: u32,
    pub allow_delegation: bool,
    /// Raises per-task log detail.
    pub verbose: bool,
    /// When set, prior task outputs are included in this agent's prompt.
    pub memory: bool,
    /// Names of tools this agent may use, resolved against the registry.
    pub tool_names: Vec<String>,
}

impl AgentConfig {
    /// Render the goal template for a concrete query.
    pub fn render_goal(&self, query: &str) -> String {
        self.goal.replace("{query}", query)
    }
}

//
// ================= Task =================
//

/// Parameters substituted into task templates at dispatch time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskParams {
    pub file_path: String,
    pub query: String,
}

/// A single pipeline step: an instruction template bound to one agent.
///
/// The description stays a structured template until the pipeline renders
/// it at the point where text is actually sent to the model backend.
#[derive(Debug, Clone)]
pub struct TaskConfig {
    pub name: &'static str,
    /// Instruction template with `{file_path}` and `{query}` placeholders.
    pub description: String,
    pub expected_output: String,
    pub agent: Arc<AgentConfig>,
    /// Names of tools bound to this task, resolved against the registry.
    pub tool_names: Vec<String>,
    /// Always false here; tasks run strictly in declared order.
    pub async_execution: bool,
}

impl TaskConfig {
    /// Render the instruction template for a concrete invocation.
    pub fn render_description(&self, params: &TaskParams) -> String {
        self.description
            .replace("{file_path}", &params.file_path)
            .replace("{query}", &params.query)
    }
}

//
// ================= Reports =================
//

/// Record of one completed task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskReport {
    pub task_name: String,
    pub agent_role: String,
    pub output: String,
    pub execution_time_ms: u64,
    pub created_at: DateTime<Utc>,
}

/// Final result of a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub run_id: Uuid,
    pub file_path: String,
    pub query: String,
    /// Output of the last task in the pipeline.
    pub final_output: String,
    pub reports: Vec<TaskReport>,
    /// SHA-256 of the extracted document text.
    pub document_fingerprint: String,
    pub created_at: DateTime<Utc>,
    pub execution_time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ModelBinding, ModelProvider};

    fn test_agent() -> AgentConfig {
        AgentConfig {
            role: "Senior Financial Analyst".to_string(),
            goal: "Answer the query: {query}".to_string(),
            backstory: "An experienced analyst.".to_string(),
            model: ModelBinding {
                provider: ModelProvider::OpenAi,
                model: "gpt-3.5-turbo".to_string(),
                temperature: 0.7,
                api_key: String::new(),
            },
            max_iterations: 3,
            max_requests_per_minute: 10,
            allow_delegation: false,
            verbose: false,
            memory: true,
            tool_names: vec!["read_financial_document".to_string()],
        }
    }

    #[test]
    fn test_goal_rendering() {
        let agent = test_agent();
        let goal = agent.render_goal("What is the revenue trend?");
        assert_eq!(goal, "Answer the query: What is the revenue trend?");
    }

    #[test]
    fn test_description_rendering() {
        let task = TaskConfig {
            name: "analysis",
            description: "Analyze the document at {file_path} to answer: {query}".to_string(),
            expected_output: "An analysis.".to_string(),
            agent: Arc::new(test_agent()),
            tool_names: vec![],
            async_execution: false,
        };

        let rendered = task.render_description(&TaskParams {
            file_path: "report.pdf".to_string(),
            query: "What is the revenue trend?".to_string(),
        });

        assert!(rendered.contains("report.pdf"));
        assert!(rendered.contains("What is the revenue trend?"));
    }
}
