//! Tool trait and registry
//!
//! Tools are stateless capabilities an agent may invoke during a task:
//! one string in, one string out. Failures are reported inline in the
//! output string so the calling agent can reason about them in natural
//! language instead of the pipeline crashing.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::AppConfig;

pub mod analysis;
pub mod document;
pub mod search;

pub use analysis::{InvestmentTool, RiskTool};
pub use document::DocumentReaderTool;
pub use search::{SerperSearchTool, StubSearchTool};

/// Trait for a single tool
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    async fn run(&self, input: &str) -> String;
}

/// Tool registry for looking up tools by name
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn list(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the default registry: the shared document reader, the search
/// capability (real provider when a key is configured, stub otherwise)
/// and the two auxiliary text tools.
pub fn create_default_registry(config: &AppConfig) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(Arc::new(DocumentReaderTool));
    registry.register(search::create_search_tool(config.serper_api_key.clone()));
    registry.register(Arc::new(InvestmentTool));
    registry.register(Arc::new(RiskTool));

    registry
}
