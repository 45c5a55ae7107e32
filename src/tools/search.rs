//! Web search capability
//!
//! Two variants behind the same tool name, selected once at startup:
//! a real Serper-backed provider when a key is configured, and a
//! deterministic stub otherwise. Neither task in the present pipeline
//! binds this tool; it is available capability only.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::Tool;

pub const SEARCH_TOOL: &str = "search_the_internet";

const SERPER_URL: &str = "https://google.serper.dev/search";
const MAX_RESULTS: usize = 5;

/// Select the search variant from the configured credential.
pub fn create_search_tool(serper_api_key: Option<String>) -> Arc<dyn Tool> {
    match serper_api_key {
        Some(key) => {
            info!("Search tool backend: serper");
            Arc::new(SerperSearchTool::new(key))
        }
        None => {
            info!("Search tool backend: stub");
            Arc::new(StubSearchTool)
        }
    }
}

pub struct SerperSearchTool {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SerperSearchTool {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url: SERPER_URL.to_string(),
        }
    }

    async fn search(&self, query: &str) -> Result<String, reqwest::Error> {
        let response = self
            .client
            .post(&self.base_url)
            .header("X-API-KEY", &self.api_key)
            .json(&json!({ "q": query }))
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        Ok(format_organic_results(&body, query))
    }
}

fn format_organic_results(body: &Value, query: &str) -> String {
    let results = body
        .get("organic")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .take(MAX_RESULTS)
                .filter_map(|r| {
                    let title = r.get("title").and_then(Value::as_str)?;
                    let snippet = r.get("snippet").and_then(Value::as_str).unwrap_or("");
                    let link = r.get("link").and_then(Value::as_str).unwrap_or("");
                    Some(format!("{}\n{}\n{}", title, snippet, link))
                })
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    if results.is_empty() {
        format!("No search results for: {}", query)
    } else {
        results.join("\n\n")
    }
}

#[async_trait::async_trait]
impl Tool for SerperSearchTool {
    fn name(&self) -> &'static str {
        SEARCH_TOOL
    }

    fn description(&self) -> &'static str {
        "Search the internet for financial news and market context"
    }

    async fn run(&self, input: &str) -> String {
        match self.search(input).await {
            Ok(results) => results,
            Err(e) => {
                warn!(query = %input, error = %e, "Search request failed");
                format!("Error performing search: {}", e)
            }
        }
    }
}

/// Deterministic fallback used when no search provider is configured.
pub struct StubSearchTool;

#[async_trait::async_trait]
impl Tool for StubSearchTool {
    fn name(&self) -> &'static str {
        SEARCH_TOOL
    }

    fn description(&self) -> &'static str {
        "Search the internet for financial news and market context"
    }

    async fn run(&self, input: &str) -> String {
        format!("Search results for: {} (SerperDevTool unavailable)", input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_output_is_exact() {
        let output = StubSearchTool.run("AAPL 10-K").await;
        assert_eq!(
            output,
            "Search results for: AAPL 10-K (SerperDevTool unavailable)"
        );
    }

    #[test]
    fn test_variant_selection() {
        let stub = create_search_tool(None);
        assert_eq!(stub.name(), SEARCH_TOOL);

        let real = create_search_tool(Some("key".to_string()));
        assert_eq!(real.name(), SEARCH_TOOL);
    }

    #[test]
    fn test_organic_result_formatting() {
        let body = json!({
            "organic": [
                { "title": "Apple 10-K", "snippet": "Annual report", "link": "https://example.com" },
            ]
        });

        let formatted = format_organic_results(&body, "AAPL 10-K");
        assert!(formatted.contains("Apple 10-K"));
        assert!(formatted.contains("Annual report"));
    }

    #[test]
    fn test_empty_results_message() {
        let formatted = format_organic_results(&json!({}), "AAPL 10-K");
        assert_eq!(formatted, "No search results for: AAPL 10-K");
    }
}
