//! Auxiliary text tools
//!
//! Two labelling helpers that pass through a bounded prefix of their
//! input. Registered as available capability; no task in the pipeline
//! binds them.

use super::Tool;

pub const INVESTMENT_TOOL: &str = "process_investment_data";
pub const RISK_TOOL: &str = "create_risk_assessment";

/// Character budget for the passed-through prefix.
const SNIPPET_CHARS: usize = 100;

/// Label the first `SNIPPET_CHARS` characters of `input`. Inputs within
/// the budget pass through whole, with no truncation marker.
fn label_snippet(label: &str, input: &str) -> String {
    match input.char_indices().nth(SNIPPET_CHARS) {
        Some((cut, _)) => format!("{}{}...", label, &input[..cut]),
        None => format!("{}{}", label, input),
    }
}

pub struct InvestmentTool;

#[async_trait::async_trait]
impl Tool for InvestmentTool {
    fn name(&self) -> &'static str {
        INVESTMENT_TOOL
    }

    fn description(&self) -> &'static str {
        "Analyze financial document data for investment insights"
    }

    async fn run(&self, input: &str) -> String {
        label_snippet("Processed investment data: ", input)
    }
}

pub struct RiskTool;

#[async_trait::async_trait]
impl Tool for RiskTool {
    fn name(&self) -> &'static str {
        RISK_TOOL
    }

    fn description(&self) -> &'static str {
        "Assess risks based on financial document data"
    }

    async fn run(&self, input: &str) -> String {
        label_snippet("Risk assessment based on data: ", input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_short_input_passes_through_whole() {
        let output = InvestmentTool.run("Revenue: $4.2B").await;
        assert_eq!(output, "Processed investment data: Revenue: $4.2B");
    }

    #[tokio::test]
    async fn test_empty_input_accepted() {
        let output = RiskTool.run("").await;
        assert_eq!(output, "Risk assessment based on data: ");
    }

    #[tokio::test]
    async fn test_long_input_keeps_first_hundred_chars() {
        let input = "x".repeat(250);
        let output = InvestmentTool.run(&input).await;

        assert_eq!(
            output,
            format!("Processed investment data: {}...", "x".repeat(100))
        );
    }

    #[tokio::test]
    async fn test_exactly_hundred_chars_not_truncated() {
        let input = "y".repeat(100);
        let output = RiskTool.run(&input).await;
        assert_eq!(output, format!("Risk assessment based on data: {}", input));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let input = "é".repeat(150);
        let output = label_snippet("label: ", &input);
        assert_eq!(output, format!("label: {}...", "é".repeat(100)));
    }
}
