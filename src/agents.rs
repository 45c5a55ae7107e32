//! Agent persona definitions
//!
//! Four personas, built once at startup from the selected model binding
//! and shared behind `Arc` by the task definitions.

use std::sync::Arc;

use crate::config::ModelBinding;
use crate::models::AgentConfig;
use crate::tools::document::DOCUMENT_READER_TOOL;

const MAX_ITERATIONS: u32 = 3;
const MAX_REQUESTS_PER_MINUTE: u32 = 10;

/// The full persona set used by the pipeline.
pub struct Agents {
    pub verifier: Arc<AgentConfig>,
    pub financial_analyst: Arc<AgentConfig>,
    pub investment_advisor: Arc<AgentConfig>,
    pub risk_assessor: Arc<AgentConfig>,
}

pub fn create_agents(model: &ModelBinding) -> Agents {
    let reader_tools = vec![DOCUMENT_READER_TOOL.to_string()];

    let verifier = Arc::new(AgentConfig {
        role: "Financial Document Verifier".to_string(),
        goal: "Verify the authenticity and relevance of the uploaded document.".to_string(),
        backstory: "You are a meticulous document verifier. \
            Your job is to ensure that the document provided is indeed a financial report \
            and contains relevant information. \
            You check for key financial indicators and document structure."
            .to_string(),
        model: model.clone(),
        max_iterations: MAX_ITERATIONS,
        max_requests_per_minute: MAX_REQUESTS_PER_MINUTE,
        allow_delegation: true,
        verbose: true,
        memory: true,
        tool_names: reader_tools.clone(),
    });

    let financial_analyst = Arc::new(AgentConfig {
        role: "Senior Financial Analyst".to_string(),
        goal: "Analyze financial documents and provide accurate investment insights \
            based on query: {query}"
            .to_string(),
        backstory: "You are an experienced financial analyst with a strong background \
            in market analysis and investment strategies. \
            You always base your recommendations on data and facts from the document. \
            You verify your findings and provide a balanced view of risks and opportunities."
            .to_string(),
        model: model.clone(),
        max_iterations: MAX_ITERATIONS,
        max_requests_per_minute: MAX_REQUESTS_PER_MINUTE,
        allow_delegation: true,
        verbose: true,
        memory: true,
        tool_names: reader_tools.clone(),
    });

    let investment_advisor = Arc::new(AgentConfig {
        role: "Senior Investment Advisor".to_string(),
        goal: "Provide sound investment advice based on verified financial analysis.".to_string(),
        backstory: "You are a certified financial planner with over 15 years of experience. \
            You always prioritize the client's financial data and risk tolerance. \
            You recommend diversified portfolios and evidence-based investment strategies."
            .to_string(),
        model: model.clone(),
        max_iterations: MAX_ITERATIONS,
        max_requests_per_minute: MAX_REQUESTS_PER_MINUTE,
        allow_delegation: false,
        verbose: true,
        memory: true,
        tool_names: reader_tools.clone(),
    });

    let risk_assessor = Arc::new(AgentConfig {
        role: "Risk Assessment Specialist".to_string(),
        goal: "Identify and evaluate potential risks associated with the investment.".to_string(),
        backstory: "You are a risk assessment expert with a focus on financial markets. \
            You analyze market volatility, regulatory changes, and company-specific risks. \
            You provide a comprehensive risk profile to ensure informed decision-making."
            .to_string(),
        model: model.clone(),
        max_iterations: MAX_ITERATIONS,
        max_requests_per_minute: MAX_REQUESTS_PER_MINUTE,
        allow_delegation: false,
        verbose: true,
        memory: true,
        tool_names: reader_tools,
    });

    Agents {
        verifier,
        financial_analyst,
        investment_advisor,
        risk_assessor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelBinding;

    #[test]
    fn test_personas_share_the_reader_tool() {
        let agents = create_agents(&ModelBinding::select(None, None));

        for agent in [
            &agents.verifier,
            &agents.financial_analyst,
            &agents.investment_advisor,
            &agents.risk_assessor,
        ] {
            assert_eq!(agent.tool_names, vec![DOCUMENT_READER_TOOL.to_string()]);
            assert_eq!(agent.max_iterations, 3);
            assert_eq!(agent.max_requests_per_minute, 10);
        }
    }

    #[test]
    fn test_delegation_flags() {
        let agents = create_agents(&ModelBinding::select(None, None));

        assert!(agents.verifier.allow_delegation);
        assert!(agents.financial_analyst.allow_delegation);
        assert!(!agents.investment_advisor.allow_delegation);
        assert!(!agents.risk_assessor.allow_delegation);
    }

    #[test]
    fn test_analyst_goal_carries_query_placeholder() {
        let agents = create_agents(&ModelBinding::select(None, None));
        assert!(agents.financial_analyst.goal.contains("{query}"));
    }
}
