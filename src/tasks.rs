//! Task definitions
//!
//! The four instruction templates, each bound to one agent, in the order
//! the pipeline executes them: verification, analysis, investment advice,
//! risk assessment. Placeholders are substituted at dispatch time.

use crate::agents::Agents;
use crate::models::TaskConfig;
use crate::tools::document::DOCUMENT_READER_TOOL;

pub fn create_tasks(agents: &Agents) -> Vec<TaskConfig> {
    let reader_tools = vec![DOCUMENT_READER_TOOL.to_string()];

    let verification = TaskConfig {
        name: "verification",
        description: "Verify if the document at {file_path} is a valid financial report. \
            Steps:\n\
            1. Read the document using the financial document reader tool.\n\
            2. Check for key sections like balance sheet, income statement, cash flow statement.\n\
            3. Verify the document contains numerical financial data.\n\
            4. Confirm the document is not corrupt or unreadable."
            .to_string(),
        expected_output: "A verification report confirming whether the document is a valid \
            financial report. Include: document type identified, key sections found, and a \
            pass/fail verdict."
            .to_string(),
        agent: agents.verifier.clone(),
        tool_names: reader_tools.clone(),
        async_execution: false,
    };

    let analysis = TaskConfig {
        name: "analysis",
        description: "Analyze the financial document at {file_path} to answer the user's \
            query: {query}. \
            Steps:\n\
            1. Use the financial document reader tool to read the full document content.\n\
            2. Extract key financial metrics (revenue, profit, margins, growth rates).\n\
            3. Identify trends and significant changes year-over-year.\n\
            4. Provide a direct answer to the user's specific query."
            .to_string(),
        expected_output: "A detailed analysis answering the user's query based on the \
            financial document. Include specific numbers, percentages, and data points \
            from the document."
            .to_string(),
        agent: agents.financial_analyst.clone(),
        tool_names: reader_tools.clone(),
        async_execution: false,
    };

    let investment_advice = TaskConfig {
        name: "investment_advice",
        description: "Analyze the financial document at {file_path} and provide investment \
            recommendations. Focus on financial ratios, market trends, and potential \
            opportunities. User query: {query}\n\
            Steps:\n\
            1. Review the financial analysis from the previous task.\n\
            2. Calculate or identify key investment ratios (P/E, ROE, debt-to-equity, etc.).\n\
            3. Assess growth potential and market positioning.\n\
            4. Provide specific, actionable investment recommendations."
            .to_string(),
        expected_output: "A comprehensive investment analysis including: key financial \
            ratios, stock recommendation (if applicable), strategic recommendations, and \
            clear rationale based on the document data."
            .to_string(),
        agent: agents.investment_advisor.clone(),
        tool_names: reader_tools.clone(),
        async_execution: false,
    };

    let risk_assessment = TaskConfig {
        name: "risk_assessment",
        description: "Assess the risks associated with the financial entity described in \
            the document at {file_path}. Consider market volatility, regulatory risks, and \
            financial stability. User query: {query}\n\
            Steps:\n\
            1. Review the financial data and previous analyses.\n\
            2. Identify market risks (competition, market conditions, sector trends).\n\
            3. Evaluate financial risks (debt levels, cash flow, liquidity).\n\
            4. Consider regulatory and operational risks.\n\
            5. Provide a risk rating and mitigation strategies."
            .to_string(),
        expected_output: "A detailed risk assessment report including: identified risks \
            categorized by type (market, financial, regulatory, operational), risk severity \
            ratings, potential impact, and recommended mitigation strategies."
            .to_string(),
        agent: agents.risk_assessor.clone(),
        tool_names: reader_tools,
        async_execution: false,
    };

    vec![verification, analysis, investment_advice, risk_assessment]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::create_agents;
    use crate::config::ModelBinding;
    use crate::models::TaskParams;

    fn tasks() -> Vec<TaskConfig> {
        create_tasks(&create_agents(&ModelBinding::select(None, None)))
    }

    #[test]
    fn test_pipeline_order_is_fixed() {
        let names: Vec<&str> = tasks().iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec!["verification", "analysis", "investment_advice", "risk_assessment"]
        );
    }

    #[test]
    fn test_every_task_is_synchronous() {
        assert!(tasks().iter().all(|t| !t.async_execution));
    }

    #[test]
    fn test_every_task_binds_the_reader() {
        for task in tasks() {
            assert_eq!(task.tool_names, vec![DOCUMENT_READER_TOOL.to_string()]);
        }
    }

    #[test]
    fn test_each_task_references_one_agent() {
        let tasks = tasks();
        assert_eq!(tasks[0].agent.role, "Financial Document Verifier");
        assert_eq!(tasks[1].agent.role, "Senior Financial Analyst");
        assert_eq!(tasks[2].agent.role, "Senior Investment Advisor");
        assert_eq!(tasks[3].agent.role, "Risk Assessment Specialist");
    }

    #[test]
    fn test_placeholder_substitution() {
        let params = TaskParams {
            file_path: "report.pdf".to_string(),
            query: "What is the revenue trend?".to_string(),
        };

        for task in tasks() {
            let rendered = task.render_description(&params);
            assert!(rendered.contains("report.pdf"), "task {}", task.name);
            if task.description.contains("{query}") {
                assert!(
                    rendered.contains("What is the revenue trend?"),
                    "task {}",
                    task.name
                );
            }
            assert!(!rendered.contains("{file_path}"));
            assert!(!rendered.contains("{query}"));
        }
    }
}
