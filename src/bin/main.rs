use financial_document_analyzer::{
    agents::create_agents,
    config::AppConfig,
    llm::LlmClient,
    models::TaskParams,
    pipeline::Pipeline,
    tasks::create_tasks,
    tools::create_default_registry,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    dotenv::dotenv().ok();

    let mut args = std::env::args().skip(1);
    let Some(file_path) = args.next() else {
        eprintln!("Usage: analyzer <file_path> [query]");
        std::process::exit(2);
    };
    let query = args
        .next()
        .unwrap_or_else(|| "Analyze this financial document for investment insights".to_string());

    info!("Financial Document Analyzer starting");

    let config = AppConfig::from_env();
    info!(provider = ?config.model.provider, model = %config.model.model, "Model backend selected");

    let agents = create_agents(&config.model);
    let tasks = create_tasks(&agents);
    let registry = create_default_registry(&config);
    let model = Box::new(LlmClient::new(config.model.clone()));

    let pipeline = Pipeline::new(model, registry, tasks);

    let params = TaskParams { file_path, query };

    match pipeline.run(params).await {
        Ok(result) => {
            println!("\n=== ANALYSIS RESULT ===");
            println!("Run ID: {}", result.run_id);
            println!("Document fingerprint: {}", result.document_fingerprint);
            for report in &result.reports {
                println!("\n--- {} ({}) [{} ms] ---", report.task_name, report.agent_role, report.execution_time_ms);
                println!("{}", report.output);
            }
            println!("\n=== FINAL ANSWER ===");
            println!("{}", result.final_output);
            Ok(())
        }
        Err(e) => {
            eprintln!("Analysis failed: {}", e);
            Err(Box::new(e) as Box<dyn std::error::Error>)
        }
    }
}
