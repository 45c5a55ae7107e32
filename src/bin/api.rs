use financial_document_analyzer::{
    agents::create_agents,
    api::start_server,
    config::AppConfig,
    llm::LlmClient,
    pipeline::Pipeline,
    tasks::create_tasks,
    tools::create_default_registry,
};
use std::sync::Arc;
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

    let config = AppConfig::from_env();

    info!("🚀 Financial Document Analyzer - API Server");
    info!("📍 Port: {}", config.port);
    info!(provider = ?config.model.provider, model = %config.model.model, "Model backend selected");

    if config.model.api_key.is_empty() {
        eprintln!("⚠️  No model API key set (GOOGLE_API_KEY or OPENAI_API_KEY)");
        eprintln!("📌 Requests will fail at the first model call");
    }

    let agents = create_agents(&config.model);
    let tasks = create_tasks(&agents);
    let registry = create_default_registry(&config);
    let model = Box::new(LlmClient::new(config.model.clone()));

    let pipeline = Arc::new(Pipeline::new(model, registry, tasks));

    info!("✅ Pipeline initialized");
    info!("📡 Starting API server...");

    start_server(pipeline, config.port).await?;

    Ok(())
}
