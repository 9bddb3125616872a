//! Study server binary
//!
//! Run with: cargo run --bin study-rag-server

use study_rag::{config::StudyConfig, server::StudyServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "study_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                     Study RAG Service                     ║
║     Summaries, Key Points, Quizzes & Q&A from Documents   ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration
    let config = StudyConfig::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - LLM model: {}", config.llm.generate_model);
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - Chunk size: {}", config.chunking.chunk_size);
    tracing::info!("  - Upload dir: {}", config.storage.upload_dir.display());

    // Check Ollama
    tracing::info!("Checking Ollama at {}...", config.llm.base_url);
    let client = reqwest::Client::new();
    match client
        .get(format!("{}/api/tags", config.llm.base_url))
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!("Ollama is running");
        }
        _ => {
            tracing::warn!("Ollama not available at {}", config.llm.base_url);
            tracing::warn!("Please start Ollama:");
            tracing::warn!("  1. Install: https://ollama.com/download");
            tracing::warn!("  2. Start: ollama serve");
            tracing::warn!("  3. Pull models: ollama pull nomic-embed-text && ollama pull phi3");
        }
    }

    // Create and start server
    let server = StudyServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST   /api/sessions              - Upload a document");
    println!("  GET    /api/sessions/:id/status   - Poll processing state");
    println!("  GET    /api/sessions/:id/quiz     - Generate a quiz");
    println!("  POST   /api/sessions/:id/qa       - Ask a question");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
