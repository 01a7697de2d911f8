mod api;
mod cli;
mod router;
mod state;
mod upload;
mod web;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use scholar_core::Config;
use scholar_rag::summarize::DEFAULT_QUERY;
use scholar_rag::Summarizer;

use crate::cli::{Cli, Command};
use crate::state::AppState;

fn load_config() -> Config {
    scholar_core::config::load_dotenv();
    Config::from_env()
}

async fn serve(mut config: Config, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.log_summary();

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::from_config(config)?);
    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn summarize_once(config: &Config, pdf: &Path, query: Option<&str>) -> anyhow::Result<()> {
    if !pdf.is_file() {
        anyhow::bail!("{} is not a file", pdf.display());
    }
    let summarizer = Summarizer::from_config(config)?;
    let summary = summarizer
        .summarize_pdf(pdf, query.unwrap_or(DEFAULT_QUERY))
        .await?;
    println!("{summary}");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        None => serve(config, None, None).await,
        Some(Command::Serve { host, port }) => serve(config, host, port).await,
        Some(Command::Summarize { pdf, query }) => {
            summarize_once(&config, &pdf, query.as_deref()).await
        }
    }
}
