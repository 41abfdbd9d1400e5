//! HTTP server for the stockdash dashboard

mod error;
mod handlers;
mod logging;
mod routes;
mod state;

use anyhow::Context;
use clap::Parser;
use state::AppState;
use std::sync::Arc;
use stockdash_core::{
    CompanyDirectory, InsightConfig, PgCompanyDirectory, StaticCompanyDirectory, StockInsights,
    YahooFinanceClient,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "stockdash-server")]
#[command(about = "Stock dashboard API: history, forecasts and comparisons", long_about = None)]
struct Args {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Postgres URL of the company directory
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    logging::init_tracing(args.log_json);

    let config = InsightConfig::default()
        .with_env()
        .context("invalid environment configuration")?;
    info!(provider = ?config.provider, model = %config.model, "Loaded configuration");

    let directory: Arc<dyn CompanyDirectory> = match args.database_url.as_deref() {
        Some(url) => Arc::new(
            PgCompanyDirectory::connect_lazy(url).context("invalid DATABASE_URL")?,
        ),
        None => {
            warn!("DATABASE_URL not set, company directory is empty");
            Arc::new(StaticCompanyDirectory::default())
        }
    };

    let insights =
        StockInsights::from_config(config, Arc::new(YahooFinanceClient::new()), directory)?;
    if !insights.has_generator() {
        warn!("No model API key set, forecast and compare endpoints will fail");
    }

    let app = routes::router(AppState::new(insights));
    let addr = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
}
