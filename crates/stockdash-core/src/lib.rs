//! Stock dashboard insights
//!
//! This crate turns daily price history into dashboard insights. It includes:
//!
//! - A technical indicator engine (moving averages, whole-series RSI,
//!   volatility, volume trend, momentum, support and resistance)
//! - A comparison engine (one-year return, maximum drawdown and
//!   head-to-head winners)
//! - Forecast and comparison orchestrators that prompt a text generation
//!   model and merge its JSON answer with the computed figures
//! - Market data (Yahoo Finance) and company directory (PostgreSQL)
//!   collaborators behind traits
//!
//! # Example
//!
//! ```rust,ignore
//! use stockdash_core::{InsightConfig, StockInsights, StaticCompanyDirectory, YahooFinanceClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = InsightConfig::default().with_env()?;
//!     let insights = StockInsights::from_config(
//!         config,
//!         Arc::new(YahooFinanceClient::new()),
//!         Arc::new(StaticCompanyDirectory::default()),
//!     )?;
//!
//!     let forecast = insights.forecast("AAPL", Some(7)).await?;
//!     println!("{}", serde_json::to_string_pretty(&forecast)?);
//!
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod models;
pub mod prompts;
pub mod service;

// Re-export main types for convenience
pub use analysis::{
    ComparisonOrchestrator, ComparisonResult, ForecastOrchestrator, ForecastResult,
    extract_json_object,
};
pub use api::{MarketDataSource, YahooFinanceClient};
pub use config::{InsightConfig, ProviderKind};
pub use directory::{CompanyDirectory, PgCompanyDirectory, StaticCompanyDirectory};
pub use engine::{
    ComparisonMetrics, CrossComparisonWinners, IndicatorSnapshot, TiePolicy, WindowPolicy,
    compute_indicators,
};
pub use error::{DashError, Result};
pub use models::{Company, TimeSeriesPoint};
pub use service::StockInsights;
