//! Request-level entry points
//!
//! [`StockInsights`] owns the collaborators and turns a symbol (or pair)
//! into a fetched series and an orchestrated result. Every call is
//! independent; nothing is cached between requests.

use crate::analysis::{
    ComparisonOrchestrator, ComparisonResult, ForecastOrchestrator, ForecastResult,
    TextGeneration, validate_pair,
};
use crate::api::MarketDataSource;
use crate::config::InsightConfig;
use crate::directory::CompanyDirectory;
use crate::engine::IndicatorOptions;
use crate::error::{DashError, Result};
use crate::models::{Company, TimeSeriesPoint, normalize_symbol};
use chrono::{Duration, Utc};
use std::sync::Arc;
use stockdash_llm::LLMProvider;
use tracing::{debug, instrument};

/// Stock dashboard service
pub struct StockInsights {
    config: InsightConfig,
    market: Arc<dyn MarketDataSource>,
    directory: Arc<dyn CompanyDirectory>,
    forecaster: Option<ForecastOrchestrator>,
    comparer: Option<ComparisonOrchestrator>,
}

impl StockInsights {
    /// Assemble the service from explicit collaborators
    ///
    /// Without a `generator`, forecasts and comparisons fail with
    /// [`DashError::Configuration`].
    pub fn new(
        config: InsightConfig,
        market: Arc<dyn MarketDataSource>,
        directory: Arc<dyn CompanyDirectory>,
        generator: Option<Arc<dyn LLMProvider>>,
    ) -> Self {
        let options = IndicatorOptions {
            window_policy: config.window_policy,
        };

        let (forecaster, comparer) = match generator {
            Some(provider) => {
                let generation = TextGeneration::new(provider, &config);
                (
                    Some(ForecastOrchestrator::new(generation.clone(), options)),
                    Some(ComparisonOrchestrator::new(
                        generation,
                        directory.clone(),
                        options,
                        config.tie_policy,
                    )),
                )
            }
            None => (None, None),
        };

        Self {
            config,
            market,
            directory,
            forecaster,
            comparer,
        }
    }

    /// Assemble the service, building the text generator from `config`
    pub fn from_config(
        config: InsightConfig,
        market: Arc<dyn MarketDataSource>,
        directory: Arc<dyn CompanyDirectory>,
    ) -> Result<Self> {
        config.validate()?;
        let generator = config.text_generator()?;
        Ok(Self::new(config, market, directory, generator))
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    /// Whether forecasts and comparisons can run
    pub fn has_generator(&self) -> bool {
        self.forecaster.is_some()
    }

    /// Every company in the directory
    pub async fn companies(&self) -> Result<Vec<Company>> {
        self.directory.list_companies().await
    }

    /// Daily history over the configured history window
    #[instrument(skip(self))]
    pub async fn history(&self, symbol: &str) -> Result<Vec<TimeSeriesPoint>> {
        let symbol = required_symbol(symbol)?;
        self.fetch(&symbol, self.config.history_lookback_days).await
    }

    /// Forecast horizon for an optional caller value
    pub fn resolve_period(&self, period: Option<u32>) -> Result<u32> {
        let period = period.unwrap_or(self.config.default_forecast_period);
        if period == 0 || period > self.config.max_forecast_period {
            return Err(DashError::InvalidInput(format!(
                "period must be between 1 and {} days",
                self.config.max_forecast_period
            )));
        }
        Ok(period)
    }

    /// Forecast `symbol` over `period` days (default from config)
    #[instrument(skip(self))]
    pub async fn forecast(&self, symbol: &str, period: Option<u32>) -> Result<ForecastResult> {
        let forecaster = self.forecaster.as_ref().ok_or_else(missing_generator)?;
        let symbol = required_symbol(symbol)?;
        let period = self.resolve_period(period)?;

        let series = self
            .fetch(&symbol, self.config.forecast_lookback_days)
            .await?;
        forecaster.build_forecast(&symbol, period, &series).await
    }

    /// Compare two symbols over the history window
    #[instrument(skip(self))]
    pub async fn compare(&self, symbol1: &str, symbol2: &str) -> Result<ComparisonResult> {
        let (first, second) = validate_pair(symbol1, symbol2)?;
        let comparer = self.comparer.as_ref().ok_or_else(missing_generator)?;

        let days = self.config.history_lookback_days;
        let (series1, series2) =
            tokio::try_join!(self.fetch(&first, days), self.fetch(&second, days))?;

        comparer
            .build_comparison(&first, &second, &series1, &series2)
            .await
    }

    async fn fetch(&self, symbol: &str, days: i64) -> Result<Vec<TimeSeriesPoint>> {
        let end = Utc::now();
        let start = end - Duration::days(days);
        let series = self.market.daily_history(symbol, start, end).await?;
        debug!(symbol, days, points = series.len(), "Fetched series");
        Ok(series)
    }
}

fn required_symbol(symbol: &str) -> Result<String> {
    let symbol = normalize_symbol(symbol);
    if symbol.is_empty() {
        return Err(DashError::InvalidInput("symbol is required".to_string()));
    }
    Ok(symbol)
}

fn missing_generator() -> DashError {
    DashError::Configuration("AI text generation is not configured".to_string())
}
