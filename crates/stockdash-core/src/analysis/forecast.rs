//! Price forecast orchestration

use super::TextGeneration;
use super::result::ForecastResult;
use crate::engine::{IndicatorOptions, compute_indicators_with};
use crate::error::{DashError, Result};
use crate::models::TimeSeriesPoint;
use crate::prompts::ForecastPrompt;
use tracing::{error, info, instrument, warn};

const STAGE: &str = "forecast";

/// Builds model forecasts on top of locally computed indicators
#[derive(Clone)]
pub struct ForecastOrchestrator {
    generation: TextGeneration,
    options: IndicatorOptions,
}

impl ForecastOrchestrator {
    pub fn new(generation: TextGeneration, options: IndicatorOptions) -> Self {
        Self {
            generation,
            options,
        }
    }

    /// Forecast `symbol` over the next `period_days` from `series`
    ///
    /// Fails with [`DashError::NoData`] for an empty series and with
    /// [`DashError::UpstreamParse`] when the model answer holds no JSON
    /// object.
    #[instrument(skip(self, series), fields(points = series.len()))]
    pub async fn build_forecast(
        &self,
        symbol: &str,
        period_days: u32,
        series: &[TimeSeriesPoint],
    ) -> Result<ForecastResult> {
        if series.is_empty() {
            warn!(symbol, stage = STAGE, "No historical data");
            return Err(DashError::NoData {
                symbol: symbol.to_string(),
            });
        }

        let indicators = compute_indicators_with(series, &self.options);
        let prompt = ForecastPrompt::new(symbol, period_days, &indicators, series).render()?;

        let model_output = self
            .generation
            .generate_object(prompt, STAGE)
            .await
            .inspect_err(|e| {
                error!(symbol, stage = STAGE, error = %e, "Forecast generation failed");
            })?;

        let result = ForecastResult::new(model_output, symbol, period_days, indicators);

        match result.chart_points() {
            Some(points) if points == period_days as usize => {}
            points => warn!(
                symbol,
                expected = period_days,
                received = ?points,
                "Model chart data does not match the requested period"
            ),
        }

        info!(symbol, period_days, "Forecast generated");
        Ok(result)
    }
}
