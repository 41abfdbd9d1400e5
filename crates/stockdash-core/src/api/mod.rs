//! Market data sources

pub mod yahoo;

pub use yahoo::YahooFinanceClient;

use crate::error::Result;
use crate::models::TimeSeriesPoint;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Source of daily OHLCV history
///
/// Implementations return points sorted ascending by date. An unknown
/// symbol or empty window yields an empty vector rather than an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Daily history for `symbol` between `start` and `end`
    async fn daily_history(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TimeSeriesPoint>>;
}
