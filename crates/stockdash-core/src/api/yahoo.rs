//! Yahoo Finance API client

use super::MarketDataSource;
use crate::error::{DashError, Result};
use crate::models::TimeSeriesPoint;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use time::OffsetDateTime;
use tracing::{debug, instrument};
use yahoo_finance_api as yahoo;

/// Yahoo Finance API client
#[derive(Debug, Default, Clone, Copy)]
pub struct YahooFinanceClient {}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new() -> Self {
        Self {}
    }
}

fn market_error(symbol: &str, reason: impl ToString) -> DashError {
    DashError::MarketData {
        symbol: symbol.to_string(),
        reason: reason.to_string(),
    }
}

fn to_offset(symbol: &str, at: DateTime<Utc>) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(at.timestamp())
        .map_err(|e| market_error(symbol, format!("Invalid timestamp: {e}")))
}

/// Yahoo reports an empty window as an error; treat it as no data
fn is_empty_result(err: &yahoo::YahooError) -> bool {
    matches!(err, yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult)
}

#[async_trait]
impl MarketDataSource for YahooFinanceClient {
    #[instrument(skip(self), fields(provider = "yahoo"))]
    async fn daily_history(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TimeSeriesPoint>> {
        let provider = yahoo::YahooConnector::new().map_err(|e| market_error(symbol, e))?;

        let response = match provider
            .get_quote_history(symbol, to_offset(symbol, start)?, to_offset(symbol, end)?)
            .await
        {
            Ok(response) => response,
            Err(e) if is_empty_result(&e) => return Ok(Vec::new()),
            Err(e) => return Err(market_error(symbol, e)),
        };

        let quotes = match response.quotes() {
            Ok(quotes) => quotes,
            Err(e) if is_empty_result(&e) => return Ok(Vec::new()),
            Err(e) => return Err(market_error(symbol, e)),
        };

        let mut points: Vec<TimeSeriesPoint> = quotes
            .iter()
            .filter_map(|q| {
                Some(TimeSeriesPoint {
                    date: DateTime::from_timestamp(q.timestamp as i64, 0)?,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    volume: q.volume,
                    adj_close: Some(q.adjclose),
                })
            })
            .collect();
        points.sort_by_key(|p| p.date);

        debug!(symbol, points = points.len(), "Fetched daily history");
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_empty_window_errors_are_no_data() {
        assert!(is_empty_result(&yahoo::YahooError::NoQuotes));
        assert!(is_empty_result(&yahoo::YahooError::NoResult));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_daily_history() {
        let client = YahooFinanceClient::new();
        let end = Utc::now();
        let points = client
            .daily_history("AAPL", end - Duration::days(30), end)
            .await
            .unwrap();

        assert!(!points.is_empty());
        assert!(points.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_unknown_symbol() {
        let client = YahooFinanceClient::new();
        let end = Utc::now();
        let result = client
            .daily_history("NOT-A-REAL-TICKER-XYZ", end - Duration::days(30), end)
            .await;

        match result {
            Ok(points) => assert!(points.is_empty()),
            Err(e) => assert!(matches!(e, DashError::MarketData { .. })),
        }
    }
}
