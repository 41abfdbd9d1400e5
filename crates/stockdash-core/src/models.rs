//! Market data and directory records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One daily OHLCV record
///
/// Series are ordered ascending by `date`. Price ordering
/// (`low <= open, close <= high`) is not validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    pub date: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adj_close: Option<f64>,
}

/// A listed company from the directory
///
/// Columns beyond symbol, name and sector (market cap, industry, ...)
/// are kept in `extra` and serialized back flat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Company {
    /// Create a company with no extra columns
    pub fn new(symbol: impl Into<String>, name: impl Into<String>, sector: Option<&str>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            sector: sector.map(str::to_string),
            extra: Map::new(),
        }
    }
}

/// Display name and sector used in comparison prompts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyProfile {
    pub name: String,
    pub sector: String,
}

impl CompanyProfile {
    /// Profile for a symbol missing from the directory
    pub fn unknown(symbol: &str) -> Self {
        Self {
            name: symbol.to_string(),
            sector: "Unknown".to_string(),
        }
    }
}

impl From<&Company> for CompanyProfile {
    fn from(company: &Company) -> Self {
        Self {
            name: company.name.clone(),
            sector: company
                .sector
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

/// Normalize a ticker symbol (trimmed, upper case)
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::TimeSeriesPoint;
    use chrono::{Duration, TimeZone, Utc};

    /// Daily series with the given closes and a constant volume
    pub fn series_from_closes(closes: &[f64]) -> Vec<TimeSeriesPoint> {
        let volumes = vec![1_000_000; closes.len()];
        series_from(closes, &volumes)
    }

    /// Daily series with the given closes and volumes
    pub fn series_from(closes: &[f64], volumes: &[u64]) -> Vec<TimeSeriesPoint> {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        closes
            .iter()
            .zip(volumes)
            .enumerate()
            .map(|(i, (&close, &volume))| TimeSeriesPoint {
                date: start + Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume,
                adj_close: None,
            })
            .collect()
    }
}
