//! Shared handler state

use std::sync::Arc;
use stockdash_core::StockInsights;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub insights: Arc<StockInsights>,
}

impl AppState {
    pub fn new(insights: StockInsights) -> Self {
        Self {
            insights: Arc::new(insights),
        }
    }
}
