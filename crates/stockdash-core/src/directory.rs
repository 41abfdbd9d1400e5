//! Company directory
//!
//! Read-only list of listed companies used for the dashboard sidebar and
//! for display names in comparisons.

use crate::error::Result;
use crate::models::{Company, CompanyProfile, normalize_symbol};
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use tracing::debug;

/// Read access to the company table
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompanyDirectory: Send + Sync {
    /// Every company in the directory
    async fn list_companies(&self) -> Result<Vec<Company>>;

    /// Company with the given symbol, if listed
    async fn find(&self, symbol: &str) -> Result<Option<Company>>;
}

/// Display profile for a symbol, falling back to the symbol itself
pub async fn profile_for(directory: &dyn CompanyDirectory, symbol: &str) -> Result<CompanyProfile> {
    Ok(directory
        .find(symbol)
        .await?
        .map_or_else(|| CompanyProfile::unknown(symbol), |c| CompanyProfile::from(&c)))
}

/// Directory backed by the PostgreSQL `companies` table
///
/// Rows are read as JSON so that any extra columns pass through untouched.
#[derive(Debug, Clone)]
pub struct PgCompanyDirectory {
    pool: PgPool,
}

impl PgCompanyDirectory {
    /// Wrap an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a pool that connects on first use
    pub fn connect_lazy(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_lazy(database_url)?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl CompanyDirectory for PgCompanyDirectory {
    async fn list_companies(&self) -> Result<Vec<Company>> {
        let rows: Vec<Json<Company>> = sqlx::query_scalar(
            "SELECT row_to_json(c)::jsonb AS company FROM companies c ORDER BY c.symbol",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Loaded companies");
        Ok(rows.into_iter().map(|Json(company)| company).collect())
    }

    async fn find(&self, symbol: &str) -> Result<Option<Company>> {
        let row: Option<Json<Company>> = sqlx::query_scalar(
            "SELECT row_to_json(c)::jsonb AS company FROM companies c WHERE c.symbol = $1",
        )
        .bind(symbol)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|Json(company)| company))
    }
}

/// In-memory directory, used when no database is configured
#[derive(Debug, Clone, Default)]
pub struct StaticCompanyDirectory {
    companies: Vec<Company>,
}

impl StaticCompanyDirectory {
    pub fn new(companies: Vec<Company>) -> Self {
        Self { companies }
    }
}

#[async_trait]
impl CompanyDirectory for StaticCompanyDirectory {
    async fn list_companies(&self) -> Result<Vec<Company>> {
        Ok(self.companies.clone())
    }

    async fn find(&self, symbol: &str) -> Result<Option<Company>> {
        let symbol = normalize_symbol(symbol);
        Ok(self
            .companies
            .iter()
            .find(|c| normalize_symbol(&c.symbol) == symbol)
            .cloned())
    }
}
