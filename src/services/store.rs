use crate::core::query::SearchPredicate;
use crate::models::{ProviderServiceRow, WorkerRow};
use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a search store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// The relational capability the engine depends on: parameterized filtered
/// selection over workers and their services. The predicate is the single
/// source of filter semantics for every implementation.
#[async_trait]
pub trait SearchStore: Send + Sync {
    /// Rows of the worker / service join matching the predicate
    async fn fetch_matches(
        &self,
        predicate: &SearchPredicate,
    ) -> Result<Vec<ProviderServiceRow>, StoreError>;

    /// Active workers under the predicate's geography constraints only,
    /// regardless of service availability
    async fn fetch_active_workers(
        &self,
        predicate: &SearchPredicate,
    ) -> Result<Vec<WorkerRow>, StoreError>;

    /// Connectivity check for health reporting
    async fn health_check(&self) -> Result<bool, StoreError>;
}
