use crate::core::query::{BindValue, SearchPredicate};
use crate::models::{ProviderServiceRow, WorkerRow};
use crate::services::store::{SearchStore, StoreError};
use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};
use std::time::Duration;

/// PostgreSQL-backed search store.
///
/// All filter SQL comes from [`SearchPredicate`]; this client only supplies
/// the projection and the join, so search and aggregation can never drift
/// apart in their filter semantics.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect and run pending migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a store from settings, filling in pool defaults
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, StoreError> {
        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }
}

fn bind_all<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    binds: &'q [BindValue],
) -> Query<'q, Postgres, PgArguments> {
    for bind in binds {
        query = match bind {
            BindValue::Text(value) => query.bind(value),
            BindValue::Number(value) => query.bind(value),
        };
    }
    query
}

#[async_trait]
impl SearchStore for PostgresStore {
    async fn fetch_matches(
        &self,
        predicate: &SearchPredicate,
    ) -> Result<Vec<ProviderServiceRow>, StoreError> {
        let fragment = predicate.to_sql(1);
        let sql = format!(
            "SELECT DISTINCT u.id AS worker_id, u.first_name, u.last_name, u.province, u.city, \
             u.is_verified, ws.service_name, ws.service_category, ws.hourly_rate \
             FROM users u \
             JOIN worker_services ws ON u.id = ws.user_id \
             WHERE {}",
            fragment.clause
        );

        tracing::debug!("Provider search query: {}", sql);

        let rows = bind_all(sqlx::query(&sql), &fragment.binds)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| ProviderServiceRow {
                worker_id: row.get("worker_id"),
                first_name: row.get("first_name"),
                last_name: row.get("last_name"),
                province: row.get("province"),
                city: row.get("city"),
                is_verified: row.get("is_verified"),
                service_name: row.get("service_name"),
                service_category: row.get("service_category"),
                hourly_rate: row.get("hourly_rate"),
            })
            .collect())
    }

    async fn fetch_active_workers(
        &self,
        predicate: &SearchPredicate,
    ) -> Result<Vec<WorkerRow>, StoreError> {
        let fragment = predicate.workers_sql(1);
        let sql = format!(
            "SELECT u.id AS worker_id, u.province, u.city FROM users u WHERE {}",
            fragment.clause
        );

        let rows = bind_all(sqlx::query(&sql), &fragment.binds)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| WorkerRow {
                worker_id: row.get("worker_id"),
                province: row.get("province"),
                city: row.get("city"),
            })
            .collect())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
