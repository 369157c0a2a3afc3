use crate::core::query::SearchPredicate;
use crate::models::{ProviderServiceRow, WorkerRecord, WorkerRow, WorkerServiceRecord};
use crate::services::store::{SearchStore, StoreError};
use async_trait::async_trait;

/// In-memory search store.
///
/// Evaluates the same [`SearchPredicate`] the Postgres store renders to
/// SQL, which keeps the two paths behaviorally interchangeable. Used by
/// integration tests and for running the service without a database.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    workers: Vec<WorkerRecord>,
    services: Vec<WorkerServiceRecord>,
}

impl MemoryStore {
    pub fn new(workers: Vec<WorkerRecord>, services: Vec<WorkerServiceRecord>) -> Self {
        Self { workers, services }
    }
}

#[async_trait]
impl SearchStore for MemoryStore {
    async fn fetch_matches(
        &self,
        predicate: &SearchPredicate,
    ) -> Result<Vec<ProviderServiceRow>, StoreError> {
        let mut rows = Vec::new();

        for worker in &self.workers {
            if !predicate.matches_worker(worker) {
                continue;
            }
            for service in &self.services {
                if service.worker_id != worker.id || !predicate.matches_service(service) {
                    continue;
                }
                rows.push(ProviderServiceRow {
                    worker_id: worker.id,
                    first_name: worker.first_name.clone(),
                    last_name: worker.last_name.clone(),
                    province: worker.province.clone(),
                    city: worker.city.clone(),
                    is_verified: worker.is_verified,
                    service_name: service.service_name.clone(),
                    service_category: service.service_category.clone(),
                    hourly_rate: service.hourly_rate,
                });
            }
        }

        Ok(rows)
    }

    async fn fetch_active_workers(
        &self,
        predicate: &SearchPredicate,
    ) -> Result<Vec<WorkerRow>, StoreError> {
        Ok(self
            .workers
            .iter()
            .filter(|w| predicate.matches_worker(w))
            .map(|w| WorkerRow {
                worker_id: w.id,
                province: w.province.clone(),
                city: w.city.clone(),
            })
            .collect())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
