use crate::core::facets::{
    by_city, by_province, distinct_worker_count, sort_counts, workers_by_city, workers_by_province,
};
use crate::core::query::SearchPredicate;
use crate::core::ranking::rank;
use crate::core::synonyms::{CategoryDictionary, SynonymResolver};
use crate::models::{CountMode, FacetCount, FacetDimension, RankedPage, SearchFilter, SearchRequest};
use crate::services::cache::{CacheError, CacheKey};
use crate::services::store::{SearchStore, StoreError};
use crate::services::CacheManager;
use std::sync::Arc;

/// Orchestrates synonym resolution, query building, aggregation, and
/// ranking over a search store.
///
/// Search and facet reads never fail a request: data-source errors are
/// logged with their filter context and degrade to an empty result, so a
/// failure in one facet dimension never blocks another.
pub struct SearchEngine {
    store: Arc<dyn SearchStore>,
    resolver: SynonymResolver,
    cache: Option<Arc<CacheManager>>,
}

impl SearchEngine {
    pub fn new(
        store: Arc<dyn SearchStore>,
        dictionary: Arc<CategoryDictionary>,
        cache: Option<Arc<CacheManager>>,
    ) -> Self {
        Self {
            store,
            resolver: SynonymResolver::new(dictionary),
            cache,
        }
    }

    pub fn resolver(&self) -> &SynonymResolver {
        &self.resolver
    }

    /// Build the request-scoped filter shared by ranking and aggregation.
    /// A blank or missing service type yields an empty term set, meaning
    /// "no category filter".
    pub fn filter_from(&self, request: &SearchRequest) -> SearchFilter {
        let terms = request
            .service_type
            .as_deref()
            .map(|label| self.resolver.resolve(label))
            .unwrap_or_default();

        SearchFilter {
            terms,
            province: non_blank(&request.province),
            city: non_blank(&request.city),
            max_budget: request.budget,
        }
    }

    /// Ranked provider search. Returns an empty page on store failure.
    pub async fn search(&self, filter: &SearchFilter, page: u32, limit: u32) -> RankedPage {
        let predicate = SearchPredicate::new(filter);

        match self.store.fetch_matches(&predicate).await {
            Ok(rows) => {
                let result = rank(&rows, page, limit);
                tracing::debug!(
                    "Ranked {} providers ({} join rows) for terms {:?}",
                    result.total,
                    rows.len(),
                    filter.terms
                );
                result
            }
            Err(e) => {
                tracing::error!(
                    "Provider search failed for terms {:?} (province {:?}): {}",
                    filter.terms,
                    filter.province,
                    e
                );
                RankedPage::default()
            }
        }
    }

    /// Facet aggregation with explicit count semantics. Results are served
    /// from the bounded-TTL cache when available; store failures degrade to
    /// an empty list.
    pub async fn facets(
        &self,
        dimension: FacetDimension,
        mode: CountMode,
        filter: &SearchFilter,
    ) -> Vec<FacetCount> {
        let key = CacheKey::facets(dimension, mode, filter);

        if let Some(cache) = &self.cache {
            match cache.get::<Vec<FacetCount>>(&key).await {
                Ok(hit) => return hit,
                Err(CacheError::CacheMiss(_)) => {}
                Err(e) => {
                    tracing::warn!("Facet cache read failed for {}: {}", key, e);
                }
            }
        }

        match self.compute_facets(dimension, mode, filter).await {
            Ok(counts) => {
                if let Some(cache) = &self.cache {
                    if let Err(e) = cache.set(&key, &counts).await {
                        tracing::warn!("Failed to cache facets {}: {}", key, e);
                    }
                }
                counts
            }
            Err(e) => {
                tracing::error!(
                    "{} aggregation failed for terms {:?} (province {:?}): {}",
                    dimension.as_str(),
                    filter.terms,
                    filter.province,
                    e
                );
                Vec::new()
            }
        }
    }

    /// Connectivity check for the backing store
    pub async fn health_check(&self) -> bool {
        self.store.health_check().await.unwrap_or(false)
    }

    async fn compute_facets(
        &self,
        dimension: FacetDimension,
        mode: CountMode,
        filter: &SearchFilter,
    ) -> Result<Vec<FacetCount>, StoreError> {
        let predicate = SearchPredicate::new(filter);

        match dimension {
            FacetDimension::Province => match mode {
                CountMode::Filtered => {
                    let rows = self.store.fetch_matches(&predicate).await?;
                    Ok(by_province(&rows))
                }
                CountMode::Unfiltered => {
                    let workers = self.store.fetch_active_workers(&predicate).await?;
                    Ok(workers_by_province(&workers))
                }
            },
            FacetDimension::City => {
                // Precondition enforced at the request boundary; repeated
                // here so the engine stays fail-safe when called directly.
                if predicate.province().is_none() {
                    tracing::warn!("City aggregation requested without a province");
                    return Ok(Vec::new());
                }
                match mode {
                    CountMode::Filtered => {
                        let rows = self.store.fetch_matches(&predicate).await?;
                        Ok(by_city(&rows))
                    }
                    CountMode::Unfiltered => {
                        let workers = self.store.fetch_active_workers(&predicate).await?;
                        Ok(workers_by_city(&workers))
                    }
                }
            }
            // Each category is counted against its own canonical expansion,
            // not the caller's term set; the mode argument does not change
            // that, only the geography/budget constraints carry over.
            FacetDimension::Category => self.category_counts(filter).await,
        }
    }

    async fn category_counts(&self, filter: &SearchFilter) -> Result<Vec<FacetCount>, StoreError> {
        let labels: Vec<String> = self
            .resolver
            .dictionary()
            .labels()
            .map(str::to_string)
            .collect();

        let mut counts: Vec<FacetCount> = Vec::with_capacity(labels.len());
        for label in labels {
            let category_filter = SearchFilter {
                terms: self.resolver.resolve(&label),
                province: filter.province.clone(),
                city: filter.city.clone(),
                max_budget: filter.max_budget,
            };
            let predicate = SearchPredicate::new(&category_filter);
            let rows = self.store.fetch_matches(&predicate).await?;
            counts.push(FacetCount {
                value: label,
                count: distinct_worker_count(&rows),
            });
        }

        Ok(sort_counts(counts))
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
