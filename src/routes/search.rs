use crate::core::SearchEngine;
use crate::models::{
    ApiResponse, CountMode, FacetCount, FacetDimension, HealthResponse, RankedProvider,
    SearchRequest,
};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

/// Page-size bounds from settings
#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    pub default_limit: u32,
    pub max_limit: u32,
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
    pub limits: SearchLimits,
}

/// Configure all search-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/search/providers", web::get().to(search_providers_get))
        .route("/search/providers", web::post().to(search_providers_post))
        .route("/search/facets/provinces", web::get().to(facet_provinces))
        .route("/search/facets/cities", web::get().to(facet_cities))
        .route("/search/facets/categories", web::get().to(facet_categories));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.engine.health_check().await;
    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Provider search via query string
///
/// GET /api/v1/search/providers?serviceType=Electricians&province=ON&budget=100
async fn search_providers_get(
    state: web::Data<AppState>,
    query: web::Query<SearchRequest>,
) -> impl Responder {
    search_providers(state, query.into_inner()).await
}

/// Provider search via JSON body
///
/// POST /api/v1/search/providers
///
/// Request body:
/// ```json
/// {
///   "serviceType": "Electricians",
///   "province": "ON",
///   "city": "Toronto",
///   "budget": 100,
///   "page": 1,
///   "limit": 20
/// }
/// ```
async fn search_providers_post(
    state: web::Data<AppState>,
    body: web::Json<SearchRequest>,
) -> impl Responder {
    search_providers(state, body.into_inner()).await
}

async fn search_providers(state: web::Data<AppState>, request: SearchRequest) -> HttpResponse {
    if let Err(errors) = request.validate() {
        tracing::info!("Validation failed for provider search: {}", errors);
        return HttpResponse::BadRequest()
            .json(ApiResponse::<RankedProvider>::error(errors.to_string()));
    }

    if let Some(requested) = request.limit {
        if requested > state.limits.max_limit {
            tracing::info!(
                "Rejected limit {} above configured maximum {}",
                requested,
                state.limits.max_limit
            );
            return HttpResponse::BadRequest().json(ApiResponse::<RankedProvider>::error(
                format!("limit: must be at most {}", state.limits.max_limit),
            ));
        }
    }

    let page = request.page.unwrap_or(1);
    let limit = request
        .limit
        .unwrap_or(state.limits.default_limit)
        .min(state.limits.max_limit);

    let filter = state.engine.filter_from(&request);

    tracing::info!(
        "Searching providers: terms {:?}, province {:?}, page {}, limit {}",
        filter.terms,
        filter.province,
        page,
        limit
    );

    let result = state.engine.search(&filter, page, limit).await;

    HttpResponse::Ok().json(ApiResponse::ok(result.items, Some(result.total)))
}

/// Worker counts per province
///
/// GET /api/v1/search/facets/provinces?serviceType=Electricians
async fn facet_provinces(
    state: web::Data<AppState>,
    query: web::Query<SearchRequest>,
) -> impl Responder {
    facet_response(state, query.into_inner(), FacetDimension::Province).await
}

/// Worker counts per city within a province (province is required)
///
/// GET /api/v1/search/facets/cities?province=ON&serviceType=Plumbers
async fn facet_cities(
    state: web::Data<AppState>,
    query: web::Query<SearchRequest>,
) -> impl Responder {
    let request = query.into_inner();

    if let Err(message) = request.province_or_err() {
        return HttpResponse::BadRequest()
            .json(ApiResponse::<FacetCount>::error(format!("province: {}", message)));
    }

    facet_response(state, request, FacetDimension::City).await
}

/// Worker counts per canonical category
///
/// GET /api/v1/search/facets/categories?province=ON
async fn facet_categories(
    state: web::Data<AppState>,
    query: web::Query<SearchRequest>,
) -> impl Responder {
    facet_response(state, query.into_inner(), FacetDimension::Category).await
}

async fn facet_response(
    state: web::Data<AppState>,
    request: SearchRequest,
    dimension: FacetDimension,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        tracing::info!(
            "Validation failed for {} facets: {}",
            dimension.as_str(),
            errors
        );
        return HttpResponse::BadRequest()
            .json(ApiResponse::<FacetCount>::error(errors.to_string()));
    }

    let filter = state.engine.filter_from(&request);

    // Count semantics are explicit: a category filter means filtered
    // (service-availability) counts, no filter means raw worker counts.
    let mode = if filter.has_terms() {
        CountMode::Filtered
    } else {
        CountMode::Unfiltered
    };

    let counts = state.engine.facets(dimension, mode, &filter).await;

    tracing::debug!(
        "{} facets: {} buckets for terms {:?}",
        dimension.as_str(),
        counts.len(),
        filter.terms
    );

    HttpResponse::Ok().json(ApiResponse::ok(counts, None))
}
