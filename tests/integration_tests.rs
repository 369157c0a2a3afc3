//! End-to-end engine tests over the in-memory store: ranked search, facet
//! aggregation, and the invariant that search and facets agree on who
//! matches a filter.

use kwikr_search::core::{CategoryDictionary, SearchEngine};
use kwikr_search::models::{
    CountMode, FacetDimension, SearchFilter, WorkerRecord, WorkerServiceRecord,
};
use kwikr_search::services::MemoryStore;
use std::collections::HashSet;
use std::sync::Arc;

fn worker(id: i64, name: &str, province: &str, city: &str, verified: bool) -> WorkerRecord {
    WorkerRecord {
        id,
        first_name: name.to_string(),
        last_name: "Tester".to_string(),
        province: province.to_string(),
        city: city.to_string(),
        is_verified: verified,
        is_active: true,
        role: "worker".to_string(),
    }
}

fn service(worker_id: i64, name: &str, category: &str, rate: f64) -> WorkerServiceRecord {
    WorkerServiceRecord {
        worker_id,
        service_name: name.to_string(),
        service_category: category.to_string(),
        hourly_rate: rate,
        years_experience: 5,
        is_available: true,
        service_area: None,
    }
}

/// Marketplace snapshot used by every test in this file:
/// three Ontario electricians (one of whom also plumbs), a BC plumber,
/// a worker with an unavailable listing, an inactive worker, and a client.
fn fixture() -> MemoryStore {
    let mut inactive = worker(6, "Ivy", "ON", "Toronto", false);
    inactive.is_active = false;

    let mut client = worker(7, "Cleo", "ON", "Toronto", false);
    client.role = "client".to_string();

    let mut unavailable = service(5, "Rewiring", "Electrical Services", 50.0);
    unavailable.is_available = false;

    MemoryStore::new(
        vec![
            worker(1, "Ana", "ON", "Toronto", true),
            worker(2, "Bo", "ON", "Toronto", false),
            worker(3, "Cy", "ON", "Ottawa", true),
            worker(4, "Dee", "BC", "Vancouver", false),
            worker(5, "Eli", "ON", "Hamilton", false),
            inactive,
            client,
        ],
        vec![
            service(1, "Panel Upgrades", "Electrical Services", 95.0),
            service(2, "Lighting Install", "Electrical Services", 60.0),
            service(3, "Wiring", "Electrical Services", 85.0),
            service(3, "Drain Snaking", "Plumbing Services", 70.0),
            service(4, "Pipe Repair", "Plumbing Services", 70.0),
            unavailable,
            service(6, "Outlets", "Electrical Services", 40.0),
        ],
    )
}

fn engine() -> SearchEngine {
    SearchEngine::new(
        Arc::new(fixture()),
        Arc::new(CategoryDictionary::builtin().unwrap()),
        None,
    )
}

fn electricians_in(province: Option<&str>) -> SearchFilter {
    let dictionary = Arc::new(CategoryDictionary::builtin().unwrap());
    let resolver = kwikr_search::core::SynonymResolver::new(dictionary);
    SearchFilter {
        terms: resolver.resolve("Electricians"),
        province: province.map(str::to_string),
        city: None,
        max_budget: None,
    }
}

#[tokio::test]
async fn test_ranked_search_verified_then_cheapest() {
    let page = engine().search(&electricians_in(Some("ON")), 1, 20).await;

    assert_eq!(page.total, 3);
    let ids: Vec<i64> = page.items.iter().map(|p| p.worker_id).collect();
    // Verified (3 at $85, 1 at $95) before unverified (2 at $60)
    assert_eq!(ids, vec![3, 1, 2]);
    assert!(page.items[0].verified);
    assert!(page.items[0].avg_rate < page.items[1].avg_rate);
}

#[tokio::test]
async fn test_matched_services_exclude_other_categories() {
    let page = engine().search(&electricians_in(Some("ON")), 1, 20).await;

    let cy = page.items.iter().find(|p| p.worker_id == 3).unwrap();
    // Cy also offers plumbing; only the electrical listing matched
    assert_eq!(cy.matched_services, vec!["Wiring"]);
    assert_eq!(cy.avg_rate, 85.0);
}

#[tokio::test]
async fn test_budget_cap_narrows_results() {
    let mut filter = electricians_in(Some("ON"));
    filter.max_budget = Some(90.0);

    let page = engine().search(&filter, 1, 20).await;
    assert_eq!(page.total, 2);
    assert!(page.items.iter().all(|p| p.worker_id != 1));
}

#[tokio::test]
async fn test_facets_and_search_agree_on_matches() {
    let engine = engine();
    let filter = electricians_in(None);

    let counts = engine
        .facets(FacetDimension::Province, CountMode::Filtered, &filter)
        .await;
    let on = counts.iter().find(|c| c.value == "ON").unwrap();

    let mut narrowed = filter.clone();
    narrowed.province = Some("ON".to_string());
    let page = engine.search(&narrowed, 1, 100).await;

    assert_eq!(on.count, page.total);
}

#[tokio::test]
async fn test_unfiltered_counts_include_workers_without_listings() {
    let counts = engine()
        .facets(
            FacetDimension::Province,
            CountMode::Unfiltered,
            &SearchFilter::default(),
        )
        .await;

    // Eli's only listing is unavailable but he is still an active worker
    let on = counts.iter().find(|c| c.value == "ON").unwrap();
    assert_eq!(on.count, 4);
    let bc = counts.iter().find(|c| c.value == "BC").unwrap();
    assert_eq!(bc.count, 1);
}

#[tokio::test]
async fn test_filtered_counts_require_available_matching_listing() {
    let counts = engine()
        .facets(FacetDimension::Province, CountMode::Filtered, &electricians_in(None))
        .await;

    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].value, "ON");
    assert_eq!(counts[0].count, 3);
}

#[tokio::test]
async fn test_city_counts_within_province() {
    let counts = engine()
        .facets(
            FacetDimension::City,
            CountMode::Filtered,
            &electricians_in(Some("ON")),
        )
        .await;

    assert_eq!(counts[0].value, "Toronto");
    assert_eq!(counts[0].count, 2);
    assert_eq!(counts[1].value, "Ottawa");
    assert_eq!(counts[1].count, 1);
}

#[tokio::test]
async fn test_category_counts_keep_zero_buckets() {
    let filter = SearchFilter {
        terms: vec![],
        province: Some("ON".to_string()),
        city: None,
        max_budget: None,
    };

    let counts = engine()
        .facets(FacetDimension::Category, CountMode::Unfiltered, &filter)
        .await;

    let dictionary = CategoryDictionary::builtin().unwrap();
    assert_eq!(counts.len(), dictionary.len());
    assert_eq!(counts[0].value, "Electricians");
    assert_eq!(counts[0].count, 3);
    assert_eq!(counts[1].value, "Plumbers");
    assert_eq!(counts[1].count, 1);
    assert!(counts[2..].iter().all(|c| c.count == 0));
}

#[tokio::test]
async fn test_repeated_nationwide_aggregation_is_stable() {
    let engine = engine();
    let filter = SearchFilter::default();

    let first = engine
        .facets(FacetDimension::Province, CountMode::Unfiltered, &filter)
        .await;
    let second = engine
        .facets(FacetDimension::Province, CountMode::Unfiltered, &filter)
        .await;

    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[tokio::test]
async fn test_pagination_covers_every_provider_once() {
    let engine = engine();
    let filter = electricians_in(Some("ON"));

    let mut seen: HashSet<i64> = HashSet::new();
    let mut page_no = 1;
    loop {
        let page = engine.search(&filter, page_no, 2).await;
        assert_eq!(page.total, 3);
        if page.items.is_empty() {
            break;
        }
        for item in &page.items {
            assert!(seen.insert(item.worker_id), "worker {} repeated", item.worker_id);
        }
        page_no += 1;
    }

    assert_eq!(seen.len(), 3);
}

#[tokio::test]
async fn test_page_past_the_end_is_empty_with_total() {
    let page = engine().search(&electricians_in(Some("ON")), 9, 20).await;
    assert!(page.items.is_empty());
    assert_eq!(page.total, 3);
}

#[tokio::test]
async fn test_unknown_service_type_matches_nothing() {
    let filter = SearchFilter {
        terms: vec!["snow removal".to_string()],
        province: None,
        city: None,
        max_budget: None,
    };

    let page = engine().search(&filter, 1, 20).await;
    assert_eq!(page.total, 0);
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn test_no_terms_means_every_available_listing() {
    let page = engine().search(&SearchFilter::default(), 1, 20).await;
    // Workers 1-4 have available listings; Eli's is unavailable
    assert_eq!(page.total, 4);
}
