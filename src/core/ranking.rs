use crate::models::{ProviderServiceRow, RankedPage, RankedProvider};
use std::collections::HashMap;

/// Deduplicate join rows by worker, derive display fields, sort, paginate.
///
/// Sort order: verified first, then cheapest average rate, then worker id
/// ascending so the order is total and pagination is reproducible. The full
/// ranked list is materialized before slicing; `total` is its pre-slice
/// length.
pub fn rank(rows: &[ProviderServiceRow], page: u32, limit: u32) -> RankedPage {
    struct Group {
        first_name: String,
        last_name: String,
        province: String,
        city: String,
        verified: bool,
        rates: Vec<f64>,
        services: Vec<String>,
    }

    let mut order: Vec<i64> = Vec::new();
    let mut groups: HashMap<i64, Group> = HashMap::new();

    for row in rows {
        let group = groups.entry(row.worker_id).or_insert_with(|| {
            order.push(row.worker_id);
            Group {
                first_name: row.first_name.clone(),
                last_name: row.last_name.clone(),
                province: row.province.clone(),
                city: row.city.clone(),
                verified: row.is_verified,
                rates: Vec::new(),
                services: Vec::new(),
            }
        });

        group.rates.push(row.hourly_rate);
        if !group.services.contains(&row.service_name) {
            group.services.push(row.service_name.clone());
        }
    }

    let mut providers: Vec<RankedProvider> = order
        .into_iter()
        .filter_map(|worker_id| {
            let group = groups.remove(&worker_id)?;
            let avg_rate = group.rates.iter().sum::<f64>() / group.rates.len() as f64;
            Some(RankedProvider {
                worker_id,
                display_name: format!("{} {}", group.first_name, group.last_name),
                avg_rate,
                verified: group.verified,
                province: group.province,
                city: group.city,
                matched_services: group.services,
            })
        })
        .collect();

    providers.sort_by(|a, b| {
        b.verified
            .cmp(&a.verified)
            .then_with(|| {
                a.avg_rate
                    .partial_cmp(&b.avg_rate)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.worker_id.cmp(&b.worker_id))
    });

    let total = providers.len();
    let start = (page.saturating_sub(1) as usize) * limit as usize;
    let items: Vec<RankedProvider> = providers
        .into_iter()
        .skip(start)
        .take(limit as usize)
        .collect();

    RankedPage { items, total }
}
