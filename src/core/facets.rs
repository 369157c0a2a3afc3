use crate::models::{FacetCount, ProviderServiceRow, WorkerRow};
use std::collections::{HashMap, HashSet};

/// Distinct workers per province among filtered join rows
pub fn by_province(rows: &[ProviderServiceRow]) -> Vec<FacetCount> {
    group_distinct(rows.iter().map(|r| (r.province.as_str(), r.worker_id)))
}

/// Distinct workers per city among filtered join rows
pub fn by_city(rows: &[ProviderServiceRow]) -> Vec<FacetCount> {
    group_distinct(rows.iter().map(|r| (r.city.as_str(), r.worker_id)))
}

/// Active workers per province, regardless of service availability
pub fn workers_by_province(workers: &[WorkerRow]) -> Vec<FacetCount> {
    group_distinct(workers.iter().map(|w| (w.province.as_str(), w.worker_id)))
}

/// Active workers per city, regardless of service availability
pub fn workers_by_city(workers: &[WorkerRow]) -> Vec<FacetCount> {
    group_distinct(workers.iter().map(|w| (w.city.as_str(), w.worker_id)))
}

/// Number of distinct workers in a set of join rows
pub fn distinct_worker_count(rows: &[ProviderServiceRow]) -> usize {
    rows.iter().map(|r| r.worker_id).collect::<HashSet<_>>().len()
}

/// Sort facet buckets: count descending, ties by value ascending, so
/// output is deterministic and testable.
pub fn sort_counts(mut counts: Vec<FacetCount>) -> Vec<FacetCount> {
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    counts
}

fn group_distinct<'a, I>(pairs: I) -> Vec<FacetCount>
where
    I: Iterator<Item = (&'a str, i64)>,
{
    let mut groups: HashMap<&str, HashSet<i64>> = HashMap::new();
    for (value, worker_id) in pairs {
        groups.entry(value).or_default().insert(worker_id);
    }

    let counts = groups
        .into_iter()
        .map(|(value, workers)| FacetCount {
            value: value.to_string(),
            count: workers.len(),
        })
        .collect();

    sort_counts(counts)
}
