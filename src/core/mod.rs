// Core engine exports
pub mod engine;
pub mod facets;
pub mod query;
pub mod ranking;
pub mod synonyms;

pub use engine::SearchEngine;
pub use facets::{by_city, by_province, distinct_worker_count, sort_counts, workers_by_city, workers_by_province};
pub use query::{BindValue, SearchPredicate, SqlFragment};
pub use ranking::rank;
pub use synonyms::{CategoryDictionary, DictionaryError, SynonymResolver};
