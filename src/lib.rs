//! Kwikr Search - provider search and facet aggregation service
//!
//! This library is the single home of the marketplace's search logic:
//! service-type synonym resolution, parameterized query building, facet
//! aggregation, and provider ranking, shared by every caller.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{CategoryDictionary, SearchEngine, SearchPredicate, SynonymResolver};
pub use models::{
    CountMode, FacetCount, FacetDimension, RankedPage, RankedProvider, SearchFilter, SearchRequest,
};
