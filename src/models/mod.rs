// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    CountMode, FacetCount, FacetDimension, ProviderServiceRow, RankedPage, RankedProvider,
    SearchFilter, WorkerRecord, WorkerRow, WorkerServiceRecord,
};
pub use requests::SearchRequest;
pub use responses::{ApiResponse, HealthResponse};
