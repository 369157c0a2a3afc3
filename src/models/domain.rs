use serde::{Deserialize, Serialize};

/// Worker identity and location data, as stored in the users table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerRecord {
    pub id: i64,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub province: String,
    pub city: String,
    #[serde(rename = "isVerified", default)]
    pub is_verified: bool,
    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_worker_role")]
    pub role: String,
}

impl WorkerRecord {
    /// True for rows that participate in search and aggregation
    pub fn searchable(&self) -> bool {
        self.is_active && self.role == "worker"
    }
}

fn default_true() -> bool {
    true
}

fn default_worker_role() -> String {
    "worker".to_string()
}

/// A service offered by a worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerServiceRecord {
    #[serde(rename = "workerId")]
    pub worker_id: i64,
    #[serde(rename = "serviceName")]
    pub service_name: String,
    #[serde(rename = "serviceCategory")]
    pub service_category: String,
    #[serde(rename = "hourlyRate")]
    pub hourly_rate: f64,
    #[serde(rename = "yearsExperience", default)]
    pub years_experience: i32,
    #[serde(rename = "isAvailable", default = "default_true")]
    pub is_available: bool,
    #[serde(rename = "serviceArea", default)]
    pub service_area: Option<String>,
}

/// One row of the worker / service join returned by the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderServiceRow {
    pub worker_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub province: String,
    pub city: String,
    pub is_verified: bool,
    pub service_name: String,
    pub service_category: String,
    pub hourly_rate: f64,
}

/// Slim worker projection used for unfiltered geography counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerRow {
    pub worker_id: i64,
    pub province: String,
    pub city: String,
}

/// Request-scoped filter built once per request and shared by every
/// consumer, so ranking and aggregation see identical semantics.
///
/// An empty `terms` list means "no category filter", never "match nothing".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilter {
    pub terms: Vec<String>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub max_budget: Option<f64>,
}

impl SearchFilter {
    pub fn has_terms(&self) -> bool {
        !self.terms.is_empty()
    }
}

/// Dimension over which facet counts are aggregated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetDimension {
    Province,
    City,
    Category,
}

impl FacetDimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacetDimension::Province => "province",
            FacetDimension::City => "city",
            FacetDimension::Category => "category",
        }
    }
}

/// Count semantics for facet aggregation.
///
/// `Unfiltered` counts all active workers in the geography regardless of
/// service availability; `Filtered` counts only workers with at least one
/// available matching service. Callers pick the mode explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountMode {
    Unfiltered,
    Filtered,
}

impl CountMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CountMode::Unfiltered => "unfiltered",
            CountMode::Filtered => "filtered",
        }
    }
}

/// A single facet bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    #[serde(rename = "dimensionValue")]
    pub value: String,
    pub count: usize,
}

/// A deduplicated, ranked provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedProvider {
    #[serde(rename = "workerId")]
    pub worker_id: i64,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "avgRate")]
    pub avg_rate: f64,
    pub verified: bool,
    pub province: String,
    pub city: String,
    #[serde(rename = "matchedServices")]
    pub matched_services: Vec<String>,
}

/// One page of ranked providers plus the pre-slice total
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankedPage {
    pub items: Vec<RankedProvider>,
    pub total: usize,
}
