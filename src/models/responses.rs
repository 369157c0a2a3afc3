use serde::{Deserialize, Serialize};

/// Uniform envelope for search and facet endpoints.
///
/// "No results" is a success with empty `data`; only validation failures
/// and unexpected errors set `success: false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: Vec<T>, total: Option<usize>) -> Self {
        Self {
            success: true,
            data,
            total,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Vec::new(),
            total: None,
            error: Some(message.into()),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FacetCount;

    #[test]
    fn test_ok_envelope_omits_error() {
        let response = ApiResponse::ok(
            vec![FacetCount {
                value: "ON".to_string(),
                count: 12,
            }],
            None,
        );
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("error").is_none());
        assert!(json.get("total").is_none());
    }

    #[test]
    fn test_error_envelope_has_empty_data() {
        let response = ApiResponse::<FacetCount>::error("budget: must be positive");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["data"].as_array().unwrap().len(), 0);
        assert_eq!(json["error"], "budget: must be positive");
    }
}
