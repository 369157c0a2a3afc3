use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Common request shape for provider search and all facet endpoints,
/// accepted as either a query string or a JSON body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    #[serde(alias = "service_type", rename = "serviceType", default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[validate(custom(function = "validate_budget"))]
    #[serde(default)]
    pub budget: Option<f64>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub page: Option<u32>,
    // The upper bound is configured (search.max_limit) and enforced at
    // the handler, not here
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u32>,
}

impl SearchRequest {
    /// City aggregation only makes sense within a province
    pub fn province_or_err(&self) -> Result<&str, &'static str> {
        match self.province.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => Ok(p),
            _ => Err("province is required for city aggregation"),
        }
    }
}

fn validate_budget(budget: f64) -> Result<(), ValidationError> {
    if budget.is_finite() && budget > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new("budget_must_be_positive"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> SearchRequest {
        SearchRequest {
            service_type: Some("Electricians".to_string()),
            province: Some("ON".to_string()),
            city: None,
            budget: None,
            page: None,
            limit: None,
        }
    }

    #[test]
    fn test_valid_request() {
        let req = base_request();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_page() {
        let mut req = base_request();
        req.page = Some(0);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_limit() {
        let mut req = base_request();
        req.limit = Some(0);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_rejects_non_positive_budget() {
        let mut req = base_request();
        req.budget = Some(0.0);
        assert!(req.validate().is_err());

        req.budget = Some(-25.0);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_city_aggregation_needs_province() {
        let mut req = base_request();
        req.province = None;
        assert!(req.province_or_err().is_err());

        req.province = Some("   ".to_string());
        assert!(req.province_or_err().is_err());

        req.province = Some("BC".to_string());
        assert_eq!(req.province_or_err(), Ok("BC"));
    }
}
