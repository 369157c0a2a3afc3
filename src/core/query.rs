use crate::models::{SearchFilter, WorkerRecord, WorkerServiceRecord};

/// A single bound parameter, emitted in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Number(f64),
}

/// A rendered WHERE clause plus its binds. Binds are in exactly the same
/// order as the numbered placeholders in the clause.
#[derive(Debug, Clone)]
pub struct SqlFragment {
    pub clause: String,
    pub binds: Vec<BindValue>,
}

/// Parameterized filter predicate shared by search and aggregation.
///
/// Built once from a [`SearchFilter`] and consumed two ways with identical
/// semantics: rendered to parameterized SQL for the relational store, or
/// evaluated in memory against worker/service records. User input is never
/// interpolated into the clause text.
#[derive(Debug, Clone)]
pub struct SearchPredicate {
    terms: Vec<String>,
    province: Option<String>,
    city: Option<String>,
    max_budget: Option<f64>,
}

impl SearchPredicate {
    pub fn new(filter: &SearchFilter) -> Self {
        let mut terms: Vec<String> = Vec::with_capacity(filter.terms.len());
        for term in &filter.terms {
            let term = term.trim().to_lowercase();
            if !term.is_empty() && !terms.contains(&term) {
                terms.push(term);
            }
        }

        Self {
            terms,
            province: normalize_opt(&filter.province),
            city: normalize_opt(&filter.city),
            max_budget: filter.max_budget,
        }
    }

    pub fn has_terms(&self) -> bool {
        !self.terms.is_empty()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn province(&self) -> Option<&str> {
        self.province.as_deref()
    }

    /// Render the full worker-join predicate. Placeholders are numbered
    /// from `start`; binds are pushed in placeholder order.
    pub fn to_sql(&self, start: usize) -> SqlFragment {
        let mut clause = String::from(
            "u.role = 'worker' AND u.is_active = TRUE AND ws.is_available = TRUE",
        );
        let mut binds: Vec<BindValue> = Vec::new();
        let mut index = start;

        if !self.terms.is_empty() {
            let mut parts: Vec<String> = Vec::with_capacity(self.terms.len());
            for term in &self.terms {
                parts.push(format!(
                    "LOWER(ws.service_name) LIKE ${} OR LOWER(ws.service_category) LIKE ${}",
                    index,
                    index + 1
                ));
                let pattern = format!("%{}%", term);
                binds.push(BindValue::Text(pattern.clone()));
                binds.push(BindValue::Text(pattern));
                index += 2;
            }
            clause.push_str(&format!(" AND ({})", parts.join(" OR ")));
        }

        self.push_geography(&mut clause, &mut binds, &mut index);

        if let Some(budget) = self.max_budget {
            clause.push_str(&format!(" AND ws.hourly_rate <= ${}", index));
            binds.push(BindValue::Number(budget));
        }

        SqlFragment { clause, binds }
    }

    /// Render the geography-only predicate over the workers table, used for
    /// unfiltered counts (no service join, no budget).
    pub fn workers_sql(&self, start: usize) -> SqlFragment {
        let mut clause = String::from("u.role = 'worker' AND u.is_active = TRUE");
        let mut binds: Vec<BindValue> = Vec::new();
        let mut index = start;

        self.push_geography(&mut clause, &mut binds, &mut index);

        SqlFragment { clause, binds }
    }

    fn push_geography(&self, clause: &mut String, binds: &mut Vec<BindValue>, index: &mut usize) {
        if let Some(province) = &self.province {
            clause.push_str(&format!(" AND LOWER(u.province) = ${}", index));
            binds.push(BindValue::Text(province.clone()));
            *index += 1;
        }

        if let Some(city) = &self.city {
            clause.push_str(&format!(" AND LOWER(u.city) LIKE ${}", index));
            binds.push(BindValue::Text(format!("%{}%", city)));
            *index += 1;
        }
    }

    /// In-memory evaluation of the worker-side constraints
    pub fn matches_worker(&self, worker: &WorkerRecord) -> bool {
        if !worker.searchable() {
            return false;
        }

        if let Some(province) = &self.province {
            if worker.province.to_lowercase() != *province {
                return false;
            }
        }

        if let Some(city) = &self.city {
            if !worker.city.to_lowercase().contains(city.as_str()) {
                return false;
            }
        }

        true
    }

    /// In-memory evaluation of the service-side constraints. An empty term
    /// set omits the category clause entirely.
    pub fn matches_service(&self, service: &WorkerServiceRecord) -> bool {
        if !service.is_available {
            return false;
        }

        if let Some(budget) = self.max_budget {
            if service.hourly_rate > budget {
                return false;
            }
        }

        if self.terms.is_empty() {
            return true;
        }

        let name = service.service_name.to_lowercase();
        let category = service.service_category.to_lowercase();
        self.terms
            .iter()
            .any(|t| name.contains(t.as_str()) || category.contains(t.as_str()))
    }
}

fn normalize_opt(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}
