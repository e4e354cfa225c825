//! Strapi REST query-string marshaling.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Pagination options; Strapi accepts page-based or offset-based.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub start: Option<u32>,
    pub limit: Option<u32>,
}

/// Query parameters understood by the Strapi content API.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pub fields: Vec<String>,
    /// Relations to populate; `["*"]` populates everything
    pub populate: Vec<String>,
    pub filters: Map<String, Value>,
    pub sort: Vec<String>,
    pub pagination: Option<Pagination>,
    pub publication_state: Option<String>,
    pub locale: Option<String>,
}

impl QueryParams {
    pub fn with_locale(mut self, locale: Option<&str>) -> Self {
        self.locale = locale.filter(|l| !l.is_empty()).map(str::to_string);
        self
    }

    pub fn with_populate(mut self, populate: &[String]) -> Self {
        self.populate = populate.to_vec();
        self
    }

    pub fn with_fields(mut self, fields: &[String]) -> Self {
        self.fields = fields.to_vec();
        self
    }

    /// Flatten into ordered `(key, value)` pairs in Strapi's bracket notation.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        for field in &self.fields {
            pairs.push(("fields[]".to_string(), field.clone()));
        }

        match self.populate.as_slice() {
            [] => {}
            [all] if all == "*" => pairs.push(("populate".to_string(), "*".to_string())),
            relations => {
                for relation in relations {
                    pairs.push(("populate[]".to_string(), relation.clone()));
                }
            }
        }

        for (key, value) in &self.filters {
            flatten_into(&format!("filters[{}]", key), value, &mut pairs);
        }

        for sort in &self.sort {
            pairs.push(("sort[]".to_string(), sort.clone()));
        }

        if let Some(pagination) = &self.pagination {
            let entries = [
                ("page", pagination.page),
                ("pageSize", pagination.page_size),
                ("start", pagination.start),
                ("limit", pagination.limit),
            ];
            for (name, value) in entries {
                if let Some(value) = value {
                    pairs.push((format!("pagination[{}]", name), value.to_string()));
                }
            }
        }

        if let Some(state) = &self.publication_state {
            pairs.push(("publicationState".to_string(), state.clone()));
        }

        if let Some(locale) = &self.locale {
            pairs.push(("locale".to_string(), locale.clone()));
        }

        pairs
    }
}

/// qs-style flattening: `{"title": {"$eq": "x"}}` → `filters[title][$eq]=x`.
pub(crate) fn flatten_into(prefix: &str, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                flatten_into(&format!("{}[{}]", prefix, key), nested, pairs);
            }
        }
        Value::Array(items) => {
            for (i, nested) in items.iter().enumerate() {
                flatten_into(&format!("{}[{}]", prefix, i), nested, pairs);
            }
        }
        Value::String(s) => pairs.push((prefix.to_string(), s.clone())),
        Value::Null => pairs.push((prefix.to_string(), "null".to_string())),
        other => pairs.push((prefix.to_string(), other.to_string())),
    }
}
