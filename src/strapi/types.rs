use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// A locale configured in the Strapi i18n plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_default: bool,
}

fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// Standard `{data, meta}` envelope returned by the content API.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StrapiResponse {
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

/// Find the raw locale entries in a listing.
///
/// Strapi versions disagree on the envelope, so each known shape is tried
/// in order: bare array, `{data: [...]}`, `{locales: [...]}`.
/// Returns `None` when none of them match.
pub fn locale_entries(body: &Value) -> Option<&[Value]> {
    let list = if body.is_array() {
        body
    } else {
        ["data", "locales"]
            .iter()
            .filter_map(|key| body.get(key))
            .find(|v| v.is_array())?
    };

    list.as_array().map(Vec::as_slice)
}

/// Decode a locale listing, dropping entries that are not locales.
///
/// Only an unknown envelope is a failure; a malformed entry is skipped.
pub fn parse_locale_list(body: &Value) -> Option<Vec<LocaleEntry>> {
    let entries = locale_entries(body)?;

    Some(
        entries
            .iter()
            .filter_map(|entry| match LocaleEntry::deserialize(entry) {
                Ok(locale) => Some(locale),
                Err(e) => {
                    warn!("Skipping malformed locale entry {}: {}", entry, e);
                    None
                }
            })
            .collect(),
    )
}

/// The default locale of a listing: the flagged entry, else the first one.
pub fn default_locale(locales: &[LocaleEntry]) -> Option<&LocaleEntry> {
    locales.iter().find(|l| l.is_default).or_else(|| locales.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!([
            {"id": 1, "name": "Spanish (es)", "code": "es", "isDefault": true},
            {"id": 2, "name": "English (en)", "code": "en", "isDefault": false}
        ])
    }

    #[test]
    fn test_parse_bare_array() {
        let locales = parse_locale_list(&sample()).unwrap();
        assert_eq!(locales.len(), 2);
        assert_eq!(locales[0].code, "es");
        assert!(locales[0].is_default);
        assert_eq!(locales[1].name.as_deref(), Some("English (en)"));
    }

    #[test]
    fn test_parse_data_envelope() {
        let locales = parse_locale_list(&json!({"data": sample()})).unwrap();
        assert_eq!(locales.len(), 2);
    }

    #[test]
    fn test_parse_locales_envelope() {
        let locales = parse_locale_list(&json!({"locales": [{"code": "ca"}]})).unwrap();
        assert_eq!(locales[0].code, "ca");
        assert!(!locales[0].is_default);
        assert!(locales[0].id.is_none());
    }

    #[test]
    fn test_parse_unknown_shape() {
        assert!(parse_locale_list(&json!({"items": []})).is_none());
        assert!(parse_locale_list(&json!("es")).is_none());
        assert!(parse_locale_list(&json!({"data": {"code": "es"}})).is_none());
    }

    #[test]
    fn test_parse_skips_malformed_entries() {
        let locales = parse_locale_list(&json!([{"code": "es"}, {"name": "broken"}])).unwrap();
        assert_eq!(locales.len(), 1);
        assert_eq!(locales[0].code, "es");

        let none_valid = parse_locale_list(&json!([{"name": "Spanish"}])).unwrap();
        assert!(none_valid.is_empty());
    }

    #[test]
    fn test_parse_null_default_flag() {
        let locales =
            parse_locale_list(&json!([{"code": "es", "isDefault": null}, {"code": "en"}])).unwrap();
        assert_eq!(locales.len(), 2);
        assert!(!locales[0].is_default);
    }

    #[test]
    fn test_locale_entries_keep_raw_fields() {
        let body = json!({"data": [{"id": 1, "documentId": "loc1", "code": "es", "createdAt": "2024-01-01"}]});
        let entries = locale_entries(&body).unwrap();
        assert_eq!(entries[0]["documentId"], "loc1");
        assert_eq!(entries[0]["createdAt"], "2024-01-01");
        assert!(locale_entries(&json!({"items": []})).is_none());
    }

    #[test]
    fn test_default_locale() {
        let locales = parse_locale_list(&sample()).unwrap();
        assert_eq!(default_locale(&locales).unwrap().code, "es");

        let unflagged = parse_locale_list(&json!([{"code": "fr"}, {"code": "de"}])).unwrap();
        assert_eq!(default_locale(&unflagged).unwrap().code, "fr");

        assert!(default_locale(&[]).is_none());
    }

    #[test]
    fn test_strapi_response_defaults() {
        let resp: StrapiResponse = serde_json::from_value(json!({})).unwrap();
        assert!(resp.data.is_null());
        assert!(resp.meta.is_none());
    }
}
