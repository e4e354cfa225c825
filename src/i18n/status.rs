//! Localization status of a fetched Strapi document.

use serde::Serialize;
use serde_json::Value;

/// Locale reported when a document carries no `locale` attribute.
pub const UNKNOWN_LOCALE: &str = "unknown";

/// Which locale a document was returned in and which variants it knows about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizationStatus {
    pub document_id: Option<String>,
    pub current_locale: String,
    /// Presence check on the document identifier. Every record fetched by id
    /// has one, so this is effectively always true; kept as reported by the
    /// backend rather than guessed at.
    pub is_own_translation: bool,
    /// Current locale first, then each related localization
    pub available_locales: Vec<String>,
    /// Set when a locale was requested and the backend returned another one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherited_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Identifier of a record: `documentId` (Strapi v5) or the numeric `id`.
pub fn document_identifier(document: &Value) -> Option<String> {
    ["documentId", "id"]
        .iter()
        .filter_map(|key| document.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

/// Analyze `document` against an optionally requested locale.
///
/// An empty requested locale counts as "not requested".
pub fn analyze_localization_status(document: &Value, requested_locale: Option<&str>) -> LocalizationStatus {
    let document_id = document_identifier(document);
    let current_locale = document
        .get("locale")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_LOCALE)
        .to_string();

    let mut available_locales = vec![current_locale.clone()];
    if let Some(localizations) = document.get("localizations").and_then(Value::as_array) {
        available_locales.extend(
            localizations
                .iter()
                .filter_map(|loc| loc.get("locale").and_then(Value::as_str))
                .map(str::to_string),
        );
    }

    let (inherited_from, warning) = match requested_locale.filter(|l| !l.is_empty()) {
        Some(requested) if requested != current_locale => (
            Some(current_locale.clone()),
            Some(format!(
                "Requested locale \"{}\" not found. Showing fallback from \"{}\". \
                 This content may not have its own \"{}\" translation.",
                requested, current_locale, requested
            )),
        ),
        _ => (None, None),
    };

    LocalizationStatus {
        is_own_translation: document_id.is_some(),
        document_id,
        current_locale,
        available_locales,
        inherited_from,
        warning,
    }
}
