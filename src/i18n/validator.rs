//! Document language validation.
//!
//! This module checks that the text fields of a Strapi document are written
//! in the language its locale promises, flags fields that mix languages, and
//! reports when the backend served a fallback locale instead of the one
//! requested.

use crate::i18n::detector::{detect_language, detect_mixed_languages, MixedLanguageResult};
use crate::i18n::language::expected_language_for_locale;
use crate::i18n::status::{analyze_localization_status, LocalizationStatus};
use crate::i18n::{Language, DEFAULT_MIXED_THRESHOLD};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Strings at or below this many characters are treated as non-linguistic
/// (codes, slugs, short labels) and skipped.
pub const MIN_TEXT_FIELD_CHARS: usize = 10;

/// Tunables for `validate_document_language`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOptions {
    /// Also flag fields that mix several languages (default: true)
    pub check_mixed_languages: bool,
    /// Confidence (0-100) a wrong-language detection needs to count (default: 30)
    pub minimum_confidence: u8,
    /// Reject fallback content outright (default: false)
    pub strict_mode: bool,
    /// Share of words that makes a language "significant" (default: 0.15)
    pub mixed_threshold: f64,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            check_mixed_languages: true,
            minimum_confidence: 30,
            strict_mode: false,
            mixed_threshold: DEFAULT_MIXED_THRESHOLD,
        }
    }
}

impl ValidationOptions {
    pub fn strict(mut self, strict_mode: bool) -> Self {
        self.strict_mode = strict_mode;
        self
    }
}

/// Outcome of checking a single field against its expected language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentLanguageCheck {
    pub is_valid: bool,
    pub expected_language: String,
    pub detected_language: Option<Language>,
    pub confidence: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationDetails {
    pub field_validations: BTreeMap<String, ContentLanguageCheck>,
    pub mixed_language_checks: BTreeMap<String, MixedLanguageResult>,
    pub localization_status: LocalizationStatus,
}

/// Aggregated language validation of one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentValidationResult {
    /// True iff `warnings` is empty
    pub is_valid: bool,
    /// Locale the document was actually returned in
    pub locale: String,
    pub warnings: Vec<String>,
    pub details: ValidationDetails,
}

impl DocumentValidationResult {
    fn new(locale: String, warnings: Vec<String>, details: ValidationDetails) -> Self {
        Self {
            is_valid: warnings.is_empty(),
            locale,
            warnings,
            details,
        }
    }
}

/// Top-level string attributes longer than `MIN_TEXT_FIELD_CHARS`, in
/// document order. Non-object input yields nothing.
pub fn extract_text_fields(data: &Value) -> Vec<(String, String)> {
    let Some(object) = data.as_object() else {
        return Vec::new();
    };

    object
        .iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) if s.chars().count() > MIN_TEXT_FIELD_CHARS => {
                Some((key.clone(), s.clone()))
            }
            _ => None,
        })
        .collect()
}

/// Check that `content` is written in the language expected for `expected_locale`.
///
/// Only a confident detection of a *different* language is invalid; text the
/// detector can't classify always passes.
pub fn validate_content_language(
    content: &str,
    expected_locale: &str,
    minimum_confidence: u8,
) -> ContentLanguageCheck {
    let expected_language = expected_language_for_locale(expected_locale);
    let detection = detect_language(content);

    let Some(detected) = detection.detected_language else {
        return ContentLanguageCheck {
            is_valid: true,
            expected_language,
            detected_language: None,
            confidence: 0,
            warning: None,
        };
    };

    let mismatch = detected.code() != expected_language
        && detection.confidence >= minimum_confidence;

    let warning = mismatch.then(|| {
        format!(
            "Language mismatch: expected {} but detected {} (confidence: {}%)",
            expected_language.to_uppercase(),
            detected.code().to_uppercase(),
            detection.confidence
        )
    });

    ContentLanguageCheck {
        is_valid: !mismatch,
        expected_language,
        detected_language: Some(detected),
        confidence: detection.confidence,
        warning,
    }
}

/// Validate every substantial text field of `document` against `expected_locale`.
pub fn validate_document_language(
    document: &Value,
    expected_locale: &str,
    options: &ValidationOptions,
) -> DocumentValidationResult {
    let mut warnings = Vec::new();
    let mut field_validations = BTreeMap::new();
    let mut mixed_language_checks = BTreeMap::new();

    let localization_status = analyze_localization_status(document, Some(expected_locale));
    if let Some(warning) = &localization_status.warning {
        warnings.push(warning.clone());
    }

    if options.strict_mode && localization_status.inherited_from.is_some() {
        warnings.push(format!(
            "STRICT MODE: inherited content is not allowed. Locale \"{}\" has no translation of its own.",
            expected_locale
        ));
        let locale = localization_status.current_locale.clone();
        return DocumentValidationResult::new(
            locale,
            warnings,
            ValidationDetails {
                field_validations,
                mixed_language_checks,
                localization_status,
            },
        );
    }

    for (field, text) in extract_text_fields(document) {
        let check = validate_content_language(&text, expected_locale, options.minimum_confidence);
        if let Some(warning) = &check.warning {
            warnings.push(format!("Field \"{}\": {}", field, warning));
        }
        field_validations.insert(field.clone(), check);

        if options.check_mixed_languages {
            let mixed = detect_mixed_languages(&text, options.mixed_threshold);
            if let Some(warning) = mixed.warning.as_ref().filter(|_| mixed.is_mixed) {
                warnings.push(format!("Field \"{}\": {}", field, warning));
            }
            mixed_language_checks.insert(field, mixed);
        }
    }

    let locale = localization_status.current_locale.clone();
    DocumentValidationResult::new(
        locale,
        warnings,
        ValidationDetails {
            field_validations,
            mixed_language_checks,
            localization_status,
        },
    )
}

/// Scan the text fields of an outgoing payload for mixed-language content.
///
/// Returns one warning per mixed field, prefixed with the field name.
pub fn scan_mixed_languages(data: &Value, threshold: f64) -> Vec<String> {
    extract_text_fields(data)
        .into_iter()
        .filter_map(|(field, text)| {
            let mixed = detect_mixed_languages(&text, threshold);
            match (mixed.is_mixed, mixed.warning) {
                (true, Some(warning)) => Some(format!("Field \"{}\": {}", field, warning)),
                _ => None,
            }
        })
        .collect()
}

/// Render a validation result as a human-readable block.
pub fn format_validation_results(validation: &DocumentValidationResult) -> String {
    let status = &validation.details.localization_status;
    let mut lines = vec![
        String::new(),
        "Language validation:".to_string(),
        format!("   Current locale: {}", validation.locale),
        format!(
            "   Status: {}",
            if validation.is_valid { "valid" } else { "warnings detected" }
        ),
        String::new(),
        "Localization status:".to_string(),
        format!(
            "   Own translation: {}",
            if status.is_own_translation { "yes" } else { "no" }
        ),
        format!("   Available locales: {}", status.available_locales.join(", ")),
    ];

    if let Some(inherited) = &status.inherited_from {
        lines.push(format!("   Inherited from: {}", inherited));
    }

    if !validation.warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings:".to_string());
        lines.extend(validation.warnings.iter().map(|w| format!("   {}", w)));
    }

    lines.join("\n")
}
