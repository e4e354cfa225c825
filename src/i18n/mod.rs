//! Multilingual content consistency.
//!
//! Heuristic language detection and locale handling for Strapi content.
//! Nothing here talks to the backend; every function works on values
//! already fetched (or about to be sent).
//!
//! # Architecture
//!
//! - `language`: Closed set of supported languages and their function-word patterns
//! - `detector`: Language detection and mixed-language analysis
//! - `status`: Fallback / localization status of a fetched document
//! - `validator`: Per-document validation orchestrating the above
//! - `locale`: Reconciling requested locale codes with the ones the backend has
//!
//! # Example
//!
//! ```
//! use strapi_i18n_mcp::i18n::{detect_language, reconcile_locale, Language};
//!
//! let detection = detect_language("the quick brown fox and the lazy dog");
//! assert_eq!(detection.detected_language, Some(Language::En));
//!
//! let available = vec!["es".to_string(), "en".to_string()];
//! assert_eq!(reconcile_locale("es-ES", &available).unwrap().locale, "es");
//! ```

mod detector;
mod language;
mod locale;
mod status;
mod validator;

pub use detector::{
    detect_language, detect_mixed_languages, DetectionResult, LanguageScores, MixedLanguageResult,
    DEFAULT_MIXED_THRESHOLD,
};
pub use language::{base_language, expected_language_for_locale, Language};
pub use locale::{
    plan_localizations, reconcile_locale, LocaleError, LocalizationPlan, LocalizationRequest,
    PlannedLocalization, ResolvedLocale, SkipReason, SkippedLocale,
};
pub use status::{analyze_localization_status, document_identifier, LocalizationStatus, UNKNOWN_LOCALE};
pub use validator::{
    extract_text_fields, format_validation_results, scan_mixed_languages,
    validate_content_language, validate_document_language, ContentLanguageCheck,
    DocumentValidationResult, ValidationDetails, ValidationOptions,
};
