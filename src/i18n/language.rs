//! Supported content languages and their function-word patterns.
//!
//! The set of languages is closed: adding one means adding a variant here,
//! its entry in `Language::ALL`, and its word list in `Language::words`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// A language the detector can score text against.
///
/// Variant order is the detector's tie-break order: when two languages reach
/// the same top score, the one declared first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Es,
    En,
    Ca,
    Fr,
    De,
    It,
}

// Compiled patterns, indexed like `Language::ALL`
static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

impl Language {
    /// All supported languages in tie-break order.
    pub const ALL: [Language; 6] = [
        Language::Es,
        Language::En,
        Language::Ca,
        Language::Fr,
        Language::De,
        Language::It,
    ];

    /// ISO 639-1 code (e.g. "es").
    pub fn code(&self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::En => "en",
            Language::Ca => "ca",
            Language::Fr => "fr",
            Language::De => "de",
            Language::It => "it",
        }
    }

    /// English name of the language.
    pub fn name(&self) -> &'static str {
        match self {
            Language::Es => "Spanish",
            Language::En => "English",
            Language::Ca => "Catalan",
            Language::Fr => "French",
            Language::De => "German",
            Language::It => "Italian",
        }
    }

    /// Look up a language by its ISO 639-1 code. Case-insensitive.
    pub fn from_code(code: &str) -> Option<Language> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code))
    }

    /// Function words counted as evidence for this language.
    fn words(&self) -> &'static [&'static str] {
        match self {
            Language::Es => &[
                "el", "la", "los", "las", "un", "una", "de", "del", "en", "por", "para", "con",
                "que", "como", "pero", "más", "muy", "esto", "esta", "este", "estos", "estas",
                "son", "está", "están", "hay", "ser", "fue", "sido",
            ],
            Language::En => &[
                "the", "a", "an", "of", "in", "on", "at", "to", "for", "with", "and", "or", "but",
                "is", "are", "was", "were", "be", "been", "have", "has", "had", "this", "that",
                "these", "those",
            ],
            Language::Ca => &[
                "el", "la", "els", "les", "un", "una", "de", "del", "en", "per", "amb", "que",
                "com", "però", "més", "molt", "això", "aquesta", "aquest", "aquests", "aquestes",
                "són", "està", "estan", "hi", "ser", "fou", "estat",
            ],
            Language::Fr => &[
                "le", "la", "les", "un", "une", "de", "du", "des", "en", "dans", "sur", "pour",
                "avec", "et", "ou", "mais", "est", "sont", "être", "été", "avoir", "a", "eu", "ce",
                "cette", "ces",
            ],
            Language::De => &[
                "der", "die", "das", "den", "dem", "des", "ein", "eine", "einem", "eines", "und",
                "oder", "aber", "ist", "sind", "war", "waren", "sein", "gewesen", "haben", "hat",
                "hatte",
            ],
            Language::It => &[
                "il", "lo", "la", "i", "gli", "le", "un", "uno", "una", "di", "da", "in", "su",
                "per", "con", "e", "o", "ma", "è", "sono", "era", "erano", "essere", "stato",
                "avere", "ha", "questo", "questa",
            ],
        }
    }

    /// Case-insensitive whole-word pattern over this language's function words.
    pub fn pattern(&self) -> &'static Regex {
        let patterns = PATTERNS.get_or_init(|| {
            Language::ALL
                .iter()
                .map(|lang| {
                    let alternation = lang
                        .words()
                        .iter()
                        .map(|w| regex::escape(w))
                        .collect::<Vec<_>>()
                        .join("|");
                    // Word lists are static; a failure here is a programming error caught by tests
                    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation))
                        .unwrap_or_else(|e| panic!("invalid pattern for {}: {}", lang.code(), e))
                })
                .collect()
        });

        &patterns[*self as usize]
    }

    /// Count non-overlapping function-word matches in `text`.
    pub fn count_matches(&self, text: &str) -> usize {
        self.pattern().find_iter(text).count()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Locale codes with a known content language.
const LOCALE_TO_LANGUAGE: &[(&str, &str)] = &[
    ("es", "es"),
    ("es-ES", "es"),
    ("en", "en"),
    ("en-US", "en"),
    ("en-GB", "en"),
    ("ca", "ca"),
    ("ca-ES", "ca"),
    ("fr", "fr"),
    ("fr-FR", "fr"),
    ("de", "de"),
    ("de-DE", "de"),
    ("it", "it"),
    ("it-IT", "it"),
];

/// Base-language prefix of a locale code: everything before the first `-`.
///
/// ```
/// use strapi_i18n_mcp::i18n::base_language;
/// assert_eq!(base_language("es-ES"), "es");
/// assert_eq!(base_language("ca"), "ca");
/// ```
pub fn base_language(locale: &str) -> &str {
    locale.split('-').next().unwrap_or(locale)
}

/// Expected language code for content stored under `locale`.
///
/// Exact table lookup first, then the locale's base-language prefix. The
/// result may name a language the detector does not support (e.g. "pt").
pub fn expected_language_for_locale(locale: &str) -> String {
    LOCALE_TO_LANGUAGE
        .iter()
        .find(|(loc, _)| *loc == locale)
        .map(|(_, lang)| lang.to_string())
        .unwrap_or_else(|| base_language(locale).to_string())
}
