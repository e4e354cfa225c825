//! Heuristic language detection based on function-word frequency.
//!
//! This is a bounded heuristic, not a classifier: short or jargon-heavy text
//! routinely yields no detection, and closely related languages (es/ca/it)
//! share many function words. Callers treat "no detection" as "unknown".

use crate::i18n::Language;
use serde::Serialize;
use std::collections::BTreeMap;

/// Default share of words a language needs to count as significantly present.
pub const DEFAULT_MIXED_THRESHOLD: f64 = 0.15;

/// Match count per supported language.
pub type LanguageScores = BTreeMap<Language, usize>;

/// Result of scoring a text against every supported language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    /// Top-scoring language, absent when nothing matched
    pub detected_language: Option<Language>,
    /// Top score as a percentage of words, capped at 100
    pub confidence: u8,
    pub language_scores: LanguageScores,
}

impl DetectionResult {
    fn empty(language_scores: LanguageScores) -> Self {
        Self {
            detected_language: None,
            confidence: 0,
            language_scores,
        }
    }
}

/// Result of checking a text for significant presence of several languages.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MixedLanguageResult {
    pub is_mixed: bool,
    /// Significant languages by descending score (or the single detected one)
    pub languages: Vec<Language>,
    pub scores: LanguageScores,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn percentage(count: usize, words: usize) -> u8 {
    let pct = (count as f64 / words as f64 * 100.0).round();
    pct.min(100.0) as u8
}

/// Detect the primary language of `text`.
///
/// Ties between positive scores go to the language declared first in
/// `Language::ALL` (es, en, ca, fr, de, it).
pub fn detect_language(text: &str) -> DetectionResult {
    if text.trim().is_empty() {
        return DetectionResult::empty(LanguageScores::new());
    }

    let scores: LanguageScores = Language::ALL
        .into_iter()
        .map(|lang| (lang, lang.count_matches(text)))
        .collect();

    // First language reaching the maximum, in enumeration order
    let mut top: Option<(Language, usize)> = None;
    for lang in Language::ALL {
        let score = scores[&lang];
        if top.map_or(true, |(_, best)| score > best) {
            top = Some((lang, score));
        }
    }

    match top {
        Some((lang, score)) if score > 0 => DetectionResult {
            detected_language: Some(lang),
            confidence: percentage(score, word_count(text)),
            language_scores: scores,
        },
        _ => DetectionResult::empty(scores),
    }
}

/// Check whether `text` has significant presence of more than one language.
///
/// A language is significant when `score / words >= threshold`.
pub fn detect_mixed_languages(text: &str, threshold: f64) -> MixedLanguageResult {
    if text.trim().is_empty() {
        return MixedLanguageResult {
            is_mixed: false,
            languages: Vec::new(),
            scores: LanguageScores::new(),
            warning: None,
        };
    }

    let detection = detect_language(text);
    let words = word_count(text);

    let mut significant: Vec<(Language, usize)> = detection
        .language_scores
        .iter()
        .filter(|(_, &count)| count > 0 && count as f64 / words as f64 >= threshold)
        .map(|(&lang, &count)| (lang, count))
        .collect();
    // Stable sort keeps enumeration order among equal scores
    significant.sort_by(|a, b| b.1.cmp(&a.1));

    if significant.len() > 1 {
        let breakdown = significant
            .iter()
            .map(|(lang, count)| {
                format!(
                    "{} ({}%)",
                    lang.code().to_uppercase(),
                    percentage(*count, words)
                )
            })
            .collect::<Vec<_>>()
            .join(", ");

        return MixedLanguageResult {
            is_mixed: true,
            languages: significant.into_iter().map(|(lang, _)| lang).collect(),
            scores: detection.language_scores,
            warning: Some(format!("Mixed-language content detected: {}", breakdown)),
        };
    }

    MixedLanguageResult {
        is_mixed: false,
        languages: detection.detected_language.into_iter().collect(),
        scores: detection.language_scores,
        warning: None,
    }
}
