//! Locale reconciliation against the locales configured on the backend.
//!
//! Callers ask for locales like "es-ES" while a Strapi instance may only have
//! "es" configured. Reconciliation maps a requested code onto an available
//! one (exact match, then same base language) and never invents a locale.

use crate::i18n::language::base_language;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    #[error("Locale {requested} is not available. Available locales: {}", .available.join(", "))]
    NotAvailable {
        requested: String,
        available: Vec<String>,
    },
}

/// A requested locale mapped onto an available one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLocale {
    pub requested: String,
    pub locale: String,
}

impl ResolvedLocale {
    /// True when the base-language fallback picked a different code.
    pub fn is_substituted(&self) -> bool {
        self.requested != self.locale
    }

    /// Notice describing the substitution, if any.
    pub fn notice(&self) -> Option<String> {
        self.is_substituted().then(|| {
            format!(
                "Locale {} not found, using {} instead",
                self.requested, self.locale
            )
        })
    }
}

/// Map `requested` onto a member of `available`.
///
/// 1. exact membership returns `requested` unchanged;
/// 2. otherwise the first available entry sharing its base language;
/// 3. otherwise `LocaleError::NotAvailable`.
pub fn reconcile_locale(requested: &str, available: &[String]) -> Result<ResolvedLocale, LocaleError> {
    if available.iter().any(|loc| loc == requested) {
        return Ok(ResolvedLocale {
            requested: requested.to_string(),
            locale: requested.to_string(),
        });
    }

    let base = base_language(requested);
    available
        .iter()
        .find(|loc| base_language(loc) == base)
        .map(|loc| ResolvedLocale {
            requested: requested.to_string(),
            locale: loc.clone(),
        })
        .ok_or_else(|| LocaleError::NotAvailable {
            requested: requested.to_string(),
            available: available.to_vec(),
        })
}

/// Why an additional locale was left out of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "reason")]
pub enum SkipReason {
    /// No exact or base-language match on the backend
    NotAvailable,
    /// Resolved to the locale already used for the base record
    DuplicatesDefault { resolved: String },
}

/// An additional locale dropped from a batch, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedLocale {
    pub requested: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

impl SkippedLocale {
    pub fn message(&self) -> String {
        match &self.reason {
            SkipReason::NotAvailable => {
                format!("Skipping locale {} - not available in Strapi", self.requested)
            }
            SkipReason::DuplicatesDefault { resolved } => {
                format!("Skipping locale {} - {} is already the default locale", self.requested, resolved)
            }
        }
    }
}

/// One additional locale and its payload, as requested by the caller.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct LocalizationRequest {
    pub locale: String,
    pub data: Map<String, Value>,
}

/// An additional locale that survived reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedLocalization {
    pub resolved: ResolvedLocale,
    pub data: Map<String, Value>,
}

/// Result of reconciling every additional locale in a request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LocalizationPlan {
    /// Kept entries in caller order
    pub planned: Vec<PlannedLocalization>,
    pub skipped: Vec<SkippedLocale>,
}

/// Reconcile a batch of additional locales against `available`.
///
/// Unmatched entries and entries resolving to `default_locale` are skipped
/// (a single bad locale must not abort the rest). Caller order is preserved.
pub fn plan_localizations(
    requests: &[LocalizationRequest],
    default_locale: &str,
    available: &[String],
) -> LocalizationPlan {
    let mut plan = LocalizationPlan::default();

    for request in requests {
        let skipped = match reconcile_locale(&request.locale, available) {
            Ok(resolved) if resolved.locale == default_locale => SkippedLocale {
                requested: request.locale.clone(),
                reason: SkipReason::DuplicatesDefault {
                    resolved: resolved.locale,
                },
            },
            Ok(resolved) => {
                if let Some(notice) = resolved.notice() {
                    warn!("{}", notice);
                }
                plan.planned.push(PlannedLocalization {
                    resolved,
                    data: request.data.clone(),
                });
                continue;
            }
            Err(_) => SkippedLocale {
                requested: request.locale.clone(),
                reason: SkipReason::NotAvailable,
            },
        };

        warn!("{}", skipped.message());
        plan.skipped.push(skipped);
    }

    plan
}
