//! Multi-locale creation.
//!
//! Strapi v5 keeps every locale of an entry under one `documentId`: the base
//! record is created under the default locale, then the same document is
//! updated once per additional locale. The backend offers no transaction, so
//! the steps commit one by one and a failure part-way leaves the earlier
//! writes in place. `WorkflowError::LocaleUpdate` reports exactly what was
//! committed.

use crate::i18n::{document_identifier, plan_localizations, reconcile_locale, LocaleError};
use crate::i18n::{LocalizationRequest, SkippedLocale};
use crate::strapi::{ContentBackend, QueryParams, StrapiError};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    /// Request checks, before any backend call
    ValidateRequest,
    FetchLocales,
    ReconcileDefault,
    ReconcileExtras,
    CreateBase,
    /// Zero-based index into the kept additional locales
    UpdateLocale(usize),
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowStep::ValidateRequest => write!(f, "validate request"),
            WorkflowStep::FetchLocales => write!(f, "fetch locales"),
            WorkflowStep::ReconcileDefault => write!(f, "reconcile default locale"),
            WorkflowStep::ReconcileExtras => write!(f, "reconcile additional locales"),
            WorkflowStep::CreateBase => write!(f, "create base entry"),
            WorkflowStep::UpdateLocale(i) => write!(f, "update locale #{}", i + 1),
        }
    }
}

/// A request to create one entry in several locales.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateWithLocalesRequest {
    /// Plural API name, e.g. "articles"
    pub content_type: String,
    pub default_locale: String,
    pub data: Map<String, Value>,
    pub localizations: Vec<LocalizationRequest>,
    pub populate: Vec<String>,
}

/// The base record as committed under the default locale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEntry {
    pub document_id: String,
    pub locale: String,
    pub data: Value,
}

/// One additional locale successfully written to the base document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedLocalization {
    pub locale: String,
    pub requested_locale: String,
    pub document_id: String,
    pub data: Value,
}

/// State left on the backend when an update fails part-way.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialCreation {
    pub main_entry: CreatedEntry,
    /// Committed, in application order
    pub localizations: Vec<AppliedLocalization>,
    /// Not written: the failed locale first, then the ones never attempted
    pub pending_locales: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationOutcome {
    pub default_locale: String,
    pub requested_default_locale: String,
    pub locales_created: usize,
    pub available_locales: Vec<String>,
    pub used_locales: Vec<String>,
    pub skipped_locales: Vec<SkippedLocale>,
    pub main_entry: CreatedEntry,
    pub localizations: Vec<AppliedLocalization>,
}

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("data cannot be empty. Provide at least the required fields.")]
    EmptyData,

    #[error("Error fetching available locales: {0}. Make sure the i18n plugin is enabled in Strapi.")]
    LocaleFetch(#[source] StrapiError),

    #[error(transparent)]
    DefaultLocale(#[from] LocaleError),

    #[error("Data for locale {locale} cannot be empty")]
    EmptyLocalizationData { locale: String },

    #[error("Error creating entry in {locale}: {source}")]
    BaseCreate {
        locale: String,
        #[source]
        source: StrapiError,
    },

    #[error("Entry created in {locale} but the response carried no documentId or id")]
    MissingDocumentId { locale: String, record: Value },

    #[error("Error creating localization {locale}: {source}")]
    LocaleUpdate {
        locale: String,
        index: usize,
        #[source]
        source: StrapiError,
        partial: Box<PartialCreation>,
    },
}

impl WorkflowError {
    /// Step at which the workflow stopped.
    pub fn step(&self) -> WorkflowStep {
        match self {
            WorkflowError::EmptyData => WorkflowStep::ValidateRequest,
            WorkflowError::LocaleFetch(_) => WorkflowStep::FetchLocales,
            WorkflowError::DefaultLocale(_) => WorkflowStep::ReconcileDefault,
            WorkflowError::EmptyLocalizationData { .. } => WorkflowStep::ReconcileExtras,
            WorkflowError::BaseCreate { .. } | WorkflowError::MissingDocumentId { .. } => {
                WorkflowStep::CreateBase
            }
            WorkflowError::LocaleUpdate { index, .. } => WorkflowStep::UpdateLocale(*index),
        }
    }

    /// Committed state when the failure happened after the base record was written.
    pub fn partial(&self) -> Option<&PartialCreation> {
        match self {
            WorkflowError::LocaleUpdate { partial, .. } => Some(partial),
            _ => None,
        }
    }

    /// True if the backend was modified before the failure.
    pub fn left_partial_state(&self) -> bool {
        matches!(
            self,
            WorkflowError::LocaleUpdate { .. } | WorkflowError::MissingDocumentId { .. }
        )
    }
}

/// Create an entry under a default locale, then add each extra locale to it.
///
/// Locales are reconciled against those configured on the backend. Extra
/// locales that cannot be matched, or that resolve to the default locale, are
/// skipped. Updates run strictly in caller order, one at a time.
pub async fn create_with_locales<B: ContentBackend>(
    backend: &B,
    request: &CreateWithLocalesRequest,
) -> Result<CreationOutcome, WorkflowError> {
    info!(
        "Creating entry in {} with {} locale(s)",
        request.content_type,
        request.localizations.len() + 1
    );

    if request.data.is_empty() {
        return Err(WorkflowError::EmptyData);
    }

    info!("Step 0: Fetching available locales");
    let available: Vec<String> = backend
        .list_locales()
        .await
        .map_err(WorkflowError::LocaleFetch)?
        .into_iter()
        .map(|l| l.code)
        .collect();
    info!("Available locales: {}", available.join(", "));

    let default = reconcile_locale(&request.default_locale, &available)?;
    if let Some(notice) = default.notice() {
        warn!("{}", notice);
    }

    let plan = plan_localizations(&request.localizations, &default.locale, &available);
    if let Some(empty) = plan.planned.iter().find(|p| p.data.is_empty()) {
        return Err(WorkflowError::EmptyLocalizationData {
            locale: empty.resolved.locale.clone(),
        });
    }

    info!("Step 1: Creating main entry in {}", default.locale);
    let base_query = QueryParams::default()
        .with_locale(Some(&default.locale))
        .with_populate(&request.populate);
    let record = backend
        .create_record(&request.content_type, &request.data, &base_query)
        .await
        .map_err(|source| {
            error!("Failed to create main entry in {}: {}", default.locale, source);
            WorkflowError::BaseCreate {
                locale: default.locale.clone(),
                source,
            }
        })?;

    let document_id = match document_identifier(&record) {
        Some(id) => id,
        None => {
            return Err(WorkflowError::MissingDocumentId {
                locale: default.locale.clone(),
                record,
            })
        }
    };
    info!("Created main entry with documentId: {}", document_id);

    let main_entry = CreatedEntry {
        document_id: document_id.clone(),
        locale: default.locale.clone(),
        data: record,
    };

    let mut applied = Vec::with_capacity(plan.planned.len());
    for (index, localization) in plan.planned.iter().enumerate() {
        let locale = &localization.resolved.locale;
        info!("Step {}: Updating entry with {} localization", index + 2, locale);

        let query = QueryParams::default()
            .with_locale(Some(locale))
            .with_populate(&request.populate);

        match backend
            .update_record(&request.content_type, &document_id, &localization.data, &query)
            .await
        {
            Ok(data) => {
                info!("Updated entry with {} localization", locale);
                applied.push(AppliedLocalization {
                    locale: locale.clone(),
                    requested_locale: localization.resolved.requested.clone(),
                    document_id: document_id.clone(),
                    data,
                });
            }
            Err(source) => {
                error!("Error updating localization for {}: {}", locale, source);
                let pending_locales = plan.planned[index..]
                    .iter()
                    .map(|p| p.resolved.locale.clone())
                    .collect();
                return Err(WorkflowError::LocaleUpdate {
                    locale: locale.clone(),
                    index,
                    source,
                    partial: Box::new(PartialCreation {
                        main_entry,
                        localizations: applied,
                        pending_locales,
                    }),
                });
            }
        }
    }

    let used_locales: Vec<String> = std::iter::once(default.locale.clone())
        .chain(plan.planned.iter().map(|p| p.resolved.locale.clone()))
        .collect();
    info!(
        "Entry {} created in {} locale(s): {}",
        document_id,
        used_locales.len(),
        used_locales.join(", ")
    );

    Ok(CreationOutcome {
        default_locale: default.locale.clone(),
        requested_default_locale: default.requested.clone(),
        locales_created: used_locales.len(),
        available_locales: available,
        used_locales,
        skipped_locales: plan.skipped,
        main_entry,
        localizations: applied,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strapi::{LocaleEntry, StrapiResponse};
    use serde_json::json;
    use std::sync::Mutex;

    /// In-memory backend recording every call.
    struct FakeBackend {
        locales: Result<Vec<&'static str>, u16>,
        fail_create: bool,
        fail_update_for: Option<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeBackend {
        fn with_locales(codes: Vec<&'static str>) -> Self {
            Self {
                locales: Ok(codes),
                fail_create: false,
                fail_update_for: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn api_error(status: u16) -> StrapiError {
            StrapiError::Api {
                status,
                message: "boom".to_string(),
            }
        }
    }

    impl ContentBackend for FakeBackend {
        async fn list_locales(&self) -> Result<Vec<LocaleEntry>, StrapiError> {
            self.calls.lock().unwrap().push("locales".to_string());
            match &self.locales {
                Ok(codes) => Ok(codes
                    .iter()
                    .map(|c| LocaleEntry {
                        id: None,
                        code: c.to_string(),
                        name: None,
                        is_default: false,
                    })
                    .collect()),
                Err(status) => Err(Self::api_error(*status)),
            }
        }

        async fn create_record(
            &self,
            content_type: &str,
            data: &Map<String, Value>,
            query: &QueryParams,
        ) -> Result<Value, StrapiError> {
            let locale = query.locale.clone().unwrap_or_default();
            self.calls
                .lock()
                .unwrap()
                .push(format!("create {} {}", content_type, locale));
            if self.fail_create {
                return Err(Self::api_error(400));
            }
            let mut record = data.clone();
            record.insert("documentId".to_string(), json!("doc-1"));
            record.insert("locale".to_string(), json!(locale));
            Ok(Value::Object(record))
        }

        async fn update_record(
            &self,
            content_type: &str,
            document_id: &str,
            data: &Map<String, Value>,
            query: &QueryParams,
        ) -> Result<Value, StrapiError> {
            let locale = query.locale.clone().unwrap_or_default();
            self.calls
                .lock()
                .unwrap()
                .push(format!("update {} {} {}", content_type, document_id, locale));
            if self.fail_update_for == Some(locale.as_str()) {
                return Err(Self::api_error(500));
            }
            let mut record = data.clone();
            record.insert("locale".to_string(), json!(locale));
            Ok(Value::Object(record))
        }

        async fn read_record(
            &self,
            _content_type: &str,
            _document_id: &str,
            _query: &QueryParams,
        ) -> Result<Value, StrapiError> {
            Ok(Value::Null)
        }

        async fn list_records(&self, _: &str, _: &QueryParams) -> Result<StrapiResponse, StrapiError> {
            Ok(StrapiResponse::default())
        }

        async fn delete_record(&self, _: &str, _: &str) -> Result<Value, StrapiError> {
            Ok(Value::Null)
        }

        async fn content_type_schema(&self, _: &str) -> Result<Value, StrapiError> {
            Ok(Value::Null)
        }
    }

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn localization(locale: &str, title: &str) -> LocalizationRequest {
        LocalizationRequest {
            locale: locale.to_string(),
            data: obj(json!({ "title": title })),
        }
    }

    fn request(default_locale: &str, localizations: Vec<LocalizationRequest>) -> CreateWithLocalesRequest {
        CreateWithLocalesRequest {
            content_type: "articles".to_string(),
            default_locale: default_locale.to_string(),
            data: obj(json!({"title": "Hola mundo"})),
            localizations,
            populate: vec![],
        }
    }

    // ==================== Happy Path Tests ====================

    #[tokio::test]
    async fn test_creates_base_then_updates_in_order() {
        let backend = FakeBackend::with_locales(vec!["es", "en", "ca"]);
        let req = request(
            "es",
            vec![localization("en", "Hello world"), localization("ca", "Hola món")],
        );

        let outcome = create_with_locales(&backend, &req).await.unwrap();

        assert_eq!(
            backend.calls(),
            vec![
                "locales",
                "create articles es",
                "update articles doc-1 en",
                "update articles doc-1 ca",
            ]
        );
        assert_eq!(outcome.default_locale, "es");
        assert_eq!(outcome.used_locales, vec!["es", "en", "ca"]);
        assert_eq!(outcome.locales_created, 3);
        assert_eq!(outcome.main_entry.document_id, "doc-1");
        assert_eq!(outcome.localizations.len(), 2);
        assert_eq!(outcome.localizations[1].data["title"], "Hola món");
        assert!(outcome.skipped_locales.is_empty());
    }

    #[tokio::test]
    async fn test_default_locale_reconciled_by_base_language() {
        let backend = FakeBackend::with_locales(vec!["es", "en", "ca"]);
        let outcome = create_with_locales(&backend, &request("es-ES", vec![]))
            .await
            .unwrap();

        assert_eq!(outcome.default_locale, "es");
        assert_eq!(outcome.requested_default_locale, "es-ES");
        assert_eq!(backend.calls()[1], "create articles es");
    }

    #[tokio::test]
    async fn test_unknown_extra_locale_skipped() {
        let backend = FakeBackend::with_locales(vec!["es", "en"]);
        let req = request(
            "es",
            vec![localization("xx-XX", "???"), localization("en", "Hello world")],
        );

        let outcome = create_with_locales(&backend, &req).await.unwrap();

        assert_eq!(outcome.used_locales, vec!["es", "en"]);
        assert_eq!(outcome.skipped_locales.len(), 1);
        assert_eq!(outcome.skipped_locales[0].requested, "xx-XX");
        assert!(!backend.calls().iter().any(|c| c.contains("xx")));
    }

    #[tokio::test]
    async fn test_extra_locale_matching_default_skipped() {
        let backend = FakeBackend::with_locales(vec!["es", "en"]);
        let req = request("es", vec![localization("es-MX", "Hola")]);

        let outcome = create_with_locales(&backend, &req).await.unwrap();

        assert_eq!(outcome.used_locales, vec!["es"]);
        assert_eq!(outcome.skipped_locales.len(), 1);
        assert_eq!(backend.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_outcome_serialization_shape() {
        let backend = FakeBackend::with_locales(vec!["es", "en"]);
        let outcome = create_with_locales(&backend, &request("es", vec![localization("en", "Hi")]))
            .await
            .unwrap();

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["defaultLocale"], "es");
        assert_eq!(json["localesCreated"], 2);
        assert_eq!(json["usedLocales"], json!(["es", "en"]));
        assert_eq!(json["mainEntry"]["documentId"], "doc-1");
        assert_eq!(json["localizations"][0]["documentId"], "doc-1");
    }

    // ==================== Precondition Tests ====================

    #[tokio::test]
    async fn test_empty_data_rejected_before_any_call() {
        let backend = FakeBackend::with_locales(vec!["es"]);
        let mut req = request("es", vec![]);
        req.data = Map::new();

        let err = create_with_locales(&backend, &req).await.unwrap_err();
        assert!(matches!(err, WorkflowError::EmptyData));
        assert_eq!(err.step(), WorkflowStep::ValidateRequest);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_locale_fetch_failure_is_fatal() {
        let backend = FakeBackend {
            locales: Err(404),
            ..FakeBackend::with_locales(vec![])
        };

        let err = create_with_locales(&backend, &request("es", vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::LocaleFetch(_)));
        assert_eq!(err.step(), WorkflowStep::FetchLocales);
        assert_eq!(backend.calls(), vec!["locales"]);
    }

    #[tokio::test]
    async fn test_unavailable_default_locale_is_fatal() {
        let backend = FakeBackend::with_locales(vec!["es", "en"]);
        let err = create_with_locales(&backend, &request("fr-FR", vec![]))
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::DefaultLocale(_)));
        assert_eq!(
            err.to_string(),
            "Locale fr-FR is not available. Available locales: es, en"
        );
        assert!(!err.left_partial_state());
        assert_eq!(backend.calls(), vec!["locales"]);
    }

    #[tokio::test]
    async fn test_empty_localization_data_is_fatal_before_mutation() {
        let backend = FakeBackend::with_locales(vec!["es", "en"]);
        let req = request(
            "es",
            vec![LocalizationRequest {
                locale: "en".to_string(),
                data: Map::new(),
            }],
        );

        let err = create_with_locales(&backend, &req).await.unwrap_err();
        assert!(matches!(err, WorkflowError::EmptyLocalizationData { ref locale } if locale == "en"));
        assert_eq!(backend.calls(), vec!["locales"]);
    }

    #[tokio::test]
    async fn test_empty_data_on_skipped_locale_is_ignored() {
        let backend = FakeBackend::with_locales(vec!["es", "en"]);
        let req = request(
            "es",
            vec![LocalizationRequest {
                locale: "xx".to_string(),
                data: Map::new(),
            }],
        );

        let outcome = create_with_locales(&backend, &req).await.unwrap();
        assert_eq!(outcome.skipped_locales.len(), 1);
    }

    // ==================== Partial Failure Tests ====================

    #[tokio::test]
    async fn test_base_create_failure() {
        let backend = FakeBackend {
            fail_create: true,
            ..FakeBackend::with_locales(vec!["es", "en"])
        };
        let err = create_with_locales(&backend, &request("es", vec![localization("en", "Hi")]))
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::BaseCreate { ref locale, .. } if locale == "es"));
        assert!(err.partial().is_none());
        assert!(!backend.calls().iter().any(|c| c.starts_with("update")));
    }

    #[tokio::test]
    async fn test_update_failure_reports_committed_prefix() {
        let backend = FakeBackend {
            fail_update_for: Some("ca"),
            ..FakeBackend::with_locales(vec!["es", "en", "ca", "fr"])
        };
        let req = request(
            "es",
            vec![
                localization("en", "Hello"),
                localization("ca", "Hola"),
                localization("fr", "Bonjour"),
            ],
        );

        let err = create_with_locales(&backend, &req).await.unwrap_err();

        assert_eq!(err.step(), WorkflowStep::UpdateLocale(1));
        assert!(err.left_partial_state());
        let partial = err.partial().unwrap();
        assert_eq!(partial.main_entry.document_id, "doc-1");
        let committed: Vec<_> = partial.localizations.iter().map(|l| l.locale.as_str()).collect();
        assert_eq!(committed, vec!["en"]);
        assert_eq!(partial.pending_locales, vec!["ca", "fr"]);

        // No further updates after the failure
        assert!(!backend.calls().iter().any(|c| c.ends_with(" fr")));
    }

    #[tokio::test]
    async fn test_missing_document_id() {
        struct NoIdBackend;

        impl ContentBackend for NoIdBackend {
            async fn list_locales(&self) -> Result<Vec<LocaleEntry>, StrapiError> {
                Ok(vec![LocaleEntry {
                    id: Some(1),
                    code: "es".to_string(),
                    name: None,
                    is_default: true,
                }])
            }
            async fn create_record(
                &self,
                _: &str,
                _: &Map<String, Value>,
                _: &QueryParams,
            ) -> Result<Value, StrapiError> {
                Ok(json!({"title": "sin id"}))
            }
            async fn update_record(
                &self,
                _: &str,
                _: &str,
                _: &Map<String, Value>,
                _: &QueryParams,
            ) -> Result<Value, StrapiError> {
                unreachable!()
            }
            async fn read_record(&self, _: &str, _: &str, _: &QueryParams) -> Result<Value, StrapiError> {
                unreachable!()
            }
            async fn list_records(&self, _: &str, _: &QueryParams) -> Result<StrapiResponse, StrapiError> {
                unreachable!()
            }
            async fn delete_record(&self, _: &str, _: &str) -> Result<Value, StrapiError> {
                unreachable!()
            }
            async fn content_type_schema(&self, _: &str) -> Result<Value, StrapiError> {
                unreachable!()
            }
        }

        let err = create_with_locales(&NoIdBackend, &request("es", vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::MissingDocumentId { .. }));
        assert!(err.left_partial_state());
    }

    #[test]
    fn test_step_display() {
        assert_eq!(WorkflowStep::UpdateLocale(0).to_string(), "update locale #1");
        assert_eq!(WorkflowStep::CreateBase.to_string(), "create base entry");
        assert_eq!(WorkflowStep::ValidateRequest.to_string(), "validate request");
    }
}
