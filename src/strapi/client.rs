use crate::config::Config;
use crate::strapi::error::{api_error_message, StrapiError};
use crate::strapi::query::{Pagination, QueryParams};
use crate::strapi::types::{parse_locale_list, LocaleEntry, StrapiResponse};
use reqwest::{Method, RequestBuilder};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Media library search options.
#[derive(Debug, Clone, Default)]
pub struct MediaSearch {
    /// Matched against file name and alternative text
    pub search: Option<String>,
    /// MIME type substring, e.g. "image" or "application/pdf"
    pub mime: Option<String>,
    pub pagination: Option<Pagination>,
    pub sort: Vec<String>,
}

impl MediaSearch {
    fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if let Some(search) = &self.search {
            pairs.push(("filters[$or][0][name][$contains]".to_string(), search.clone()));
            pairs.push((
                "filters[$or][1][alternativeText][$contains]".to_string(),
                search.clone(),
            ));
        }

        if let Some(mime) = &self.mime {
            pairs.push(("filters[mime][$contains]".to_string(), mime.clone()));
        }

        // Only page-based pagination for the media library
        if let Some(pagination) = &self.pagination {
            let query = QueryParams {
                pagination: Some(Pagination {
                    page: pagination.page,
                    page_size: pagination.page_size,
                    ..Default::default()
                }),
                sort: self.sort.clone(),
                ..Default::default()
            };
            pairs.extend(query.to_pairs());
        } else {
            pairs.extend(self.sort.iter().map(|s| ("sort[]".to_string(), s.clone())));
        }

        pairs
    }
}

/// A local file to push into the media library.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub file_path: PathBuf,
    pub alternative_text: Option<String>,
    pub caption: Option<String>,
    /// Overrides the file name taken from `file_path`
    pub name: Option<String>,
    pub folder: Option<String>,
}

/// HTTP client for the Strapi REST API.
#[derive(Debug, Clone)]
pub struct StrapiClient {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl StrapiClient {
    pub fn new(config: &Config) -> Result<Self, StrapiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.strapi_url.clone(),
            api_token: config.strapi_api_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}{}", self.base_url, endpoint));

        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and decode the JSON body. An empty 2xx body decodes to `null`.
    async fn send(&self, builder: RequestBuilder) -> Result<Value, StrapiError> {
        let response = builder.send().await.map_err(|e| {
            error!("Strapi request failed: {}", e);
            StrapiError::Request(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = api_error_message(status, &body);
            error!("Strapi API error ({}): {}", status.as_u16(), message);
            return Err(StrapiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn send_envelope(&self, builder: RequestBuilder) -> Result<StrapiResponse, StrapiError> {
        match self.send(builder).await? {
            Value::Null => Ok(StrapiResponse::default()),
            value => Ok(serde_json::from_value(value)?),
        }
    }

    // ==================== Content API ====================

    pub async fn create(
        &self,
        content_type: &str,
        data: &Map<String, Value>,
        query: &QueryParams,
    ) -> Result<StrapiResponse, StrapiError> {
        info!(
            "Creating entry in {}{}",
            content_type,
            locale_suffix(query.locale.as_deref())
        );

        let builder = self
            .request(Method::POST, &format!("/api/{}", content_type))
            .query(&query.to_pairs())
            .json(&json!({ "data": data }));

        self.send_envelope(builder).await
    }

    pub async fn read(
        &self,
        content_type: &str,
        document_id: &str,
        query: &QueryParams,
    ) -> Result<StrapiResponse, StrapiError> {
        info!(
            "Reading entry {} from {}{}",
            document_id,
            content_type,
            locale_suffix(query.locale.as_deref())
        );

        let builder = self
            .request(Method::GET, &format!("/api/{}/{}", content_type, document_id))
            .query(&query.to_pairs());

        self.send_envelope(builder).await
    }

    pub async fn list(&self, content_type: &str, query: &QueryParams) -> Result<StrapiResponse, StrapiError> {
        info!("Listing entries from {}", content_type);

        let builder = self
            .request(Method::GET, &format!("/api/{}", content_type))
            .query(&query.to_pairs());

        self.send_envelope(builder).await
    }

    pub async fn update(
        &self,
        content_type: &str,
        document_id: &str,
        data: &Map<String, Value>,
        query: &QueryParams,
    ) -> Result<StrapiResponse, StrapiError> {
        info!(
            "Updating entry {} in {}{}",
            document_id,
            content_type,
            locale_suffix(query.locale.as_deref())
        );

        let builder = self
            .request(Method::PUT, &format!("/api/{}/{}", content_type, document_id))
            .query(&query.to_pairs())
            .json(&json!({ "data": data }));

        self.send_envelope(builder).await
    }

    pub async fn delete(&self, content_type: &str, document_id: &str) -> Result<StrapiResponse, StrapiError> {
        info!("Deleting entry {} from {}", document_id, content_type);

        let builder = self.request(Method::DELETE, &format!("/api/{}/{}", content_type, document_id));
        self.send_envelope(builder).await
    }

    // ==================== Content-Type Builder ====================

    pub async fn get_content_types(&self) -> Result<Value, StrapiError> {
        info!("Fetching content types");
        self.send(self.request(Method::GET, "/api/content-type-builder/content-types"))
            .await
    }

    pub async fn get_content_type(&self, uid: &str) -> Result<Value, StrapiError> {
        info!("Fetching content type: {}", uid);
        self.send(self.request(
            Method::GET,
            &format!("/api/content-type-builder/content-types/{}", uid),
        ))
        .await
    }

    /// Add an attribute to a content type by rewriting its schema.
    ///
    /// Fetches the current schema, merges `{type, ...options}` under
    /// `field_name`, and PUTs the result back.
    pub async fn add_field(
        &self,
        content_type: &str,
        field_name: &str,
        field_type: &str,
        options: &Map<String, Value>,
    ) -> Result<Value, StrapiError> {
        info!("Adding field {} ({}) to {}", field_name, field_type, content_type);

        let current = self.get_content_type(content_type).await?;
        let mut schema = current
            .get("data")
            .and_then(|d| d.get("schema"))
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| StrapiError::UnexpectedShape {
                endpoint: format!("/api/content-type-builder/content-types/{}", content_type),
                body: current.to_string(),
            })?;

        let mut attribute = Map::new();
        attribute.insert("type".to_string(), Value::String(field_type.to_string()));
        for (key, value) in options {
            attribute.insert(key.clone(), value.clone());
        }

        let attributes = schema
            .entry("attributes")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(attributes) = attributes {
            attributes.insert(field_name.to_string(), Value::Object(attribute));
        } else {
            *attributes = json!({ field_name: attribute });
        }

        let builder = self
            .request(
                Method::PUT,
                &format!("/api/content-type-builder/content-types/{}", content_type),
            )
            .json(&json!({ "contentType": schema, "components": [] }));

        self.send(builder).await
    }

    // ==================== i18n ====================

    /// Raw `/api/i18n/locales` response.
    pub async fn get_i18n_locales(&self) -> Result<Value, StrapiError> {
        info!("Fetching i18n locales");
        self.send(self.request(Method::GET, "/api/i18n/locales")).await
    }

    /// Locales configured on the backend, whatever envelope the version uses.
    pub async fn list_locales(&self) -> Result<Vec<LocaleEntry>, StrapiError> {
        let body = self.get_i18n_locales().await?;
        let locales = parse_locale_list(&body).ok_or_else(|| StrapiError::UnexpectedShape {
            endpoint: "/api/i18n/locales".to_string(),
            body: body.to_string(),
        })?;

        debug!(
            "Available locales: {}",
            locales.iter().map(|l| l.code.as_str()).collect::<Vec<_>>().join(", ")
        );
        Ok(locales)
    }

    // ==================== Media Library ====================

    pub async fn search_media(&self, search: &MediaSearch) -> Result<Value, StrapiError> {
        info!("Searching media files");

        let builder = self
            .request(Method::GET, "/api/upload/files")
            .query(&search.to_pairs());

        self.send(builder).await
    }

    pub async fn get_media(&self, id: &str) -> Result<Value, StrapiError> {
        info!("Fetching media file with ID: {}", id);
        self.send(self.request(Method::GET, &format!("/api/upload/files/{}", id)))
            .await
    }

    pub async fn upload_media(&self, upload: &MediaUpload) -> Result<Value, StrapiError> {
        let path = upload.file_path.as_path();
        info!("Uploading file: {}", path.display());

        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(StrapiError::FileNotFound(path.display().to_string()));
        }

        let bytes = tokio::fs::read(path).await?;
        let file_name = upload
            .name
            .clone()
            .unwrap_or_else(|| file_name_of(path));

        let mut form = reqwest::multipart::Form::new()
            .part("files", reqwest::multipart::Part::bytes(bytes).file_name(file_name));

        if upload.alternative_text.is_some() || upload.caption.is_some() {
            let mut info = Map::new();
            let fields = [
                ("alternativeText", &upload.alternative_text),
                ("caption", &upload.caption),
                ("name", &upload.name),
            ];
            for (key, value) in fields {
                if let Some(value) = value {
                    info.insert(key.to_string(), Value::String(value.clone()));
                }
            }
            form = form.text("fileInfo", Value::Object(info).to_string());
        }

        if let Some(folder) = &upload.folder {
            form = form.text("folder", folder.clone());
        }

        self.send(self.request(Method::POST, "/api/upload").multipart(form))
            .await
    }
}

fn locale_suffix(locale: Option<&str>) -> String {
    locale
        .map(|l| format!(" (locale: {})", l))
        .unwrap_or_default()
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
