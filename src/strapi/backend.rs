use crate::strapi::client::StrapiClient;
use crate::strapi::error::StrapiError;
use crate::strapi::query::QueryParams;
use crate::strapi::types::{LocaleEntry, StrapiResponse};
use serde_json::{Map, Value};

/// The slice of the content backend that record tools and locale-aware
/// workflows need.
///
/// Single-record operations return the record itself (the `data` member of
/// the response envelope); listings keep the envelope for its `meta`.
#[allow(async_fn_in_trait)]
pub trait ContentBackend {
    async fn list_locales(&self) -> Result<Vec<LocaleEntry>, StrapiError>;

    async fn create_record(
        &self,
        content_type: &str,
        data: &Map<String, Value>,
        query: &QueryParams,
    ) -> Result<Value, StrapiError>;

    async fn update_record(
        &self,
        content_type: &str,
        document_id: &str,
        data: &Map<String, Value>,
        query: &QueryParams,
    ) -> Result<Value, StrapiError>;

    async fn read_record(
        &self,
        content_type: &str,
        document_id: &str,
        query: &QueryParams,
    ) -> Result<Value, StrapiError>;

    async fn list_records(&self, content_type: &str, query: &QueryParams) -> Result<StrapiResponse, StrapiError>;

    async fn delete_record(&self, content_type: &str, document_id: &str) -> Result<Value, StrapiError>;

    /// Raw content-type builder response for a full UID.
    async fn content_type_schema(&self, uid: &str) -> Result<Value, StrapiError>;
}

impl ContentBackend for StrapiClient {
    async fn list_locales(&self) -> Result<Vec<LocaleEntry>, StrapiError> {
        StrapiClient::list_locales(self).await
    }

    async fn create_record(
        &self,
        content_type: &str,
        data: &Map<String, Value>,
        query: &QueryParams,
    ) -> Result<Value, StrapiError> {
        Ok(self.create(content_type, data, query).await?.data)
    }

    async fn update_record(
        &self,
        content_type: &str,
        document_id: &str,
        data: &Map<String, Value>,
        query: &QueryParams,
    ) -> Result<Value, StrapiError> {
        Ok(self.update(content_type, document_id, data, query).await?.data)
    }

    async fn read_record(
        &self,
        content_type: &str,
        document_id: &str,
        query: &QueryParams,
    ) -> Result<Value, StrapiError> {
        Ok(self.read(content_type, document_id, query).await?.data)
    }

    async fn list_records(&self, content_type: &str, query: &QueryParams) -> Result<StrapiResponse, StrapiError> {
        self.list(content_type, query).await
    }

    async fn delete_record(&self, content_type: &str, document_id: &str) -> Result<Value, StrapiError> {
        Ok(self.delete(content_type, document_id).await?.data)
    }

    async fn content_type_schema(&self, uid: &str) -> Result<Value, StrapiError> {
        self.get_content_type(uid).await
    }
}
