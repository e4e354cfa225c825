//! Strapi v5 REST client.
//!
//! - `client`: `StrapiClient`, one method per REST operation
//! - `backend`: `ContentBackend`, the narrow interface workflows are written against
//! - `query`: query-string marshaling (fields, populate, filters, sort, pagination)
//! - `types`: response envelopes and locale listings
//! - `error`: `StrapiError`

mod backend;
mod client;
mod error;
mod query;
mod types;

pub use backend::ContentBackend;
pub use client::{MediaSearch, MediaUpload, StrapiClient};
pub use error::StrapiError;
pub use query::{Pagination, QueryParams};
pub use types::{default_locale, locale_entries, parse_locale_list, LocaleEntry, StrapiResponse};
