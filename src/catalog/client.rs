//! Catalog API client
//!
//! HTTP client for the two PokeAPI endpoints the orchestrator needs.
//! The `Catalog` trait is the seam the orchestrator depends on, so tests can
//! swap in an in-memory catalog.

use crate::catalog::types::{CreatureRecord, PokemonResponse, TypeResponse};
use crate::config::Config;
use crate::error::LookupError;
use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;

/// Source of creature records
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Look up a single creature by identifier or name
    ///
    /// # Errors
    /// * `LookupError::NotFound` if the catalog answered with an empty (`null`) body
    /// * A transient `LookupError` for network, status or parse failures
    async fn creature(&self, id_or_name: &str) -> Result<CreatureRecord, LookupError>;

    /// List the member names of a category, in catalog order
    ///
    /// # Errors
    /// * `LookupError::NotFound` if the catalog answered with an empty (`null`) body
    /// * A transient `LookupError` for network, status or parse failures
    async fn category_members(&self, category: &str) -> Result<Vec<String>, LookupError>;
}

/// `reqwest`-backed catalog
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// Build a client from configuration
    ///
    /// # Errors
    /// * Returns `LookupError::Request` if the HTTP client cannot be constructed
    pub fn new(config: &Config) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::with_client(client, &config.catalog.base_url))
    }

    /// Wrap an existing client (shares its connection pool)
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base_url}/{resource}/{key}`, with `key` escaped as a single segment
    fn endpoint(&self, resource: &str, key: &str) -> Result<Url, LookupError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| LookupError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| LookupError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push(resource)
            .push(key);
        Ok(url)
    }

    /// GET `url` and decode the body
    ///
    /// A literal `null` body decodes to `None`.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, LookupError> {
        tracing::debug!(url = %url, "Calling catalog API");

        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            tracing::debug!(
                url = %url,
                status_code = status_code,
                "Catalog API returned error status"
            );

            return Err(LookupError::Status {
                status: status_code,
                body,
            });
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str::<Option<T>>(&body)?;

        tracing::debug!(url = %url, body_len = body.len(), "Catalog API responded");
        Ok(parsed)
    }
}

#[async_trait]
impl Catalog for CatalogClient {
    async fn creature(&self, id_or_name: &str) -> Result<CreatureRecord, LookupError> {
        let url = self.endpoint("pokemon", id_or_name)?;
        self.get_json::<PokemonResponse>(url)
            .await?
            .map(CreatureRecord::from)
            .ok_or_else(|| LookupError::NotFound(id_or_name.to_string()))
    }

    async fn category_members(&self, category: &str) -> Result<Vec<String>, LookupError> {
        let url = self.endpoint("type", category)?;
        self.get_json::<TypeResponse>(url)
            .await?
            .map(TypeResponse::member_names)
            .ok_or_else(|| LookupError::NotFound(category.to_string()))
    }
}
