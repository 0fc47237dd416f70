//! HTTP implementation of the catalog API.
//!
//! Talks to the REST server under `{base_url}/{autores,editoriales,libros}`.

use crate::api::CatalogApi;
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::filter::Criterion;
use async_trait::async_trait;
use biblio_types::{Author, Book, EntityKind, Publisher, RecordId};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// Catalog API client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCatalogApi {
    config: ClientConfig,
    client: Client,
}

impl HttpCatalogApi {
    /// Creates a client with the configured request timeout.
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ApiError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn collection_url(&self, kind: EntityKind) -> String {
        format!("{}/{}", self.config.api_root(), kind.resource())
    }

    fn record_url(&self, kind: EntityKind, id: &RecordId) -> String {
        format!(
            "{}/{}",
            self.collection_url(kind),
            urlencoding::encode(id.as_str())
        )
    }

    fn search_url(&self, criterion: &Criterion) -> String {
        let root = self.collection_url(EntityKind::Book);
        match criterion {
            Criterion::Title(text) => {
                format!("{root}/buscar/titulo/{}", urlencoding::encode(text))
            }
            Criterion::Category(text) => {
                format!("{root}/buscar/categoria/{}", urlencoding::encode(text))
            }
            Criterion::Availability(flag) => format!("{root}/buscar/disponible/{flag}"),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> ApiResult<T> {
        debug!("GET {url}");
        let response = self.client.get(&url).send().await?;
        let response = ensure_success(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Turns a non-2xx response into `ApiError::Status`, keeping the body text.
async fn ensure_success(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    warn!("catalog API answered {status}");
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn list_authors(&self) -> ApiResult<Vec<Author>> {
        self.get_json(self.collection_url(EntityKind::Author)).await
    }

    async fn list_publishers(&self) -> ApiResult<Vec<Publisher>> {
        self.get_json(self.collection_url(EntityKind::Publisher)).await
    }

    async fn list_books(&self) -> ApiResult<Vec<Book>> {
        self.get_json(self.collection_url(EntityKind::Book)).await
    }

    async fn create(&self, kind: EntityKind, body: &Value) -> ApiResult<()> {
        let url = self.collection_url(kind);
        debug!("POST {url}");
        let response = self.client.post(&url).json(body).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn update(&self, kind: EntityKind, id: &RecordId, body: &Value) -> ApiResult<()> {
        let url = self.record_url(kind, id);
        debug!("PUT {url}");
        let response = self.client.put(&url).json(body).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn delete(&self, kind: EntityKind, id: &RecordId) -> ApiResult<()> {
        let url = self.record_url(kind, id);
        debug!("DELETE {url}");
        let response = self.client.delete(&url).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn search_books(&self, criterion: &Criterion) -> ApiResult<Vec<Book>> {
        self.get_json(self.search_url(criterion)).await
    }

    async fn download_report(&self) -> ApiResult<Vec<u8>> {
        let url = format!("{}/informe", self.config.api_root());
        debug!("GET {url}");
        let response = self.client.get(&url).send().await?;
        let response = ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
