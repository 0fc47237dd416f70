//! Collaborator API abstraction.
//!
//! Everything the console needs from the catalog server goes through
//! [`CatalogApi`], so stores, sessions and the filter engine can run
//! against the HTTP client or an in-memory double.

use crate::error::ApiResult;
use crate::filter::Criterion;
use async_trait::async_trait;
use biblio_types::{Author, Book, Entity, EntityKind, Publisher, RecordId};
use futures::future::BoxFuture;
use serde_json::Value;

/// Remote catalog operations.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// `GET /autores`
    async fn list_authors(&self) -> ApiResult<Vec<Author>>;

    /// `GET /editoriales`
    async fn list_publishers(&self) -> ApiResult<Vec<Publisher>>;

    /// `GET /libros`
    async fn list_books(&self) -> ApiResult<Vec<Book>>;

    /// `POST /{resource}` with a JSON body.
    async fn create(&self, kind: EntityKind, body: &Value) -> ApiResult<()>;

    /// `PUT /{resource}/{id}` with a JSON body.
    async fn update(&self, kind: EntityKind, id: &RecordId, body: &Value) -> ApiResult<()>;

    /// `DELETE /{resource}/{id}`
    async fn delete(&self, kind: EntityKind, id: &RecordId) -> ApiResult<()>;

    /// Books matching exactly one criterion (`GET /libros/buscar/...`).
    async fn search_books(&self, criterion: &Criterion) -> ApiResult<Vec<Book>>;

    /// `GET /informe`, the binary report document.
    async fn download_report(&self) -> ApiResult<Vec<u8>>;
}

/// Records that can be listed from the catalog API.
pub trait Listable: Entity + Sized {
    /// Fetches the whole collection.
    fn fetch_all(api: &dyn CatalogApi) -> BoxFuture<'_, ApiResult<Vec<Self>>>;
}

impl Listable for Author {
    fn fetch_all(api: &dyn CatalogApi) -> BoxFuture<'_, ApiResult<Vec<Self>>> {
        api.list_authors()
    }
}

impl Listable for Publisher {
    fn fetch_all(api: &dyn CatalogApi) -> BoxFuture<'_, ApiResult<Vec<Self>>> {
        api.list_publishers()
    }
}

impl Listable for Book {
    fn fetch_all(api: &dyn CatalogApi) -> BoxFuture<'_, ApiResult<Vec<Self>>> {
        api.list_books()
    }
}
