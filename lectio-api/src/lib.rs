use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

pub mod error;
pub mod models;
pub mod resolver;
pub mod transport;

pub use error::ScriptureError;
pub use models::{Bible, Book, Chapter, ChapterRef, Credentials, Language, ResolvedChapter, VerseRef};
pub use transport::{ApiRequest, ClientConfig, HttpTransport, RawResponse, Transport};

use models::decode_data;

/// Everything the reader needs from a scripture source.
#[async_trait]
pub trait ScriptureBackend: Send + Sync {
    /// Resolve a chapter to renderable content, falling back across endpoint shapes.
    async fn resolve_chapter(
        &self,
        chapter: &ChapterRef,
        credentials: &Credentials,
    ) -> Result<ResolvedChapter, ScriptureError>;

    async fn list_books(&self, credentials: &Credentials) -> Result<Vec<Book>, ScriptureError>;

    async fn list_chapters(
        &self,
        book_id: &str,
        credentials: &Credentials,
    ) -> Result<Vec<Chapter>, ScriptureError>;

    async fn list_bibles(
        &self,
        language: &str,
        credentials: &Credentials,
    ) -> Result<Vec<Bible>, ScriptureError>;
}

/// Client for the scripture REST API.
/// Generic over the transport so tests can script upstream behaviour.
#[derive(Debug)]
pub struct ScriptureClient<T = HttpTransport> {
    transport: T,
}

impl ScriptureClient<HttpTransport> {
    pub fn new(config: &ClientConfig) -> Result<Self, ScriptureError> {
        Ok(Self {
            transport: HttpTransport::new(config)?,
        })
    }
}

impl<T: Transport> ScriptureClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// Single-request listing: non-2xx is terminal, no fallback.
    async fn fetch_list<D: DeserializeOwned>(
        &self,
        resource: &'static str,
        request: ApiRequest,
        credentials: &Credentials,
    ) -> Result<Vec<D>, ScriptureError> {
        let resp = self.transport.get(&request, &credentials.api_key).await?;
        if !resp.is_success() {
            return Err(ScriptureError::Status {
                resource,
                status: resp.status,
            });
        }

        let items = decode_data::<Option<Vec<D>>>(resource, &resp.body)?.unwrap_or_default();
        debug!(resource, count = items.len(), "listed");
        Ok(items)
    }
}

#[async_trait]
impl<T: Transport> ScriptureBackend for ScriptureClient<T> {
    async fn resolve_chapter(
        &self,
        chapter: &ChapterRef,
        credentials: &Credentials,
    ) -> Result<ResolvedChapter, ScriptureError> {
        self.resolve(chapter, credentials).await
    }

    async fn list_books(&self, credentials: &Credentials) -> Result<Vec<Book>, ScriptureError> {
        let request = ApiRequest::books(&credentials.collection_id);
        self.fetch_list("books", request, credentials).await
    }

    async fn list_chapters(
        &self,
        book_id: &str,
        credentials: &Credentials,
    ) -> Result<Vec<Chapter>, ScriptureError> {
        let request = ApiRequest::book_chapters(&credentials.collection_id, book_id);
        self.fetch_list("chapters", request, credentials).await
    }

    async fn list_bibles(
        &self,
        language: &str,
        credentials: &Credentials,
    ) -> Result<Vec<Bible>, ScriptureError> {
        self.fetch_list("bibles", ApiRequest::bibles(language), credentials)
            .await
    }
}
