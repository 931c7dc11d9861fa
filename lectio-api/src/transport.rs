use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::ScriptureError;

pub const DEFAULT_API_BASE: &str = "https://api.scripture.api.bible/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the HTTP transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Defaults, with `LECTIO_API_BASE` overriding the base URL when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base) = std::env::var("LECTIO_API_BASE") {
            let base = base.trim();
            if !base.is_empty() {
                config.base_url = base.to_string();
            }
        }
        config
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim().to_string();
        self
    }
}

/// A GET request against the API, relative to the base URL.
///
/// Segments are kept raw; the transport encodes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    segments: Vec<String>,
    query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// `GET /bibles/{collection}/chapters/{chapter}?contentType=html`
    pub fn chapter_html(collection_id: &str, chapter_id: &str) -> Self {
        Self::new(["bibles", collection_id, "chapters", chapter_id])
            .with_query("contentType", "html")
    }

    /// `GET /bibles/{collection}/passages/{passage}`
    pub fn passage(collection_id: &str, passage_id: &str) -> Self {
        Self::new(["bibles", collection_id, "passages", passage_id])
    }

    /// `GET /bibles/{collection}/chapters/{chapter}/verses`
    pub fn chapter_verses(collection_id: &str, chapter_id: &str) -> Self {
        Self::new(["bibles", collection_id, "chapters", chapter_id, "verses"])
    }

    /// `GET /bibles/{collection}/books`
    pub fn books(collection_id: &str) -> Self {
        Self::new(["bibles", collection_id, "books"])
    }

    /// `GET /bibles/{collection}/books/{book}/chapters`
    pub fn book_chapters(collection_id: &str, book_id: &str) -> Self {
        Self::new(["bibles", collection_id, "books", book_id, "chapters"])
    }

    /// `GET /bibles?language={language}`
    pub fn bibles(language: &str) -> Self {
        Self::new(["bibles"]).with_query("language", language)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Unencoded path with query string, e.g. `/bibles/x/passages/PRO.5`.
    pub fn path(&self) -> String {
        let mut path = format!("/{}", self.segments.join("/"));
        if !self.query.is_empty() {
            let pairs: Vec<String> = self
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            path.push('?');
            path.push_str(&pairs.join("&"));
        }
        path
    }
}

impl std::fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The wire underneath the client. Swapped out in tests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a GET, authenticating with `api_key`.
    ///
    /// Only failures to obtain a response are errors; any HTTP status is `Ok`.
    async fn get(&self, request: &ApiRequest, api_key: &str) -> Result<RawResponse, ScriptureError>;
}

/// reqwest-backed transport talking to the real API.
pub struct HttpTransport {
    http: Client,
    base_url: Url,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ScriptureError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ScriptureError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ScriptureError::InvalidUrl(config.base_url.clone()));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("lectio/", env!("CARGO_PKG_VERSION")))
            .build()?;

        info!("Scripture API at: {}", base_url);

        Ok(Self { http, base_url })
    }

    /// Absolute URL for a request, with every path segment percent-encoded.
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url, ScriptureError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ScriptureError::InvalidUrl(self.base_url.to_string()))?;
            segments.pop_if_empty().extend(request.segments());
        }
        if !request.query().is_empty() {
            url.query_pairs_mut().extend_pairs(request.query());
        }
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, request: &ApiRequest, api_key: &str) -> Result<RawResponse, ScriptureError> {
        let url = self.url_for(request)?;
        debug!(%url, "GET");

        let resp = self.http.get(url).header("api-key", api_key).send().await?;

        let status = resp.status().as_u16();
        let body = resp.text().await?;
        debug!(status, bytes = body.len(), "response");

        Ok(RawResponse { status, body })
    }
}
