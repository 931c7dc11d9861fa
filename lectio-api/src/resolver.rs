//! Chapter content resolution.
//!
//! Upstream deployments expose chapter text through different endpoint shapes,
//! so a chapter is resolved by trying, in order:
//!
//! 1. the chapter itself as minimal HTML,
//! 2. a passage addressed by the chapter id,
//! 3. a passage addressed by the chapter's first-to-last verse range.
//!
//! The first two are cheap single round trips whose failures are absorbed.
//! The third is the last line of defence and reports its failures.

use tracing::{debug, info};

use crate::error::ScriptureError;
use crate::models::{ChapterRef, Credentials, ResolvedChapter, VerseRef, decode_data};
use crate::transport::{ApiRequest, Transport};
use crate::ScriptureClient;

/// The absorbing strategies tried before verse-range reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackStrategy {
    ChapterHtml,
    PassageById,
}

impl FallbackStrategy {
    pub const ORDER: [FallbackStrategy; 2] = [Self::ChapterHtml, Self::PassageById];

    pub fn name(self) -> &'static str {
        match self {
            Self::ChapterHtml => "chapter-html",
            Self::PassageById => "passage-by-id",
        }
    }

    pub fn request(self, collection_id: &str, chapter_id: &str) -> ApiRequest {
        match self {
            Self::ChapterHtml => ApiRequest::chapter_html(collection_id, chapter_id),
            Self::PassageById => ApiRequest::passage(collection_id, chapter_id),
        }
    }
}

/// `"{first}-{last}"` over verses in document order. `None` for an empty list.
pub fn range_id(verses: &[VerseRef]) -> Option<String> {
    let first = verses.first()?;
    let last = verses.last()?;
    Some(format!("{}-{}", first.id, last.id))
}

impl<T: Transport> ScriptureClient<T> {
    pub(crate) async fn resolve(
        &self,
        chapter: &ChapterRef,
        credentials: &Credentials,
    ) -> Result<ResolvedChapter, ScriptureError> {
        for strategy in FallbackStrategy::ORDER {
            if let Some(resolved) = self.attempt(strategy, chapter, credentials).await {
                info!(chapter = %chapter, strategy = strategy.name(), "chapter resolved");
                return Ok(resolved);
            }
        }

        self.resolve_from_verses(chapter, credentials).await
    }

    /// Run one absorbing strategy. Every failure becomes `None`.
    async fn attempt(
        &self,
        strategy: FallbackStrategy,
        chapter: &ChapterRef,
        credentials: &Credentials,
    ) -> Option<ResolvedChapter> {
        let request = strategy.request(&credentials.collection_id, &chapter.id);

        let resp = match self.transport.get(&request, &credentials.api_key).await {
            Ok(resp) => resp,
            Err(e) => {
                debug!(strategy = strategy.name(), error = %e, "fallback: transport failure");
                return None;
            }
        };

        if !resp.is_success() {
            debug!(strategy = strategy.name(), status = resp.status, "fallback: non-success status");
            return None;
        }

        // A 2xx with an unreadable body falls through like any other failure.
        // A readable one with no payload is an answer: the chapter is empty.
        match decode_data::<Option<ResolvedChapter>>("chapter", &resp.body) {
            Ok(Some(resolved)) => Some(resolved),
            Ok(None) => {
                debug!(strategy = strategy.name(), "no payload; chapter has no content");
                Some(ResolvedChapter {
                    id: chapter.id.clone(),
                    ..Default::default()
                })
            }
            Err(e) => {
                debug!(strategy = strategy.name(), error = %e, "fallback: undecodable body");
                None
            }
        }
    }

    async fn resolve_from_verses(
        &self,
        chapter: &ChapterRef,
        credentials: &Credentials,
    ) -> Result<ResolvedChapter, ScriptureError> {
        let collection_id = &credentials.collection_id;

        let listing = ApiRequest::chapter_verses(collection_id, &chapter.id);
        let resp = self.transport.get(&listing, &credentials.api_key).await?;
        if !resp.is_success() {
            return Err(ScriptureError::Status {
                resource: "verses",
                status: resp.status,
            });
        }

        let verses: Vec<VerseRef> =
            decode_data::<Option<Vec<VerseRef>>>("verses", &resp.body)?.unwrap_or_default();

        let range = range_id(&verses).ok_or_else(|| ScriptureError::NoVerses {
            chapter_id: chapter.id.clone(),
        })?;
        debug!(chapter = %chapter, %range, verses = verses.len(), "reading verse range");

        let passage = ApiRequest::passage(collection_id, &range);
        let resp = self.transport.get(&passage, &credentials.api_key).await?;
        if !resp.is_success() {
            return Err(ScriptureError::Rejected {
                status: resp.status,
                body: resp.body,
            });
        }

        let resolved = decode_data::<ResolvedChapter>("passage", &resp.body)?;
        info!(chapter = %chapter, strategy = "verse-range", "chapter resolved");
        Ok(resolved)
    }
}
