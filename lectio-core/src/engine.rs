use crate::credentials::{CredentialDefaults, CredentialsStore};
use crate::navigation;
use crate::render::VerseFormatter;
use crate::vault::{ReadingRecord, Vault};
use anyhow::{Context, Result};
use lectio_api::{Bible, Book, Chapter, ChapterRef, ScriptureBackend};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

pub const NO_CONTENT: &str = "(no content found)";

/// One chapter, ready to display, with its place in the book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReaderView {
    pub chapter_id: String,
    pub book_id: Option<String>,
    pub title: String,
    /// Verse-per-line HTML. Empty when upstream returned no content.
    pub html: String,
    pub text: String,
    pub prev: Option<String>,
    pub next: Option<String>,
    pub copyright: Option<String>,
}

/// The main entry point for the Lectio Core.
/// The front-end holds one instance of this.
pub struct LectioEngine {
    backend: Arc<dyn ScriptureBackend>,
    credentials: CredentialsStore,
    vault: Vault,
}

impl std::fmt::Debug for LectioEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LectioEngine")
            .field("credentials", &self.credentials)
            .field("session", &self.vault.session_id())
            .finish()
    }
}

impl LectioEngine {
    pub fn new(
        backend: Arc<dyn ScriptureBackend>,
        vault: Vault,
        defaults: &CredentialDefaults,
    ) -> Result<Self> {
        let credentials = CredentialsStore::load(vault.clone(), defaults)?;
        info!(session = vault.session_id(), "Lectio engine started");

        Ok(Self {
            backend,
            credentials,
            vault,
        })
    }

    pub fn credentials(&self) -> &CredentialsStore {
        &self.credentials
    }

    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    /// Resolve a chapter and lay it out for reading.
    ///
    /// Listing the book's chapters only feeds prev/next; if it fails the view
    /// is still returned without neighbours.
    pub async fn read(&self, chapter: impl Into<ChapterRef>) -> Result<ReaderView> {
        let chapter = chapter.into();
        let creds = self.credentials.credentials();

        let resolved = self
            .backend
            .resolve_chapter(&chapter, &creds)
            .await
            .with_context(|| format!("Could not read {}", chapter))?;

        let book_id = navigation::book_id_for(&chapter.id, &resolved);

        let chapters = match &book_id {
            Some(book) => match self.backend.list_chapters(book, &creds).await {
                Ok(list) => list,
                Err(e) => {
                    warn!(book = %book, error = %e, "could not load chapter list");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        let (prev, next) = navigation::neighbours(&chapters, &chapter.id);

        let html = resolved
            .content
            .as_deref()
            .map(VerseFormatter::verse_lines)
            .unwrap_or_default();
        let text = if html.trim().is_empty() {
            NO_CONTENT.to_string()
        } else {
            VerseFormatter::to_text(&html)
        };

        let title = if resolved.reference.trim().is_empty() {
            chapter.id.clone()
        } else {
            resolved.reference.clone()
        };

        if let Err(e) = self.vault.record_reading(&chapter.id, &title) {
            warn!(error = %e, "could not record reading");
        }

        Ok(ReaderView {
            chapter_id: chapter.id,
            book_id,
            title,
            html,
            text,
            prev,
            next,
            copyright: resolved.copyright,
        })
    }

    pub async fn books(&self, query: Option<&str>) -> Result<Vec<Book>> {
        let books = self
            .backend
            .list_books(&self.credentials.credentials())
            .await
            .context("Could not list books")?;
        Ok(navigation::filter_books(&books, query.unwrap_or_default())
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn chapters(&self, book_id: &str, query: Option<&str>) -> Result<Vec<Chapter>> {
        let chapters = self
            .backend
            .list_chapters(book_id, &self.credentials.credentials())
            .await
            .with_context(|| format!("Could not list chapters of {}", book_id))?;
        Ok(navigation::filter_chapters(&chapters, query.unwrap_or_default())
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn bibles(&self, language: &str) -> Result<Vec<Bible>> {
        self.backend
            .list_bibles(language, &self.credentials.credentials())
            .await
            .with_context(|| format!("Could not list bibles for language {}", language))
    }

    pub fn history(&self, limit: usize) -> Result<Vec<ReadingRecord>> {
        self.vault.recent_readings(limit)
    }

    /// The chapter to reopen on start, if any was read before.
    pub fn last_chapter(&self) -> Result<Option<String>> {
        Ok(self.vault.last_reading()?.map(|r| r.chapter_id))
    }
}
