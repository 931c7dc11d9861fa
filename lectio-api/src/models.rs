//! Wire and domain types shared by the client and its callers.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ScriptureError;

/// API key and bible collection id used for every request.
///
/// Both values are trimmed on construction. An empty string is a legal value;
/// upstream will simply reject it.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub api_key: String,
    pub collection_id: String,
}

impl Credentials {
    pub fn new(api_key: impl AsRef<str>, collection_id: impl AsRef<str>) -> Self {
        Self {
            api_key: api_key.as_ref().trim().to_string(),
            collection_id: collection_id.as_ref().trim().to_string(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = if self.api_key.is_empty() {
            "<empty>"
        } else {
            "<redacted>"
        };
        f.debug_struct("Credentials")
            .field("api_key", &key)
            .field("collection_id", &self.collection_id)
            .finish()
    }
}

/// A chapter to resolve. Anything naming a chapter converts into one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChapterRef {
    pub id: String,
}

impl From<&str> for ChapterRef {
    fn from(id: &str) -> Self {
        Self { id: id.to_string() }
    }
}

impl From<String> for ChapterRef {
    fn from(id: String) -> Self {
        Self { id }
    }
}

impl From<&String> for ChapterRef {
    fn from(id: &String) -> Self {
        Self { id: id.clone() }
    }
}

impl From<&Chapter> for ChapterRef {
    fn from(chapter: &Chapter) -> Self {
        Self {
            id: chapter.id.clone(),
        }
    }
}

impl std::fmt::Display for ChapterRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}

/// One verse of a chapter, as listed by `/chapters/{id}/verses`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VerseRef {
    pub id: String,
    pub reference: Option<String>,
}

/// Renderable chapter content returned by either a chapter or a passage lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolvedChapter {
    pub id: String,
    pub bible_id: Option<String>,
    pub book_id: String,
    pub reference: String,
    /// HTML fragment. Absent when upstream had nothing to return.
    pub content: Option<String>,
    pub verse_count: Option<u32>,
    pub copyright: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Language {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Bible {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    pub description: Option<String>,
    pub language: Option<Language>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub bible_id: String,
    pub abbreviation: String,
    pub name: String,
    pub name_long: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Chapter {
    pub id: String,
    pub bible_id: String,
    pub book_id: String,
    /// Usually a number, but upstream uses `"intro"` for book introductions.
    pub number: Option<String>,
    pub reference: Option<String>,
}

/// Every response body nests its payload under `data`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Decode the `data` field of a response body.
pub(crate) fn decode_data<T: DeserializeOwned>(
    resource: &'static str,
    body: &str,
) -> Result<T, ScriptureError> {
    serde_json::from_str::<Envelope<T>>(body)
        .map(|envelope| envelope.data)
        .map_err(|e| ScriptureError::Decode {
            resource,
            message: e.to_string(),
        })
}
