//! Book and chapter navigation helpers for the reader.

use lectio_api::{Book, Chapter, ResolvedChapter};
use regex::Regex;
use std::sync::OnceLock;

static FIRST_NUMBER: OnceLock<Regex> = OnceLock::new();

/// The owning book of a chapter.
///
/// Upstream's `bookId` wins; otherwise the part of the chapter id before the
/// first dot (`"PRO.5"` -> `"PRO"`).
pub fn book_id_for(chapter_id: &str, resolved: &ResolvedChapter) -> Option<String> {
    let from_upstream = resolved.book_id.trim();
    if !from_upstream.is_empty() {
        return Some(from_upstream.to_string());
    }

    chapter_id
        .split_once('.')
        .map(|(book, _)| book)
        .filter(|book| !book.is_empty())
        .map(str::to_string)
}

/// Short label for a chapter card: its number, else the first number in its
/// reference, else `"intro"`.
pub fn chapter_label(chapter: &Chapter) -> String {
    if let Some(number) = chapter.number.as_deref().map(str::trim) {
        if !number.is_empty() {
            return number.to_string();
        }
    }

    let re = FIRST_NUMBER.get_or_init(|| Regex::new(r"\d+").expect("Invalid number Regex"));
    chapter
        .reference
        .as_deref()
        .and_then(|r| re.find(r))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "intro".to_string())
}

/// Ids of the chapters before and after `current_id` in `chapters`.
pub fn neighbours(chapters: &[Chapter], current_id: &str) -> (Option<String>, Option<String>) {
    let Some(idx) = chapters.iter().position(|c| c.id == current_id) else {
        return (None, None);
    };

    let prev = idx.checked_sub(1).map(|i| chapters[i].id.clone());
    let next = chapters.get(idx + 1).map(|c| c.id.clone());
    (prev, next)
}

/// Books whose name or abbreviation contains `query`, case-insensitively.
pub fn filter_books<'a>(books: &'a [Book], query: &str) -> Vec<&'a Book> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return books.iter().collect();
    }

    books
        .iter()
        .filter(|b| {
            [&b.name, &b.abbreviation]
                .iter()
                .any(|s| s.to_lowercase().contains(&q))
        })
        .collect()
}

/// Chapters whose label or reference contains `query`, case-insensitively.
pub fn filter_chapters<'a>(chapters: &'a [Chapter], query: &str) -> Vec<&'a Chapter> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return chapters.iter().collect();
    }

    chapters
        .iter()
        .filter(|c| {
            chapter_label(c).to_lowercase().contains(&q)
                || c.reference
                    .as_deref()
                    .unwrap_or_default()
                    .to_lowercase()
                    .contains(&q)
        })
        .collect()
}
