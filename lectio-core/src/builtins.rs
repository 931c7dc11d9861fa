//! Text output for the reading shell and the one-shot CLI commands.

use crate::engine::ReaderView;
use crate::navigation::chapter_label;
use crate::vault::ReadingRecord;
use chrono::{Local, TimeZone};
use lectio_api::{Bible, Book, Chapter, Credentials};

pub fn help_text() -> String {
    [
        "📖 Lectio Commands:",
        "",
        "  read <chapter>                Read a chapter (e.g. read JHN.3)",
        "  <chapter>                     Same as read (e.g. PRO.5)",
        "  next, n                       Next chapter of the book",
        "  prev, p                       Previous chapter of the book",
        "",
        "  books [filter]                List books, optionally filtered",
        "  chapters [book] [filter]      List chapters (default: current book)",
        "  bibles [language]             List bibles (default: fra)",
        "",
        "  key <api-key>                 Set and save the API key",
        "  bible <bible-id>              Set and save the bible collection",
        "  config                        Show the current settings",
        "  history [n]                   Recently read chapters (default: 10)",
        "",
        "  help                          This help message",
        "  exit, quit                    Leave the reader",
    ]
    .join("\n")
}

pub fn format_view(view: &ReaderView) -> String {
    let mut lines = vec![format!("📖 {}", view.title), String::new(), view.text.clone()];

    if let Some(copyright) = view.copyright.as_deref().filter(|c| !c.trim().is_empty()) {
        lines.push(String::new());
        lines.push(format!("  {}", copyright.trim()));
    }

    let prev = view.prev.as_deref().unwrap_or("—");
    let next = view.next.as_deref().unwrap_or("—");
    lines.push(String::new());
    lines.push(format!("  ← {}   |   {} →", prev, next));
    lines.join("\n")
}

pub fn format_books(books: &[Book]) -> String {
    if books.is_empty() {
        return "📚 No books found.".to_string();
    }

    let mut lines = vec![format!("📚 {} book(s):", books.len())];
    for b in books {
        lines.push(format!("  {:<6} {:<8} {}", b.id, b.abbreviation, b.name));
    }
    lines.join("\n")
}

pub fn format_chapters(book_id: &str, chapters: &[Chapter]) -> String {
    if chapters.is_empty() {
        return format!("📑 No chapters found for {}.", book_id);
    }

    let mut lines = vec![format!("📑 {} — {} chapter(s):", book_id, chapters.len())];
    for c in chapters {
        lines.push(format!(
            "  {:<6} {:<12} {}",
            chapter_label(c),
            c.id,
            c.reference.as_deref().unwrap_or_default()
        ));
    }
    lines.join("\n")
}

pub fn format_bibles(language: &str, bibles: &[Bible]) -> String {
    if bibles.is_empty() {
        return format!("🌐 No bibles found for language '{}'.", language);
    }

    let mut lines = vec![format!("🌐 {} bible(s) in '{}':", bibles.len(), language)];
    for b in bibles {
        lines.push(format!("  {}  {} ({})", b.id, b.name, b.abbreviation));
    }
    lines.join("\n")
}

pub fn format_history(records: &[ReadingRecord]) -> String {
    if records.is_empty() {
        return "📜 Nothing read yet.".to_string();
    }

    let mut lines = vec![format!("📜 {} recent chapter(s):", records.len())];
    for r in records {
        let when = Local
            .timestamp_opt(r.timestamp, 0)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "?".to_string());
        lines.push(format!("  {}  {:<12} {}", when, r.chapter_id, r.reference));
    }
    lines.join("\n")
}

/// Settings summary. Only the tail of the API key is shown.
pub fn format_config(credentials: &Credentials) -> String {
    let key = mask_key(&credentials.api_key);
    let bible = if credentials.collection_id.is_empty() {
        "(not set)"
    } else {
        credentials.collection_id.as_str()
    };
    [
        "⚙️  Configuration:".to_string(),
        format!("  API key:  {}", key),
        format!("  Bible:    {}", bible),
    ]
    .join("\n")
}

pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    match chars.len() {
        0 => "(not set)".to_string(),
        n if n <= 4 => "*".repeat(n),
        n => {
            let tail: String = chars[n - 4..].iter().collect();
            format!("{}{}", "*".repeat(n - 4), tail)
        }
    }
}
