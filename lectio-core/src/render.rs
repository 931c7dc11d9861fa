use regex::Regex;
use std::sync::OnceLock;

/// Turns chapter HTML into something readable one verse per line.
pub struct VerseFormatter;

static SUP_OPEN: OnceLock<Regex> = OnceLock::new();
static BLOCK_BREAK_SUP: OnceLock<Regex> = OnceLock::new();
static VERSE_SPAN: OnceLock<Regex> = OnceLock::new();
static BLOCK_BREAK_SPAN: OnceLock<Regex> = OnceLock::new();

static BREAK_TAG: OnceLock<Regex> = OnceLock::new();
static BLOCK_CLOSE: OnceLock<Regex> = OnceLock::new();
static SUP_CLOSE: OnceLock<Regex> = OnceLock::new();
static ANY_TAG: OnceLock<Regex> = OnceLock::new();
static NUMERIC_ENTITY: OnceLock<Regex> = OnceLock::new();
static BLANK_RUN: OnceLock<Regex> = OnceLock::new();

impl VerseFormatter {
    /// Insert a `<br/>` before every verse number so each verse starts a line.
    ///
    /// Verse numbers are `<sup>` elements or spans carrying the `verse-number`
    /// class. A break that would open a `<p>`/`<div>` block is dropped again.
    pub fn verse_lines(html: &str) -> String {
        let sup_re = SUP_OPEN.get_or_init(|| Regex::new(r"(?i)<sup\b").expect("Invalid sup Regex"));
        let mut s = sup_re.replace_all(html, "<br/>$0").to_string();

        let block_sup_re = BLOCK_BREAK_SUP.get_or_init(|| {
            Regex::new(r"(?i)(<(?:p|div)\b[^>]*>)\s*<br/?>\s*(<sup\b)")
                .expect("Invalid block/sup Regex")
        });
        s = block_sup_re.replace_all(&s, "$1$2").to_string();

        let span_re = VERSE_SPAN.get_or_init(|| {
            Regex::new(r#"(?i)(<span[^>]*class="[^"]*\bverse-number\b[^"]*"[^>]*>)"#)
                .expect("Invalid verse span Regex")
        });
        s = span_re.replace_all(&s, "<br/>$1").to_string();

        let block_span_re = BLOCK_BREAK_SPAN.get_or_init(|| {
            Regex::new(
                r#"(?i)(<(?:p|div)\b[^>]*>)\s*<br/?>\s*(<span[^>]*class="[^"]*\bverse-number\b[^"]*"[^>]*>)"#,
            )
            .expect("Invalid block/span Regex")
        });
        s = block_span_re.replace_all(&s, "$1$2").to_string();

        s
    }

    /// Flatten HTML to terminal text. Breaks and closed blocks become newlines.
    pub fn to_text(html: &str) -> String {
        let break_re = BREAK_TAG.get_or_init(|| Regex::new(r"(?i)<br\s*/?>").expect("Invalid br Regex"));
        let mut s = break_re.replace_all(html, "\n").to_string();

        let close_re = BLOCK_CLOSE.get_or_init(|| {
            Regex::new(r"(?i)</(?:p|div|h[1-6])\s*>").expect("Invalid block close Regex")
        });
        s = close_re.replace_all(&s, "\n").to_string();

        // Keep the verse number apart from the first word.
        let sup_close_re =
            SUP_CLOSE.get_or_init(|| Regex::new(r"(?i)</sup\s*>").expect("Invalid sup close Regex"));
        s = sup_close_re.replace_all(&s, " ").to_string();

        let tag_re = ANY_TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid tag Regex"));
        s = tag_re.replace_all(&s, "").to_string();

        s = decode_entities(&s);

        let lines: Vec<&str> = s.lines().map(|l| l.trim()).collect();
        let joined = lines.join("\n");

        let blank_re = BLANK_RUN.get_or_init(|| Regex::new(r"\n{3,}").expect("Invalid blank Regex"));
        blank_re.replace_all(&joined, "\n\n").trim().to_string()
    }
}

fn decode_entities(s: &str) -> String {
    let numeric_re = NUMERIC_ENTITY.get_or_init(|| {
        Regex::new(r"&#(?:[xX]([0-9a-fA-F]{1,6})|([0-9]{1,7}));").expect("Invalid entity Regex")
    });
    let s = numeric_re.replace_all(s, |caps: &regex::Captures| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (None, Some(dec)) => dec.as_str().parse::<u32>().ok(),
            _ => None,
        };
        match code.and_then(char::from_u32) {
            // Non-breaking space reads as a plain one in the terminal.
            Some('\u{a0}') => " ".to_string(),
            // `&#38;` is kept for the `&amp;` pass below.
            Some('&') => "&amp;".to_string(),
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        }
    });

    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        // Last, so "&amp;lt;" stays "&lt;".
        .replace("&amp;", "&")
}
