use thiserror::Error;

/// Failures surfaced by the scripture client.
///
/// Soft failures of the cheap resolution strategies never appear here; they are
/// absorbed inside the resolver and only the terminal step reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptureError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Transport(String),

    /// Upstream answered with a non-2xx status for a listing request.
    #[error("{resource}: HTTP {status}")]
    Status { resource: &'static str, status: u16 },

    /// The verse listing for a chapter came back empty.
    #[error("no verses found for chapter {chapter_id}")]
    NoVerses { chapter_id: String },

    /// The final verse-range passage fetch was refused.
    #[error("reading failed: HTTP {status} {body}")]
    Rejected { status: u16, body: String },

    /// A 2xx response whose body did not match the expected `data` envelope.
    #[error("{resource}: malformed response: {message}")]
    Decode {
        resource: &'static str,
        message: String,
    },

    #[error("invalid API base URL: {0}")]
    InvalidUrl(String),
}

impl ScriptureError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } | Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ScriptureError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
