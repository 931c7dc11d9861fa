use crate::builtins;
use crate::engine::{LectioEngine, ReaderView};
use crate::runtime::parser::{CommandParser, CommandType};

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Result of executing a command: tells the front-end what to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecuteResult {
    /// Display this text.
    Output(String),
    /// Leave the shell.
    Exit,
}

/// Executes shell commands against the engine and remembers the open chapter.
#[derive(Debug)]
pub struct Runner {
    engine: Arc<LectioEngine>,
    current: Mutex<Option<ReaderView>>,
}

impl Runner {
    pub fn new(engine: Arc<LectioEngine>) -> Self {
        Self {
            engine,
            current: Mutex::new(None),
        }
    }

    pub fn engine(&self) -> &LectioEngine {
        &self.engine
    }

    /// The chapter currently open, if any.
    pub async fn current(&self) -> Option<ReaderView> {
        self.current.lock().await.clone()
    }

    /// Parse user input and route it to the engine.
    ///
    /// Upstream failures are reported as output so the shell keeps running;
    /// only local storage failures are returned as errors.
    pub async fn execute(&self, input: &str) -> Result<ExecuteResult> {
        let output = match CommandParser::parse(input) {
            CommandType::Empty => String::new(),
            CommandType::Exit => {
                self.engine.vault().close_session()?;
                return Ok(ExecuteResult::Exit);
            }
            CommandType::Help => builtins::help_text(),

            CommandType::Read(id) => self.open(id).await,
            CommandType::Next => {
                let target = self.current.lock().await.as_ref().and_then(|v| v.next.clone());
                match target {
                    Some(id) => self.open(id).await,
                    None => "⏹ No next chapter.".to_string(),
                }
            }
            CommandType::Prev => {
                let target = self.current.lock().await.as_ref().and_then(|v| v.prev.clone());
                match target {
                    Some(id) => self.open(id).await,
                    None => "⏹ No previous chapter.".to_string(),
                }
            }

            CommandType::Books(query) => match self.engine.books(query.as_deref()).await {
                Ok(books) => builtins::format_books(&books),
                Err(e) => failure(&e),
            },
            CommandType::Chapters { book_id, query } => {
                let book_id = match book_id {
                    Some(b) => Some(b),
                    None => self.current.lock().await.as_ref().and_then(|v| v.book_id.clone()),
                };
                match book_id {
                    Some(book) => match self.engine.chapters(&book, query.as_deref()).await {
                        Ok(chapters) => builtins::format_chapters(&book, &chapters),
                        Err(e) => failure(&e),
                    },
                    None => "usage: chapters <book-id> [filter]".to_string(),
                }
            }
            CommandType::Bibles(language) => {
                let language = language.unwrap_or_else(|| crate::DEFAULT_LANGUAGE.to_string());
                match self.engine.bibles(&language).await {
                    Ok(bibles) => builtins::format_bibles(&language, &bibles),
                    Err(e) => failure(&e),
                }
            }

            CommandType::SetKey(key) => {
                self.engine.credentials().set_api_key(&key)?;
                "🔑 API key saved.".to_string()
            }
            CommandType::SetBible(id) => {
                self.engine.credentials().set_collection_id(&id)?;
                format!("📘 Bible set to {}.", id.trim())
            }
            CommandType::Config => builtins::format_config(&self.engine.credentials().credentials()),
            CommandType::History(limit) => builtins::format_history(&self.engine.history(limit)?),

            CommandType::Invalid(usage) => usage,
            CommandType::Unknown(cmd) => {
                format!("❓ Unknown command: {} (type 'help')", cmd)
            }
        };

        Ok(ExecuteResult::Output(output))
    }

    async fn open(&self, id: String) -> String {
        match self.engine.read(id).await {
            Ok(view) => {
                let text = builtins::format_view(&view);
                *self.current.lock().await = Some(view);
                text
            }
            Err(e) => failure(&e),
        }
    }
}

fn failure(err: &anyhow::Error) -> String {
    format!("❌ {:#}", err)
}
