#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandType {
    Read(String),
    Next,
    Prev,
    Books(Option<String>),
    /// `None` book means the book of the chapter being read.
    Chapters {
        book_id: Option<String>,
        query: Option<String>,
    },
    Bibles(Option<String>),
    SetKey(String),
    SetBible(String),
    Config,
    History(usize),
    Help,
    Exit,
    Empty,
    /// Recognised command with bad arguments; carries the usage line.
    Invalid(String),
    Unknown(String),
}

pub const DEFAULT_HISTORY_LIMIT: usize = 10;

pub struct CommandParser;

impl CommandParser {
    pub fn parse(input: &str) -> CommandType {
        let trimmed = input.trim();
        let trimmed = trimmed.strip_prefix(':').unwrap_or(trimmed).trim_start();

        let mut parts = trimmed.split_whitespace();
        let Some(cmd) = parts.next() else {
            return CommandType::Empty;
        };
        let args: Vec<&str> = parts.collect();
        let rest = trimmed[cmd.len()..].trim();
        let rest_opt = if rest.is_empty() {
            None
        } else {
            Some(rest.to_string())
        };

        match cmd.to_lowercase().as_str() {
            "read" | "r" | "open" => match args.first() {
                Some(id) => CommandType::Read(id.to_string()),
                None => CommandType::Invalid("usage: read <chapter-id>".to_string()),
            },
            "next" | "n" => CommandType::Next,
            "prev" | "p" | "previous" => CommandType::Prev,
            "books" | "b" => CommandType::Books(rest_opt),
            "chapters" | "c" => CommandType::Chapters {
                book_id: args.first().map(|s| s.to_string()),
                query: if args.len() > 1 {
                    Some(args[1..].join(" "))
                } else {
                    None
                },
            },
            "bibles" => CommandType::Bibles(args.first().map(|s| s.to_string())),
            "key" => match rest_opt {
                Some(key) => CommandType::SetKey(key),
                None => CommandType::Invalid("usage: key <api-key>".to_string()),
            },
            "bible" => match args.first() {
                Some(id) => CommandType::SetBible(id.to_string()),
                None => CommandType::Invalid("usage: bible <bible-id>".to_string()),
            },
            "config" => CommandType::Config,
            "history" | "h" => match args.first() {
                None => CommandType::History(DEFAULT_HISTORY_LIMIT),
                Some(n) => match n.parse::<usize>() {
                    Ok(limit) if limit > 0 => CommandType::History(limit),
                    _ => CommandType::Invalid("usage: history [n]".to_string()),
                },
            },
            "help" | "?" => CommandType::Help,
            "exit" | "quit" | "q" => CommandType::Exit,
            _ if args.is_empty() && Self::looks_like_chapter_id(cmd) => {
                CommandType::Read(cmd.to_string())
            }
            _ => CommandType::Unknown(trimmed.to_string()),
        }
    }

    /// `BOOK.N` style ids such as `JHN.3`, `1CO.13` or `PRO.intro`.
    pub fn looks_like_chapter_id(token: &str) -> bool {
        match token.split_once('.') {
            Some((book, chapter)) => {
                !book.is_empty()
                    && !chapter.is_empty()
                    && book.chars().all(|c| c.is_ascii_alphanumeric())
                    && chapter.chars().all(|c| c.is_ascii_alphanumeric())
            }
            None => false,
        }
    }
}
