use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lectio", author, version, about = "Read scripture in the terminal", long_about = None)]
pub struct Cli {
    /// Base URL of the scripture API (overrides LECTIO_API_BASE)
    #[arg(long, global = true)]
    pub api_base: Option<String>,
    /// Path of the local database holding settings and history
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout: u64,
    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Read a chapter (defaults to the last one read)
    Read {
        /// Chapter id, e.g. JHN.3 or PRO.5
        chapter: Option<String>,
        /// Print the formatted HTML instead of text
        #[arg(long, conflicts_with = "json")]
        html: bool,
        /// Print the chapter as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the books of the configured bible
    Books {
        /// Keep books whose name or abbreviation contains this
        #[arg(short, long)]
        filter: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// List the chapters of a book
    Chapters {
        /// Book id, e.g. GEN
        book: String,
        /// Keep chapters whose number or reference contains this
        #[arg(short, long)]
        filter: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// List available bibles for a language
    Bibles {
        /// ISO 639-3 language code
        #[arg(short, long, default_value = lectio_core::DEFAULT_LANGUAGE)]
        language: String,
        #[arg(long)]
        json: bool,
    },
    /// Show or change the saved API key and bible
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
    /// Recently read chapters
    History {
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
    /// Interactive reading shell (the default)
    Shell,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the current settings
    Show,
    /// Save the API key
    SetKey { key: String },
    /// Save the bible collection id
    SetBible { id: String },
}
