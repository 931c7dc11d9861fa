use async_trait::async_trait;
use clap::Parser;
use lectio_api::{
    Bible, Book, Chapter, ChapterRef, Credentials, ResolvedChapter, ScriptureBackend,
    ScriptureError,
};
use lectio_bridge::app::{build_engine, execute};
use lectio_bridge::cli::{Cli, Commands, ConfigAction};
use lectio_bridge::shell::{run_shell, PROMPT};
use lectio_bridge::util::{default_filter, panic_message, vault_path};
use lectio_core::{CredentialDefaults, LectioEngine, Runner, Vault};
use std::path::PathBuf;
use std::sync::Arc;

// ============================================================================
// Fake backend
// ============================================================================

struct GenesisBackend;

#[async_trait]
impl ScriptureBackend for GenesisBackend {
    async fn resolve_chapter(
        &self,
        chapter: &ChapterRef,
        _credentials: &Credentials,
    ) -> Result<ResolvedChapter, ScriptureError> {
        if !chapter.id.starts_with("GEN.") {
            return Err(ScriptureError::Rejected {
                status: 400,
                body: "unknown passage".to_string(),
            });
        }
        Ok(ResolvedChapter {
            id: chapter.id.clone(),
            book_id: "GEN".to_string(),
            reference: format!("Genèse {}", &chapter.id[4..]),
            content: Some("<p><sup>1</sup>Au commencement</p>".to_string()),
            ..Default::default()
        })
    }

    async fn list_books(&self, _credentials: &Credentials) -> Result<Vec<Book>, ScriptureError> {
        Ok(vec![Book {
            id: "GEN".to_string(),
            abbreviation: "Gn".to_string(),
            name: "Genèse".to_string(),
            ..Default::default()
        }])
    }

    async fn list_chapters(
        &self,
        book_id: &str,
        _credentials: &Credentials,
    ) -> Result<Vec<Chapter>, ScriptureError> {
        Ok((1..=2)
            .map(|n| Chapter {
                id: format!("{}.{}", book_id, n),
                book_id: book_id.to_string(),
                number: Some(n.to_string()),
                reference: Some(format!("Genèse {}", n)),
                ..Default::default()
            })
            .collect())
    }

    async fn list_bibles(
        &self,
        _language: &str,
        _credentials: &Credentials,
    ) -> Result<Vec<Bible>, ScriptureError> {
        Ok(Vec::new())
    }
}

fn engine() -> LectioEngine {
    LectioEngine::new(
        Arc::new(GenesisBackend),
        Vault::open_in_memory().unwrap(),
        &CredentialDefaults::default(),
    )
    .unwrap()
}

// ============================================================================
// CLI parsing
// ============================================================================

#[test]
fn test_cli_defaults_to_shell() {
    let cli = Cli::try_parse_from(["lectio"]).unwrap();
    assert!(cli.command.is_none());
    assert_eq!(cli.timeout, 30);
    assert_eq!(cli.verbose, 0);
}

#[test]
fn test_cli_read() {
    let cli = Cli::try_parse_from(["lectio", "read", "PRO.5", "--json"]).unwrap();
    assert_eq!(
        cli.command,
        Some(Commands::Read {
            chapter: Some("PRO.5".to_string()),
            html: false,
            json: true
        })
    );
}

#[test]
fn test_cli_read_html_conflicts_with_json() {
    assert!(Cli::try_parse_from(["lectio", "read", "PRO.5", "--json", "--html"]).is_err());
}

#[test]
fn test_cli_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "lectio",
        "books",
        "-f",
        "gen",
        "--db",
        "/tmp/x.db",
        "-vv",
    ])
    .unwrap();
    assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
    assert_eq!(cli.verbose, 2);
    assert_eq!(
        cli.command,
        Some(Commands::Books {
            filter: Some("gen".to_string()),
            json: false
        })
    );
}

#[test]
fn test_cli_bibles_default_language() {
    let cli = Cli::try_parse_from(["lectio", "bibles"]).unwrap();
    assert_eq!(
        cli.command,
        Some(Commands::Bibles {
            language: "fra".to_string(),
            json: false
        })
    );
}

#[test]
fn test_cli_config_actions() {
    let cli = Cli::try_parse_from(["lectio", "config", "set-key", "abc"]).unwrap();
    assert_eq!(
        cli.command,
        Some(Commands::Config {
            action: Some(ConfigAction::SetKey {
                key: "abc".to_string()
            })
        })
    );

    let cli = Cli::try_parse_from(["lectio", "config"]).unwrap();
    assert_eq!(cli.command, Some(Commands::Config { action: None }));
}

#[test]
fn test_cli_chapters_requires_book() {
    assert!(Cli::try_parse_from(["lectio", "chapters"]).is_err());
}

// ============================================================================
// Util
// ============================================================================

#[test]
fn test_default_filter_levels() {
    assert_eq!(default_filter(0), "warn");
    assert_eq!(default_filter(1), "info");
    assert_eq!(default_filter(9), "trace");
}

#[test]
fn test_panic_message_from_payloads() {
    let literal: Box<dyn std::any::Any + Send> = Box::new("boom");
    let owned: Box<dyn std::any::Any + Send> = Box::new(format!("bad chapter {}", 3));
    let other: Box<dyn std::any::Any + Send> = Box::new(42_u32);

    assert_eq!(panic_message(literal.as_ref()), "boom");
    assert_eq!(panic_message(owned.as_ref()), "bad chapter 3");
    assert_eq!(panic_message(other.as_ref()), "panic without a message");
}

#[test]
fn test_vault_path_explicit_wins() {
    let path = vault_path(Some(PathBuf::from("/tmp/custom.db"))).unwrap();
    assert_eq!(path, PathBuf::from("/tmp/custom.db"));
}

#[test]
fn test_vault_path_default_file_name() {
    let path = vault_path(None).unwrap();
    assert!(path.ends_with("lectio.db"));
}

// ============================================================================
// One-shot commands
// ============================================================================

#[tokio::test]
async fn test_execute_read_text() {
    let engine = engine();
    let out = execute(
        &engine,
        &Commands::Read {
            chapter: Some("GEN.1".to_string()),
            html: false,
            json: false,
        },
    )
    .await
    .unwrap();

    assert!(out.contains("📖 Genèse 1"));
    assert!(out.contains("1 Au commencement"));
    assert!(out.contains("GEN.2 →"));
}

#[tokio::test]
async fn test_execute_read_json() {
    let engine = engine();
    let out = execute(
        &engine,
        &Commands::Read {
            chapter: Some("GEN.2".to_string()),
            html: false,
            json: true,
        },
    )
    .await
    .unwrap();

    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["chapter_id"], "GEN.2");
    assert_eq!(value["prev"], "GEN.1");
    assert!(value["next"].is_null());
}

#[tokio::test]
async fn test_execute_read_defaults_to_last_chapter() {
    let engine = engine();
    let read_last = Commands::Read {
        chapter: None,
        html: true,
        json: false,
    };

    assert!(execute(&engine, &read_last).await.is_err());

    engine.read("GEN.2").await.unwrap();
    let out = execute(&engine, &read_last).await.unwrap();
    assert_eq!(out, "<p><sup>1</sup>Au commencement</p>");
}

#[tokio::test]
async fn test_execute_read_error_carries_upstream_detail() {
    let engine = engine();
    let err = execute(
        &engine,
        &Commands::Read {
            chapter: Some("XYZ.1".to_string()),
            html: false,
            json: false,
        },
    )
    .await
    .unwrap_err();

    let message = format!("{:#}", err);
    assert!(message.contains("400"));
    assert!(message.contains("unknown passage"));
}

#[tokio::test]
async fn test_execute_config_set_and_show() {
    let engine = engine();

    let out = execute(
        &engine,
        &Commands::Config {
            action: Some(ConfigAction::SetBible {
                id: "  my-bible ".to_string(),
            }),
        },
    )
    .await
    .unwrap();

    assert!(out.contains("my-bible"));
    assert_eq!(engine.credentials().credentials().collection_id, "my-bible");
}

#[tokio::test]
async fn test_execute_listings() {
    let engine = engine();

    let books = execute(
        &engine,
        &Commands::Books {
            filter: None,
            json: false,
        },
    )
    .await
    .unwrap();
    assert!(books.contains("Genèse"));

    let chapters = execute(
        &engine,
        &Commands::Chapters {
            book: "GEN".to_string(),
            filter: Some("2".to_string()),
            json: true,
        },
    )
    .await
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&chapters).unwrap();
    assert_eq!(value.as_array().map(|a| a.len()), Some(1));

    let bibles = execute(
        &engine,
        &Commands::Bibles {
            language: "eng".to_string(),
            json: false,
        },
    )
    .await
    .unwrap();
    assert!(bibles.contains("No bibles found"));
}

#[tokio::test]
async fn test_build_engine_with_explicit_db() {
    let dir = tempfile::tempdir().unwrap();
    let cli = Cli::try_parse_from([
        "lectio",
        "--db",
        dir.path().join("t.db").to_str().unwrap(),
        "--api-base",
        "http://localhost:9/v1",
        "config",
        "set-key",
        "k-123456",
    ])
    .unwrap();

    let engine = build_engine(&cli).unwrap();
    let command = cli.command.as_ref().unwrap();
    let out = execute(&engine, command).await.unwrap();
    assert!(out.contains("****3456"));

    let reopened = build_engine(&cli).unwrap();
    assert_eq!(reopened.credentials().credentials().api_key, "k-123456");
}

// ============================================================================
// Shell
// ============================================================================

#[tokio::test]
async fn test_shell_session() {
    let runner = Runner::new(Arc::new(engine()));
    let input: &[u8] = b"GEN.1\nnext\nhelp\nexit\nGEN.1\n";
    let mut output: Vec<u8> = Vec::new();

    run_shell(&runner, input, &mut output).await.unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.starts_with("=== Lectio ==="));
    assert!(text.contains("Genèse 1"));
    assert!(text.contains("Genèse 2"));
    assert!(text.contains("Lectio Commands"));
    // Four prompts: nothing after `exit` is read.
    assert_eq!(text.matches(PROMPT).count(), 4);
    assert_eq!(runner.current().await.unwrap().chapter_id, "GEN.2");
}

#[tokio::test]
async fn test_shell_ends_on_eof_and_offers_resume() {
    let engine = engine();
    engine.read("GEN.2").await.unwrap();
    let runner = Runner::new(Arc::new(engine));
    let input: &[u8] = b"history\n";
    let mut output: Vec<u8> = Vec::new();

    run_shell(&runner, input, &mut output).await.unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("Last read: GEN.2"));
    assert!(text.contains("GEN.2"));
    assert_eq!(text.matches(PROMPT).count(), 2);
}
