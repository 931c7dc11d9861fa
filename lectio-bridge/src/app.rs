use anyhow::{Context, Result, bail};
use lectio_api::{ClientConfig, ScriptureClient};
use lectio_core::{CredentialDefaults, LectioEngine, Runner, Vault, builtins};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;

use crate::cli::{Cli, Commands, ConfigAction};
use crate::shell::run_shell;
use crate::util;

/// Wire the HTTP client, the Vault and the engine together from CLI flags.
pub fn build_engine(cli: &Cli) -> Result<LectioEngine> {
    let mut config = ClientConfig::from_env();
    if let Some(base) = &cli.api_base {
        config = config.with_base_url(base);
    }
    config.timeout = Duration::from_secs(cli.timeout.max(1));

    let client = ScriptureClient::new(&config).context("Failed to build the HTTP client")?;

    let path = util::vault_path(cli.db.clone())?;
    let vault = Vault::open(&path)?;
    tracing::debug!(path = %path.display(), "vault opened");

    LectioEngine::new(Arc::new(client), vault, &CredentialDefaults::from_env())
}

/// Run one CLI invocation and return the text to print.
///
/// `Shell` is handled by [`run`] since it owns stdin/stdout.
pub async fn execute(engine: &LectioEngine, command: &Commands) -> Result<String> {
    match command {
        Commands::Read {
            chapter,
            html,
            json,
        } => {
            let chapter = match chapter {
                Some(id) => id.clone(),
                None => match engine.last_chapter()? {
                    Some(id) => id,
                    None => bail!("No chapter given and nothing read yet (try: lectio read JHN.3)"),
                },
            };
            let view = engine.read(chapter).await?;
            if *json {
                Ok(serde_json::to_string_pretty(&view)?)
            } else if *html {
                Ok(view.html)
            } else {
                Ok(builtins::format_view(&view))
            }
        }
        Commands::Books { filter, json } => {
            let books = engine.books(filter.as_deref()).await?;
            if *json {
                Ok(serde_json::to_string_pretty(&books)?)
            } else {
                Ok(builtins::format_books(&books))
            }
        }
        Commands::Chapters { book, filter, json } => {
            let chapters = engine.chapters(book, filter.as_deref()).await?;
            if *json {
                Ok(serde_json::to_string_pretty(&chapters)?)
            } else {
                Ok(builtins::format_chapters(book, &chapters))
            }
        }
        Commands::Bibles { language, json } => {
            let bibles = engine.bibles(language).await?;
            if *json {
                Ok(serde_json::to_string_pretty(&bibles)?)
            } else {
                Ok(builtins::format_bibles(language, &bibles))
            }
        }
        Commands::Config { action } => {
            let store = engine.credentials();
            match action {
                None | Some(ConfigAction::Show) => {}
                Some(ConfigAction::SetKey { key }) => store.set_api_key(key)?,
                Some(ConfigAction::SetBible { id }) => store.set_collection_id(id)?,
            }
            Ok(builtins::format_config(&store.credentials()))
        }
        Commands::History { limit } => Ok(builtins::format_history(&engine.history(*limit)?)),
        Commands::Shell => bail!("the shell is interactive; run `lectio shell`"),
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let engine = build_engine(&cli)?;

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            let runner = Runner::new(Arc::new(engine));
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = tokio::io::stdout();
            run_shell(&runner, stdin, &mut stdout).await
        }
        command => {
            let output = execute(&engine, &command).await?;
            println!("{}", output);
            engine.vault().close_session()?;
            Ok(())
        }
    }
}
