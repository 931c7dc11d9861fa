use anyhow::Result;
use lectio_core::{ExecuteResult, Runner};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub const PROMPT: &str = "lectio> ";

/// The interactive reading loop: one command per line until `exit` or EOF.
pub async fn run_shell<R, W>(runner: &Runner, input: R, output: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output
        .write_all(b"=== Lectio === (type 'help' for commands)\n")
        .await?;
    if let Some(last) = runner.engine().last_chapter()? {
        output
            .write_all(format!("Last read: {} (type '{}' to continue)\n", last, last).as_bytes())
            .await?;
    }

    let mut lines = input.lines();
    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            // EOF ends the session like `exit`.
            runner.engine().vault().close_session()?;
            output.write_all(b"\n").await?;
            break;
        };

        match runner.execute(&line).await? {
            ExecuteResult::Output(text) => {
                if !text.is_empty() {
                    output.write_all(text.as_bytes()).await?;
                    output.write_all(b"\n").await?;
                }
            }
            ExecuteResult::Exit => break,
        }
    }

    output.flush().await?;
    Ok(())
}
