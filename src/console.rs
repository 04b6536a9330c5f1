//! Interactive console
//!
//! Serves the namespace on a `disync> ` prompt. A line may hold several
//! commands separated by `;`; the session ends on `QUIT` or end of input.

use log::{debug, info};
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::namespace::Namespace;
use crate::protocol::{CommandStatus, handle_command, parse_command, split_commands};

pub const PROMPT: &str = "disync> ";

/// Runs the console on the process's stdin and stdout.
pub async fn run(mut namespace: Namespace) -> io::Result<()> {
    let mut stdout = io::stdout();
    serve(&mut namespace, BufReader::new(io::stdin()), &mut stdout).await
}

/// Reads commands from `input` and writes replies to `output` until the
/// input ends or a command closes the session.
pub async fn serve<R, W>(namespace: &mut Namespace, input: R, output: &mut W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let line = match lines.next_line().await? {
            Some(line) => line,
            None => {
                output.write_all(b"\n").await?;
                break;
            }
        };

        let mut close = false;
        for raw in split_commands(&line) {
            let command = parse_command(raw);
            debug!("Console command: {:?}", command);
            let result = handle_command(namespace, &command);
            if let Some(msg) = result.message {
                output.write_all(msg.replace("\r\n", "\n").as_bytes()).await?;
            }
            if result.status == CommandStatus::CloseConnection {
                close = true;
                break;
            }
        }
        if close {
            break;
        }
    }

    output.flush().await?;
    info!("Console session ended at {}", namespace.pwd());
    Ok(())
}
