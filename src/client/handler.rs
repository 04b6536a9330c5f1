use log::{debug, error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::client::SessionRegistry;
use crate::config::ServerConfig;
use crate::namespace::Namespace;
use crate::protocol::responses::{self, format_response};
use crate::protocol::{CommandStatus, handle_command, parse_command, split_commands};

/// Replies produced by one input line, and whether the session should end.
struct LineOutcome {
    replies: String,
    close: bool,
}

/// Handles a client session using the Tokio async runtime.
///
/// - Uses BufReader to read command lines from the client.
/// - Runs every `;`-separated command with the session's own working
///   directory swapped into the shared namespace.
/// - Holds the namespace lock for the whole line, so a resolve-then-mutate
///   sequence never interleaves with another session.
pub async fn handle_client(
    cmd_stream: TcpStream,
    sessions: Arc<Mutex<SessionRegistry>>,
    client_addr: SocketAddr,
    namespace: Arc<Mutex<Namespace>>,
    config: Arc<ServerConfig>,
) {
    let (read_half, mut write_half) = cmd_stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                // Client closed the connection
                info!("Connection closed by client {}", client_addr);
                break;
            }
            Ok(_) => {
                // Enforce command length limit
                if line.len() > config.max_command_length {
                    let reply = format_response(responses::UNKNOWN_COMMAND, "Command too long");
                    let _ = write_half.write_all(reply.as_bytes()).await;
                    continue;
                }

                let outcome = match run_line(&line, &sessions, client_addr, &namespace).await {
                    Some(outcome) => outcome,
                    None => {
                        error!("Client {} not found in session registry", client_addr);
                        let reply =
                            format_response(responses::SERVICE_UNAVAILABLE, "Session not found");
                        let _ = write_half.write_all(reply.as_bytes()).await;
                        break;
                    }
                };

                if let Err(e) = write_half.write_all(outcome.replies.as_bytes()).await {
                    error!("Failed to write to {}: {}", client_addr, e);
                    break;
                }
                if outcome.close {
                    info!("Client {} requested to quit", client_addr);
                    break;
                }
            }
            Err(e) => {
                error!("Failed to read from {}: {}", client_addr, e);
                break;
            }
        }
    }

    let mut sessions_guard = sessions.lock().await;
    if let Some(session) = sessions_guard.remove(&client_addr) {
        info!(
            "Client {} disconnected after {} commands ({} sessions left)",
            client_addr,
            session.commands_served(),
            sessions_guard.len()
        );
    }
}

/// Runs every command on `line` for the session at `client_addr`.
///
/// Returns `None` when the session is no longer registered.
async fn run_line(
    line: &str,
    sessions: &Mutex<SessionRegistry>,
    client_addr: SocketAddr,
    namespace: &Mutex<Namespace>,
) -> Option<LineOutcome> {
    let mut sessions_guard = sessions.lock().await;
    let session = sessions_guard.get_mut(&client_addr)?;
    let mut namespace_guard = namespace.lock().await;

    let mut outcome = LineOutcome {
        replies: String::new(),
        close: false,
    };
    for raw in split_commands(line) {
        let command = parse_command(raw);
        info!("Received from {}: {:?}", client_addr, &command);
        session.record_command();

        let result = namespace_guard
            .with_working_directory(session.working_directory_mut(), |namespace| {
                handle_command(namespace, &command)
            });
        if let Some(msg) = result.message {
            outcome.replies.push_str(&msg);
        }
        match result.status {
            CommandStatus::CloseConnection => {
                outcome.close = true;
                break;
            }
            CommandStatus::Failure(reason) => {
                debug!("Command from {} failed: {}", client_addr, reason);
            }
            CommandStatus::Success => {}
        }
    }
    Some(outcome)
}
