use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use crate::client::{Session, SessionRegistry, handle_client};
use crate::config::ServerConfig;
use crate::namespace::Namespace;
use crate::protocol::responses::{self, format_response};

pub struct Server {
    sessions: Arc<Mutex<SessionRegistry>>,
    namespace: Arc<Mutex<Namespace>>,
    listener: TcpListener,
    config: Arc<ServerConfig>,
}

impl Server {
    /// Binds the command listener and takes ownership of the namespace.
    pub async fn bind(config: ServerConfig, namespace: Namespace) -> std::io::Result<Self> {
        let socket = config.control_socket();
        let listener = match TcpListener::bind(&socket).await {
            Ok(listener) => {
                info!("Server bound to {}", socket);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", socket, e);
                return Err(e);
            }
        };

        Ok(Self {
            sessions: Arc::new(Mutex::new(SessionRegistry::new(config.max_clients))),
            namespace: Arc::new(Mutex::new(namespace)),
            listener,
            config: Arc::new(config),
        })
    }

    /// Address the listener actually bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn start(&self) {
        info!(
            "Starting disync server on {} (max {} clients)",
            self.config.control_socket(),
            self.config.max_clients
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let sessions = Arc::clone(&self.sessions);
                    let namespace = Arc::clone(&self.namespace);
                    let config = Arc::clone(&self.config);

                    // Spawn a task for each client so accept loop doesn't block
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_new_client(stream, addr, sessions, namespace, config).await
                        {
                            warn!("Failed to handle client {}: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

/// Handles a new client: registers a session, greets, and hands off to the
/// session handler.
async fn handle_new_client(
    mut stream: TcpStream,
    client_addr: SocketAddr,
    sessions: Arc<Mutex<SessionRegistry>>,
    namespace: Arc<Mutex<Namespace>>,
    config: Arc<ServerConfig>,
) -> Result<(), std::io::Error> {
    let root = namespace.lock().await.root().clone();

    let mut sessions_guard = sessions.lock().await;
    if let Err(rejected) = sessions_guard.insert(Session::new(client_addr, root)) {
        drop(sessions_guard);
        warn!(
            "Rejecting client {}: too many connections",
            rejected.client_addr()
        );
        let reply = format_response(
            responses::SERVICE_UNAVAILABLE,
            "Too many connections. Try again later.",
        );
        stream.write_all(reply.as_bytes()).await?;
        return Ok(()); // Close connection
    }
    info!(
        "Accepted client: {} ({}/{} clients)",
        client_addr,
        sessions_guard.len(),
        sessions_guard.max_clients()
    );
    drop(sessions_guard);

    // Send greeting
    let greeting = format_response(responses::SERVICE_READY, "disync ready");
    let greeted = async {
        stream.write_all(greeting.as_bytes()).await?;
        stream.flush().await
    }
    .await;
    if let Err(e) = greeted {
        sessions.lock().await.remove(&client_addr);
        return Err(e);
    }

    // Hand off to session handler
    handle_client(stream, sessions, client_addr, namespace, config).await;

    Ok(())
}
