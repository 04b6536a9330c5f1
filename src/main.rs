//! disync - Entry Point
//!
//! Loads the namespace document named in the configuration and serves it on
//! the configured front end.

use log::{error, info};

use disync::{DisyncError, Frontend, Namespace, Server, ServerConfig, console};

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), DisyncError> {
    let config = ServerConfig::load()?;
    info!("Configuration loaded ({:?} front end)", config.frontend);

    let namespace = Namespace::load(&config.namespace_path(), config.allow_corrupt)?;

    match config.frontend {
        Frontend::Tcp => {
            info!("Launching disync server...");
            let server = Server::bind(config, namespace).await?;
            server.start().await;
        }
        Frontend::Console => console::run(namespace).await?,
    }
    Ok(())
}
