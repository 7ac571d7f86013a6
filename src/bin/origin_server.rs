//! CLI entrypoint (component 4.N).
//!
//! Accepts at most one positional argument: a directory containing
//! `server.cfg`. Falls back to `./server.cfg` if omitted, mirroring the
//! original `main.c`. Logging is initialized first so even a config-load
//! failure is logged, not just printed to stderr.

use originserver::config::Key;
use originserver::{config_loader, logging, mime_loader, server::Server};
use std::path::PathBuf;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let config_path = match std::env::args().nth(1) {
        Some(dir) => PathBuf::from(dir).join("server.cfg"),
        None => PathBuf::from("./server.cfg"),
    };

    let config = match config_loader::load_from_path(&config_path).await {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(path = %config_path.display(), error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let mime_path = match config.get_str_key(Key::MimeFile) {
        Ok(path) => PathBuf::from(path),
        Err(_) => {
            tracing::error!("MIME_FILE not set in configuration");
            return ExitCode::FAILURE;
        }
    };

    let mime_table = match mime_loader::load_from_path(&mime_path).await {
        Ok(table) => table,
        Err(e) => {
            tracing::error!(path = %mime_path.display(), error = %e, "failed to load MIME table");
            return ExitCode::FAILURE;
        }
    };

    let server = match Server::init(&config, mime_table).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "failed to initialize server");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.start().await {
        tracing::error!(error = %e, "server exited with an error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
