//! Server binary: open the store, bind the HTTP listener, serve.
//!
//! Configuration comes from the environment:
//! - `PORT` — HTTP listen port (default 3000)
//! - `DOCSTORE_PATH` — backing JSON file (default `db.json` in the working
//!   directory)
//! - `RUST_LOG` — tracing filter (default `info`)

use docstore::api::server::start_server;
use docstore::DocStore;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_PATH: &str = "db.json";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = match std::env::var("PORT") {
        Ok(raw) => raw
            .parse::<u16>()
            .map_err(|e| format!("invalid PORT value `{raw}`: {e}"))?,
        Err(_) => DEFAULT_PORT,
    };
    let path = std::env::var("DOCSTORE_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_owned());

    let store = DocStore::builder(&path).build()?;
    tracing::info!(path = %path, "opened document store");

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    start_server(addr, store).await?;
    Ok(())
}
