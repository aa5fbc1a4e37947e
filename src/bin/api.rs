//! mend API server binary.
//!
//! This binary opens the configured storage backend and passes it to the
//! API server. The API layer remains agnostic of the storage backend.

use std::net::IpAddr;
use std::time::Duration;

use clap::Parser;
use mend::api::{self, ApiError};
use mend::config::Config;
use mend::db::{Storage, StorageError};
use miette::Diagnostic;
use thiserror::Error;
use tracing::info;

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error("Storage error: {0}")]
    #[diagnostic(code(mend::binary::storage))]
    Storage(#[from] StorageError),

    #[error("API server error: {0}")]
    #[diagnostic(code(mend::binary::api))]
    Api(#[from] ApiError),
}

#[derive(Parser)]
#[command(name = "mend-api")]
#[command(author, version, about = "mend storage API server", long_about = None)]
struct Cli {
    /// Host address to bind to [env: MEND_HOST]
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to listen on [env: MEND_PORT]
    #[arg(short, long)]
    port: Option<u16>,

    /// Storage backend: sqlite or surrealdb [env: MEND_STORAGE_TYPE]
    #[arg(long)]
    storage_type: Option<String>,

    /// SQLite file/URL or SurrealDB endpoint [env: MEND_STORAGE_ADDR]
    #[arg(long)]
    storage_addr: Option<String>,

    /// Per-operation storage timeout in seconds [env: MEND_TIMEOUT_SECS]
    #[arg(long)]
    timeout: Option<u64>,
}

impl Cli {
    fn apply(self, mut config: Config) -> Config {
        if let Some(host) = self.host {
            config = config.with_host(host);
        }
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(kind) = self.storage_type {
            config = config.with_storage_kind(kind);
        }
        if let Some(addr) = self.storage_addr {
            config = config.with_storage_addr(addr);
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    api::init_tracing();

    run(cli.apply(Config::new())).await?;
    Ok(())
}

async fn run(config: Config) -> Result<(), BinaryError> {
    info!(
        kind = %config.storage.kind,
        addr = %config.storage.addr,
        "opening storage"
    );
    let storage = Storage::open(
        &config.storage.kind,
        &config.storage.addr,
        &config.connect_options(),
    )
    .await?;

    api::run(config, storage).await?;
    Ok(())
}
