//! Corkboard headless host.
//!
//! Reads one JSON [`events::InputEvent`] per stdin line, runs it through the
//! board session and writes one JSON [`events::Frame`] per stdout line. Logs
//! go to stderr so stdout stays a clean frame stream.

mod config;
mod db;
mod events;
mod notice;
mod services;
mod session;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use canvas::engine::EngineCore;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, ConfigError};
use crate::events::InputEvent;
use crate::services::PersistError;
use crate::services::blobs::HttpBlobStore;
use crate::services::items::PgItems;
use crate::session::Session;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database init failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("storage init failed: {0}")]
    Storage(#[from] PersistError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("frame encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dotenvy::dotenv() {
        debug!(error = %e, "no .env loaded");
    }

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "runtime init failed");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "corkboard stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let config = Config::from_env()?;
    let pool = db::connect(&config.database_url).await?;
    let blobs = HttpBlobStore::new(&config.storage)?;

    let mut core = EngineCore::new();
    core.set_viewport(config.viewport_width, config.viewport_height, 1.0);
    let mut session = Session::new(core, Arc::new(PgItems::new(pool)), Arc::new(blobs), config.notice_ttl);
    session.hydrate().await;
    info!(width = config.viewport_width, height = config.viewport_height, bucket = %config.storage.bucket, "corkboard ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    emit(&mut stdout, &mut session).await?;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<InputEvent>(&line) {
            Ok(event) => {
                debug!(at = ?event.screen(), "event");
                session.handle(event).await;
            }
            Err(e) => {
                warn!(error = %e, "skipping malformed event");
                continue;
            }
        }
        emit(&mut stdout, &mut session).await?;
    }

    info!(pending = session.pending(), "input closed; settling");
    session.settle().await;
    emit(&mut stdout, &mut session).await?;
    Ok(())
}

async fn emit(stdout: &mut tokio::io::Stdout, session: &mut Session) -> Result<(), StartupError> {
    session.pump();
    let mut line = serde_json::to_vec(&session.frame(Instant::now()))?;
    line.push(b'\n');
    stdout.write_all(&line).await?;
    stdout.flush().await?;
    Ok(())
}
