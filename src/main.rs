use std::{
    io,
    process::ExitCode,
    sync::{Arc, Mutex},
    time::Instant,
};

use tokio::net::TcpListener;
use tracing::{error, info};

mod actions;
mod config;
mod data;
mod error;
mod html;
mod routes;
mod telemetry;

use config::{ConfigError, Env, Settings};
use data::{CommentApi, FileStorage, HttpApi, LocalStore};

#[derive(Clone)]
pub struct AppState {
    api: Arc<dyn CommentApi>,
    local: Arc<Mutex<LocalStore>>,
}

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("server failed: {0}")]
    Io(#[from] io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "codenotes stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let settings = Settings::from_env()?;

    let env_load_start = Instant::now();
    let env = Env::load(&settings.env_file)?;
    info!(
        base_url = %env.base_url,
        elapsed = ?env_load_start.elapsed(),
        "comment backend configured"
    );

    let storage = FileStorage::new(&settings.storage_file);
    info!(path = %storage.path().display(), "using local comment storage");

    let state = AppState {
        api: Arc::new(HttpApi::new(&env)),
        local: Arc::new(Mutex::new(LocalStore::new(Arc::new(storage)))),
    };

    let app = routes::router(state);

    let listener = TcpListener::bind(settings.addr).await?;
    info!(addr = %settings.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
