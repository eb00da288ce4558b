use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use curametric::domain::ports::SessionStoragePort;
use curametric::infrastructure::{
    AppConfig, CliArgs, CurametricClient, FileSessionStorage, KeyringSessionStorage,
    SessionStoreKind, StorageManager,
};
use curametric::presentation::App;

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config() -> Result<AppConfig> {
    let args = CliArgs::parse();
    let mut config = StorageManager::new()?.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

fn session_storage(config: &AppConfig) -> Result<Arc<dyn SessionStoragePort>> {
    Ok(match config.session.store {
        SessionStoreKind::Keyring => Arc::new(KeyringSessionStorage::new()),
        SessionStoreKind::File => {
            let dir = AppConfig::default_data_dir()
                .ok_or_else(|| eyre!("Could not determine data directory"))?;
            Arc::new(FileSessionStorage::in_dir(&dir))
        }
    })
}

fn create_app() -> Result<App> {
    let config = load_config()?;

    init_logging(&config)?;

    info!(
        version = curametric::VERSION,
        backend = %config.backend.url,
        store = ?config.session.store,
        "Starting CuraMetric"
    );

    let client = Arc::new(CurametricClient::with_timeout(
        config.backend.url.clone(),
        config.timeout(),
    )?);
    let storage = session_storage(&config)?;

    Ok(App::new(client.clone(), client, storage))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    color_eyre::install()?;

    let app = create_app()?;

    let mut terminal = ratatui::init();

    let result = app.run(&mut terminal).await;

    ratatui::restore();

    result
}
