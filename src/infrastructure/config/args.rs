use super::app_config::{LogLevel, SessionStoreKind};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "curametric",
    version,
    about = "Terminal client for CuraMetric wound-care records",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend base URL.
    #[arg(long, env = "CURAMETRIC_BACKEND_URL", value_name = "URL")]
    pub backend_url: Option<String>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Where to keep the session between launches.
    #[arg(long, value_enum)]
    pub session_store: Option<SessionStoreKind>,

    /// Request timeout in seconds.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}
