use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "qbuilder")]
#[command(about = "Interactive table query builder: pick a table, columns and filters, then preview or export")]
#[command(version)]
pub struct AppConfig {
    /// Base URL of the query backend
    #[arg(long, env = "QB_API_URL", default_value = "http://127.0.0.1:8000")]
    pub api_url: String,

    /// Directory where downloaded files are written
    #[arg(long, env = "QB_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// HTTP timeout in seconds
    #[arg(long, env = "QB_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl AppConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
