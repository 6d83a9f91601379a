//! Store Config

use clap::Args;

/// Key/value store settings.
#[derive(Debug, Args)]
pub struct StoreConfig {
    /// Redis connection string
    #[arg(long, env = "REDIS_URL", hide_env_values = true)]
    pub redis_url: String,
}
