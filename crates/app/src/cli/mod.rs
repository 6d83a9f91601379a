use cartstore_app::{context::AppContext, domain::carts::CartSettings};
use clap::{Args, Parser, Subcommand};

mod carts;

#[derive(Debug, Parser)]
#[command(name = "cartstore-app", about = "Cart store CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Carts(carts::CartsCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Carts(command) => carts::run(command).await,
        }
    }
}

/// Connection options shared by every subcommand.
#[derive(Debug, Args)]
pub(crate) struct StoreArgs {
    /// Redis connection string
    #[arg(long, env = "REDIS_URL", hide_env_values = true)]
    redis_url: String,
}

impl StoreArgs {
    pub(crate) async fn connect(&self) -> Result<AppContext, String> {
        AppContext::from_redis_url(&self.redis_url, CartSettings::default(), None)
            .await
            .map_err(|error| format!("failed to connect to redis: {error}"))
    }
}
