use clap::{Args, Subcommand};

mod cleanup;
mod expired;
mod show;

#[derive(Debug, Args)]
pub(crate) struct CartsCommand {
    #[command(subcommand)]
    command: CartsSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartsSubcommand {
    /// Evict every expired cart now
    Cleanup(cleanup::CleanupArgs),
    /// Print a cart by id
    Show(show::ShowCartArgs),
    /// List expired carts still held in the store
    Expired(expired::ExpiredArgs),
}

pub(crate) async fn run(command: CartsCommand) -> Result<(), String> {
    match command.command {
        CartsSubcommand::Cleanup(args) => cleanup::run(args).await,
        CartsSubcommand::Show(args) => show::run(args).await,
        CartsSubcommand::Expired(args) => expired::run(args).await,
    }
}
