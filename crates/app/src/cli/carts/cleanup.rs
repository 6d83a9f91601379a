use cartstore_app::domain::carts::{CartCleanupScheduler, DEFAULT_CLEANUP_INTERVAL};
use clap::Args;

use crate::cli::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct CleanupArgs {
    #[command(flatten)]
    store: StoreArgs,
}

pub(crate) async fn run(args: CleanupArgs) -> Result<(), String> {
    let context = args.store.connect().await?;

    let evicted = CartCleanupScheduler::new(context.carts, DEFAULT_CLEANUP_INTERVAL)
        .run_once()
        .await
        .map_err(|error| format!("failed to clean up carts: {error}"))?;

    println!("evicted: {evicted}");

    Ok(())
}
