use cartstore_app::domain::carts::CartsRepository;
use clap::Args;

use crate::cli::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct ExpiredArgs {
    #[command(flatten)]
    store: StoreArgs,
}

pub(crate) async fn run(args: ExpiredArgs) -> Result<(), String> {
    let context = args.store.connect().await?;

    let carts = context
        .carts_repository
        .list_expired()
        .await
        .map_err(|error| format!("failed to list expired carts: {error}"))?;

    if carts.is_empty() {
        println!("no expired carts");
        return Ok(());
    }

    for cart in carts {
        println!("cart_id: {}", cart.id);
        println!("owner: {}", cart.owner);
        println!("items: {}", cart.items.len());
        println!("subtotal: {} {}", cart.subtotal, cart.currency);
        println!("expired_at: {}", cart.expires_at);
        println!();
    }

    Ok(())
}
