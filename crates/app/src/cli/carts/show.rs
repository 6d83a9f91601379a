use cartstore_app::domain::carts::{CartsServiceError, models::CartId};
use clap::Args;

use crate::cli::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct ShowCartArgs {
    #[command(flatten)]
    store: StoreArgs,

    /// Cart UUID to print
    #[arg(long)]
    cart_id: CartId,
}

pub(crate) async fn run(args: ShowCartArgs) -> Result<(), String> {
    let context = args.store.connect().await?;

    let cart = match context.carts.get_cart_by_id(args.cart_id).await {
        Ok(cart) => cart,
        Err(CartsServiceError::NotFound) => {
            return Err(format!("cart {} not found", args.cart_id));
        }
        Err(error) => return Err(format!("failed to load cart: {error}")),
    };

    let json = serde_json::to_string_pretty(&cart)
        .map_err(|error| format!("failed to encode cart: {error}"))?;

    println!("{json}");

    Ok(())
}
