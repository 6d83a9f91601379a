//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use cartstore_app::domain::carts::models::CartOwner;

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_cart_owner(&mut self, owner: CartOwner);

    fn cart_owner_or_400(&self) -> Result<CartOwner, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_cart_owner(&mut self, owner: CartOwner) {
        self.inject(owner);
    }

    fn cart_owner_or_400(&self) -> Result<CartOwner, StatusError> {
        self.obtain::<CartOwner>().cloned().map_err(|_ignored| {
            StatusError::bad_request().brief("Missing X-User-ID or X-Session-ID header")
        })
    }
}
