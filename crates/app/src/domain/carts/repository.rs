//! Carts Repository

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::{
    domain::carts::{
        errors::CartsRepositoryError,
        models::{Cart, CartId, CartItem, CartOwner, id_key},
    },
    store::KeyValueStore,
};

/// Store expiry used when a cart's own expiry leaves no positive window.
pub const DEFAULT_CART_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const ID_KEY_PATTERN: &str = "cart:id:*";

#[automock]
#[async_trait]
pub trait CartsRepository: Send + Sync {
    /// Current cart for `owner`. Expired carts are evicted and reported absent.
    async fn get(&self, owner: &CartOwner) -> Result<Option<Cart>, CartsRepositoryError>;

    /// Cart addressed by its own id. Expired carts are evicted and reported absent.
    async fn get_by_id(&self, cart: CartId) -> Result<Option<Cart>, CartsRepositoryError>;

    /// Upsert the full record under both its owner key and its id key.
    async fn save(&self, cart: &Cart) -> Result<(), CartsRepositoryError>;

    /// Remove a cart. Deleting a missing cart succeeds.
    async fn delete(&self, cart: CartId) -> Result<(), CartsRepositoryError>;

    /// Remove an already loaded cart under both its owner key and its id key.
    ///
    /// Works when either key is missing or unreadable. An owner key that has
    /// since moved on to a newer cart is left alone.
    async fn remove(&self, cart: &Cart) -> Result<(), CartsRepositoryError>;

    /// Rewrite only the expiry of a stored cart.
    async fn update_expiry(
        &self,
        cart: CartId,
        expires_at: Timestamp,
    ) -> Result<Option<Cart>, CartsRepositoryError>;

    /// Move the guest cart for `session_id` over to `user_id`, merging into any
    /// cart the user already has.
    async fn migrate_guest_to_user(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<Option<Cart>, CartsRepositoryError>;

    /// Every stored cart whose expiry has passed.
    async fn list_expired(&self) -> Result<Vec<Cart>, CartsRepositoryError>;

    /// Evict every expired cart, returning how many were removed.
    async fn delete_expired(&self) -> Result<usize, CartsRepositoryError>;
}

#[derive(Debug, Clone)]
pub struct RedisCartsRepository<S> {
    store: Arc<S>,
}

impl<S: KeyValueStore> RedisCartsRepository<S> {
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Read and decode the record at `key`.
    ///
    /// Undecodable payloads are logged and read as absent; they cannot be
    /// safely resurrected.
    async fn load(&self, key: &str) -> Result<Option<Cart>, CartsRepositoryError> {
        let Some(payload) = self
            .store
            .get(key)
            .await
            .map_err(CartsRepositoryError::store("get"))?
        else {
            return Ok(None);
        };

        match serde_json::from_str::<Cart>(&payload) {
            Ok(cart) => Ok(Some(cart)),
            Err(error) => {
                warn!(key, error = %error, "discarding undecodable cart payload");

                Ok(None)
            }
        }
    }

    /// Apply lazy expiry to a freshly loaded cart.
    async fn live(
        &self,
        cart: Option<Cart>,
        now: Timestamp,
    ) -> Result<Option<Cart>, CartsRepositoryError> {
        match cart {
            Some(cart) if cart.is_expired_at(now) => {
                debug!(cart_id = %cart.id, owner = %cart.owner, "evicting expired cart on read");

                self.evict(&cart).await?;

                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// Delete the id key, plus the owner key while it still points at `cart`.
    ///
    /// An owner key that has since been taken over by a newer cart is left alone.
    async fn evict(&self, cart: &Cart) -> Result<(), CartsRepositoryError> {
        let owner_key = cart.owner.key();

        let mut keys = vec![cart.id_key()];

        let current = self
            .store
            .get(&owner_key)
            .await
            .map_err(CartsRepositoryError::store("evict"))?;

        let owned_by_cart = current
            .as_deref()
            .map(serde_json::from_str::<Cart>)
            .is_some_and(|stored| stored.map_or(true, |stored| stored.id == cart.id));

        if owned_by_cart {
            keys.push(owner_key);
        }

        self.store
            .delete(&keys)
            .await
            .map_err(CartsRepositoryError::store("evict"))
    }

    /// Best-effort removal; failures are logged and swallowed.
    async fn discard(&self, keys: &[String]) {
        if let Err(error) = self.store.delete(keys).await {
            warn!(?keys, error = %error, "failed to remove migrated guest cart");
        }
    }
}

/// Time the store should keep a record, mirroring the cart's own expiry.
fn store_ttl(cart: &Cart, now: Timestamp) -> Duration {
    Duration::try_from(now.duration_until(cart.expires_at))
        .ok()
        .filter(|ttl| !ttl.is_zero())
        .unwrap_or(DEFAULT_CART_TTL)
}

/// Fold `guest` lines into `cart`, combining lines for the same product and SKU.
///
/// Matched lines keep the user's unit price.
fn merge_items(cart: &mut Cart, guest: Vec<CartItem>) {
    let mut index: FxHashMap<(String, String), usize> = cart
        .items
        .iter()
        .enumerate()
        .map(|(position, item)| ((item.product_id.clone(), item.sku.clone()), position))
        .collect();

    for item in guest {
        let line = (item.product_id.clone(), item.sku.clone());

        if let Some(&position) = index.get(&line) {
            if let Some(existing) = cart.items.get_mut(position) {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
                existing.recalculate();
            }
        } else {
            index.insert(line, cart.items.len());
            cart.items.push(item);
        }
    }
}

#[async_trait]
impl<S: KeyValueStore + 'static> CartsRepository for RedisCartsRepository<S> {
    async fn get(&self, owner: &CartOwner) -> Result<Option<Cart>, CartsRepositoryError> {
        let cart = self.load(&owner.key()).await?;

        self.live(cart, Timestamp::now()).await
    }

    async fn get_by_id(&self, cart: CartId) -> Result<Option<Cart>, CartsRepositoryError> {
        let cart = self.load(&id_key(cart)).await?;

        self.live(cart, Timestamp::now()).await
    }

    async fn save(&self, cart: &Cart) -> Result<(), CartsRepositoryError> {
        let payload = serde_json::to_string(cart).map_err(CartsRepositoryError::Encode)?;
        let ttl = store_ttl(cart, Timestamp::now());

        self.store
            .set_with_ttl(&cart.owner.key(), &payload, ttl)
            .await
            .map_err(CartsRepositoryError::store("save"))?;

        self.store
            .set_with_ttl(&cart.id_key(), &payload, ttl)
            .await
            .map_err(CartsRepositoryError::store("save"))
    }

    async fn delete(&self, cart: CartId) -> Result<(), CartsRepositoryError> {
        let key = id_key(cart);

        match self.load(&key).await? {
            Some(stored) => self.evict(&stored).await,
            None => self
                .store
                .delete(&[key])
                .await
                .map_err(CartsRepositoryError::store("delete")),
        }
    }

    async fn remove(&self, cart: &Cart) -> Result<(), CartsRepositoryError> {
        self.evict(cart).await
    }

    async fn update_expiry(
        &self,
        cart: CartId,
        expires_at: Timestamp,
    ) -> Result<Option<Cart>, CartsRepositoryError> {
        let Some(mut cart) = self.get_by_id(cart).await? else {
            return Ok(None);
        };

        cart.expires_at = expires_at;
        cart.updated_at = Timestamp::now();

        self.save(&cart).await?;

        Ok(Some(cart))
    }

    async fn migrate_guest_to_user(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<Option<Cart>, CartsRepositoryError> {
        let Some(guest) = self.get(&CartOwner::Session(session_id.to_owned())).await? else {
            return Ok(None);
        };

        let user = CartOwner::User(user_id.to_owned());
        let now = Timestamp::now();

        let Some(mut cart) = self.get(&user).await? else {
            let session_key = guest.owner.key();

            let mut cart = guest;
            cart.owner = cart.owner.claim_for_user(user_id)?;
            cart.updated_at = now;

            self.save(&cart).await?;
            self.discard(&[session_key]).await;

            debug!(cart_id = %cart.id, owner = %cart.owner, "re-keyed guest cart to user");

            return Ok(Some(cart));
        };

        let guest_keys = [guest.owner.key(), guest.id_key()];

        merge_items(&mut cart, guest.items);
        cart.recalculate();
        cart.expires_at = cart.expires_at.max(guest.expires_at);
        cart.updated_at = now;

        self.save(&cart).await?;
        self.discard(&guest_keys).await;

        debug!(cart_id = %cart.id, guest_cart_id = %guest.id, "merged guest cart into user cart");

        Ok(Some(cart))
    }

    async fn list_expired(&self) -> Result<Vec<Cart>, CartsRepositoryError> {
        let keys = self
            .store
            .scan(ID_KEY_PATTERN)
            .await
            .map_err(CartsRepositoryError::store("scan"))?;

        let now = Timestamp::now();
        let mut expired = Vec::new();

        for key in keys {
            let Some(payload) = self
                .store
                .get(&key)
                .await
                .map_err(CartsRepositoryError::store("get"))?
            else {
                continue;
            };

            let cart: Cart = serde_json::from_str(&payload)
                .map_err(|source| CartsRepositoryError::Corrupt { key, source })?;

            if cart.is_expired_at(now) {
                expired.push(cart);
            }
        }

        Ok(expired)
    }

    async fn delete_expired(&self) -> Result<usize, CartsRepositoryError> {
        let expired = self.list_expired().await?;

        for cart in &expired {
            self.evict(cart).await?;
        }

        Ok(expired.len())
    }
}
