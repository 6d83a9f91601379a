//! Carts service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use rust_decimal::Decimal;
use rusty_money::iso;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{
    carts::{
        data::NewCartItem,
        errors::CartsServiceError,
        models::{
            Cart, CartId, CartIssue, CartIssueKind, CartItem, CartOwner, CartSummary,
            CartValidation,
        },
        repository::CartsRepository,
    },
    catalog::{ProductCatalog, models::CatalogProduct},
};

/// Shortest expiry extension a caller may request, in hours.
pub const MIN_EXTENSION_HOURS: u32 = 1;

/// Longest expiry extension a caller may request, in hours (one week).
pub const MAX_EXTENSION_HOURS: u32 = 168;

#[derive(Debug, Error)]
#[error("unknown currency code: {0}")]
pub struct InvalidCurrency(pub String);

/// Per-deployment cart settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSettings {
    currency: String,
    default_ttl: SignedDuration,
}

impl CartSettings {
    /// Build settings, validating `currency` as an ISO 4217 code.
    ///
    /// # Errors
    ///
    /// Returns an error when the currency code is not recognised.
    pub fn new(currency: &str, default_ttl_hours: u32) -> Result<Self, InvalidCurrency> {
        let currency = iso::find(&currency.trim().to_ascii_uppercase())
            .ok_or_else(|| InvalidCurrency(currency.to_string()))?
            .iso_alpha_code
            .to_string();

        Ok(Self {
            currency,
            default_ttl: SignedDuration::from_hours(i64::from(default_ttl_hours.max(1))),
        })
    }

    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    #[must_use]
    pub fn default_ttl(&self) -> SignedDuration {
        self.default_ttl
    }
}

impl Default for CartSettings {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            default_ttl: SignedDuration::from_hours(24),
        }
    }
}

/// Resolve the cart owner from caller-supplied identifiers.
///
/// # Errors
///
/// Returns [`CartsServiceError::MissingOwner`] when neither identifier is present.
pub fn resolve_owner(
    user_id: Option<&str>,
    session_id: Option<&str>,
) -> Result<CartOwner, CartsServiceError> {
    CartOwner::resolve(user_id, session_id).ok_or(CartsServiceError::MissingOwner)
}

#[derive(Clone)]
pub struct DefaultCartsService {
    repository: Arc<dyn CartsRepository>,
    catalog: Option<Arc<dyn ProductCatalog>>,
    settings: CartSettings,
}

impl std::fmt::Debug for DefaultCartsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultCartsService")
            .field("settings", &self.settings)
            .field("catalog", &self.catalog.is_some())
            .finish_non_exhaustive()
    }
}

impl DefaultCartsService {
    #[must_use]
    pub fn new(repository: Arc<dyn CartsRepository>, settings: CartSettings) -> Self {
        Self {
            repository,
            catalog: None,
            settings,
        }
    }

    /// Check stock and prices against `catalog`.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<dyn ProductCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    async fn find(&self, owner: &CartOwner) -> Result<Option<Cart>, CartsServiceError> {
        Ok(self.repository.get(owner).await?)
    }

    async fn find_or_create(&self, owner: CartOwner) -> Result<Cart, CartsServiceError> {
        match self.find(&owner).await? {
            Some(cart) => Ok(cart),
            None => self.create(owner).await,
        }
    }

    fn new_cart(&self, owner: CartOwner) -> Cart {
        let now = Timestamp::now();

        Cart::empty(
            owner,
            &self.settings.currency,
            now,
            expiry_after(now, self.settings.default_ttl),
        )
    }

    async fn create(&self, owner: CartOwner) -> Result<Cart, CartsServiceError> {
        let cart = self.new_cart(owner);

        self.repository.save(&cart).await?;

        debug!(cart_id = %cart.id, owner = %cart.owner, "created cart");

        Ok(cart)
    }

    /// Recalculate, stamp and store a mutated cart.
    async fn persist(&self, mut cart: Cart) -> Result<Cart, CartsServiceError> {
        let now = Timestamp::now();

        cart.recalculate();
        cart.updated_at = now;

        if cart.is_expired_at(now) {
            cart.expires_at = expiry_after(now, self.settings.default_ttl);
        }

        self.repository.save(&cart).await?;

        Ok(cart)
    }

    /// Refuse additions the catalog cannot honour.
    async fn check_stock(
        &self,
        item: &NewCartItem,
        quantity: u32,
    ) -> Result<(), CartsServiceError> {
        let Some(catalog) = &self.catalog else {
            return Ok(());
        };

        let Some(listing) = catalog.lookup(&item.product_id, &item.sku).await? else {
            return Err(CartsServiceError::UnknownProduct {
                product_id: item.product_id.clone(),
                sku: item.sku.clone(),
            });
        };

        if !listing.can_fulfil(quantity) {
            return Err(CartsServiceError::InsufficientStock {
                product_id: item.product_id.clone(),
                requested: quantity,
                available: listing.available_units(),
            });
        }

        Ok(())
    }
}

fn expiry_after(now: Timestamp, ttl: SignedDuration) -> Timestamp {
    now.checked_add(ttl).unwrap_or(Timestamp::MAX)
}

/// Every way an available line disagrees with its current listing.
fn listing_issues(item: &CartItem, listing: &CatalogProduct) -> Vec<CartIssueKind> {
    let mut kinds = Vec::new();

    if listing.price != item.price {
        kinds.push(CartIssueKind::PriceChanged {
            cart_price: item.price,
            current_price: listing.price,
        });
    }

    if !listing.can_fulfil(item.quantity) {
        kinds.push(CartIssueKind::InsufficientStock {
            requested: item.quantity,
            available: listing.available_units(),
        });
    }

    kinds
}

fn positive_quantity(quantity: i64) -> Result<u32, CartsServiceError> {
    u32::try_from(quantity)
        .ok()
        .filter(|quantity| *quantity > 0)
        .ok_or(CartsServiceError::InvalidQuantity(quantity))
}

#[async_trait]
impl CartsService for DefaultCartsService {
    async fn get_cart(&self, owner: CartOwner) -> Result<Cart, CartsServiceError> {
        self.find_or_create(owner).await
    }

    async fn get_cart_by_id(&self, cart: CartId) -> Result<Cart, CartsServiceError> {
        self.repository
            .get_by_id(cart)
            .await?
            .ok_or(CartsServiceError::NotFound)
    }

    async fn add_item(&self, owner: CartOwner, item: NewCartItem) -> Result<Cart, CartsServiceError> {
        let quantity = positive_quantity(item.quantity)?;

        if item.price < Decimal::ZERO {
            return Err(CartsServiceError::InvalidPrice);
        }

        let existing = self.find(&owner).await?;

        let in_cart = existing
            .as_ref()
            .and_then(|cart| cart.find_item(&item.product_id, &item.sku))
            .map_or(0, |line| line.quantity);

        let wanted = in_cart
            .checked_add(quantity)
            .ok_or(CartsServiceError::InvalidQuantity(item.quantity))?;

        self.check_stock(&item, wanted).await?;

        let mut cart = existing.unwrap_or_else(|| self.new_cart(owner));

        match cart
            .items
            .iter_mut()
            .find(|line| line.product_id == item.product_id && line.sku == item.sku)
        {
            Some(line) => line.quantity = wanted,
            None => cart.items.push(CartItem::new(
                item.product_id,
                item.sku,
                item.name,
                item.price,
                quantity,
            )),
        }

        self.persist(cart).await
    }

    async fn update_item(
        &self,
        owner: CartOwner,
        product_id: String,
        quantity: i64,
    ) -> Result<Cart, CartsServiceError> {
        if quantity < 0 {
            return Err(CartsServiceError::InvalidQuantity(quantity));
        }

        let mut cart = self
            .find(&owner)
            .await?
            .ok_or(CartsServiceError::ItemNotFound)?;

        let position = cart
            .position_of_product(&product_id)
            .ok_or(CartsServiceError::ItemNotFound)?;

        if quantity == 0 {
            cart.items.remove(position);
        } else if let Some(line) = cart.items.get_mut(position) {
            line.quantity = u32::try_from(quantity)
                .map_err(|_| CartsServiceError::InvalidQuantity(quantity))?;
        }

        self.persist(cart).await
    }

    async fn remove_item(
        &self,
        owner: CartOwner,
        product_id: String,
    ) -> Result<Cart, CartsServiceError> {
        let mut cart = self
            .find(&owner)
            .await?
            .ok_or(CartsServiceError::ItemNotFound)?;

        let position = cart
            .position_of_product(&product_id)
            .ok_or(CartsServiceError::ItemNotFound)?;

        cart.items.remove(position);

        self.persist(cart).await
    }

    async fn clear_cart(&self, owner: CartOwner) -> Result<Cart, CartsServiceError> {
        let mut cart = self.find_or_create(owner).await?;

        cart.items.clear();

        self.persist(cart).await
    }

    async fn delete_cart(&self, owner: CartOwner) -> Result<(), CartsServiceError> {
        if let Some(cart) = self.find(&owner).await? {
            self.repository.remove(&cart).await?;

            debug!(cart_id = %cart.id, owner = %owner, "deleted cart");
        }

        Ok(())
    }

    async fn extend_expiry(&self, owner: CartOwner, hours: i64) -> Result<Cart, CartsServiceError> {
        let range = i64::from(MIN_EXTENSION_HOURS)..=i64::from(MAX_EXTENSION_HOURS);

        if !range.contains(&hours) {
            return Err(CartsServiceError::InvalidExtension {
                requested: hours,
                min: MIN_EXTENSION_HOURS,
                max: MAX_EXTENSION_HOURS,
            });
        }

        let mut cart = self
            .find(&owner)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        let now = Timestamp::now();

        cart.expires_at = expiry_after(now, SignedDuration::from_hours(hours));
        cart.updated_at = now;

        self.repository.save(&cart).await?;

        Ok(cart)
    }

    async fn migrate_guest_cart(
        &self,
        session_id: String,
        user_id: String,
    ) -> Result<Option<Cart>, CartsServiceError> {
        let (Some(CartOwner::Session(session_id)), Some(CartOwner::User(user_id))) = (
            CartOwner::resolve(None, Some(&session_id)),
            CartOwner::resolve(Some(&user_id), None),
        ) else {
            return Err(CartsServiceError::MissingOwner);
        };

        let migrated = self
            .repository
            .migrate_guest_to_user(&session_id, &user_id)
            .await?;

        if let Some(cart) = &migrated {
            info!(cart_id = %cart.id, user_id, "migrated guest cart");
        }

        Ok(migrated)
    }

    async fn validate_cart(&self, owner: CartOwner) -> Result<CartValidation, CartsServiceError> {
        let cart = self.find_or_create(owner).await?;

        let mut issues = Vec::new();

        if let Some(catalog) = &self.catalog {
            for item in &cart.items {
                let kinds = match catalog.lookup(&item.product_id, &item.sku).await? {
                    Some(listing) if listing.available => listing_issues(item, &listing),
                    _ => vec![CartIssueKind::Unavailable],
                };

                issues.extend(kinds.into_iter().map(|kind| CartIssue {
                    product_id: item.product_id.clone(),
                    sku: item.sku.clone(),
                    kind,
                }));
            }
        }

        Ok(CartValidation {
            cart_id: cart.id,
            valid: issues.is_empty(),
            issues,
        })
    }

    async fn summary(&self, owner: CartOwner) -> Result<CartSummary, CartsServiceError> {
        Ok(self.find_or_create(owner).await?.summary())
    }

    async fn cleanup_expired_carts(&self) -> Result<usize, CartsServiceError> {
        Ok(self.repository.delete_expired().await?)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the owner's cart, creating an empty one on first use.
    async fn get_cart(&self, owner: CartOwner) -> Result<Cart, CartsServiceError>;

    /// Retrieve a cart by its own id.
    async fn get_cart_by_id(&self, cart: CartId) -> Result<Cart, CartsServiceError>;

    /// Add units of a product SKU, merging into an existing line for the same SKU.
    async fn add_item(&self, owner: CartOwner, item: NewCartItem) -> Result<Cart, CartsServiceError>;

    /// Set a line's quantity; zero removes the line.
    async fn update_item(
        &self,
        owner: CartOwner,
        product_id: String,
        quantity: i64,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove a line.
    async fn remove_item(
        &self,
        owner: CartOwner,
        product_id: String,
    ) -> Result<Cart, CartsServiceError>;

    /// Empty the cart, keeping the cart itself.
    async fn clear_cart(&self, owner: CartOwner) -> Result<Cart, CartsServiceError>;

    /// Delete the owner's cart outright.
    async fn delete_cart(&self, owner: CartOwner) -> Result<(), CartsServiceError>;

    /// Push the cart's expiry out to `hours` from now.
    async fn extend_expiry(&self, owner: CartOwner, hours: i64) -> Result<Cart, CartsServiceError>;

    /// Hand a guest cart over to a user at login.
    async fn migrate_guest_cart(
        &self,
        session_id: String,
        user_id: String,
    ) -> Result<Option<Cart>, CartsServiceError>;

    /// Re-check every line against the product catalog.
    async fn validate_cart(&self, owner: CartOwner) -> Result<CartValidation, CartsServiceError>;

    async fn summary(&self, owner: CartOwner) -> Result<CartSummary, CartsServiceError>;

    /// Evict expired carts, returning how many were removed.
    async fn cleanup_expired_carts(&self) -> Result<usize, CartsServiceError>;
}
