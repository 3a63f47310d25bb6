//! Cart service owning the shopper's cart and its persistent copy.

use common::ProductId;
use kv_store::{KvStore, Slot};
use tokio::sync::{Mutex, RwLock};

use crate::catalog::ProductCatalog;
use crate::notify::{Notification, Notifier};

use super::{Cart, CartError, CartEvent, CartOperation, Product, StockEntry, UpdateProductAmount};

/// Storage key of the persisted cart.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Result of a successful cart operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartOutcome {
    /// The change that was committed.
    pub event: CartEvent,

    /// The cart after the change.
    pub cart: Cart,
}

/// Service managing a single shopper's cart.
///
/// Owns the in-memory cart and mirrors it to a persistent slot after every
/// successful mutation. Each mutator either commits fully (slot written,
/// then memory updated) or leaves both copies untouched. Failures are
/// returned to the caller and also reported to the notifier.
///
/// One mutation runs at a time: the operation lock is held across catalog
/// lookups, so overlapping mutators queue behind each other. Readers only
/// touch the committed cart and never wait on a lookup.
pub struct CartService<C, S, N>
where
    C: ProductCatalog,
    S: KvStore,
    N: Notifier,
{
    catalog: C,
    slot: Slot<S, Cart>,
    notifier: N,
    operation: Mutex<()>,
    cart: RwLock<Cart>,
}

impl<C, S, N> CartService<C, S, N>
where
    C: ProductCatalog,
    S: KvStore,
    N: Notifier,
{
    /// Creates a service around an already loaded cart.
    pub fn new(catalog: C, slot: Slot<S, Cart>, notifier: N, cart: Cart) -> Self {
        Self {
            catalog,
            slot,
            notifier,
            operation: Mutex::new(()),
            cart: RwLock::new(cart),
        }
    }

    /// Creates a service, restoring the cart from [`CART_STORAGE_KEY`].
    pub async fn load(catalog: C, store: S, notifier: N) -> Self {
        Self::load_from_slot(catalog, Slot::new(store, CART_STORAGE_KEY), notifier).await
    }

    /// Creates a service, restoring the cart from `slot`.
    ///
    /// An empty slot yields an empty cart. So does a slot whose content
    /// cannot be read or does not describe a valid cart; the stored value is
    /// left in place until the next successful mutation overwrites it.
    #[tracing::instrument(skip_all, fields(key = slot.key()))]
    pub async fn load_from_slot(catalog: C, slot: Slot<S, Cart>, notifier: N) -> Self {
        let cart = match slot.load().await {
            Ok(Some(cart)) => {
                tracing::info!(items = cart.len(), "cart restored");
                cart
            }
            Ok(None) => {
                tracing::debug!("no stored cart, starting empty");
                Cart::new()
            }
            Err(error) => {
                tracing::warn!(%error, "stored cart is unreadable, starting empty");
                Cart::new()
            }
        };

        Self::new(catalog, slot, notifier, cart)
    }

    /// Returns a snapshot of the current cart.
    pub async fn cart(&self) -> Cart {
        self.cart.read().await.clone()
    }

    /// Returns a reference to the product catalog.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Returns a reference to the notifier.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Returns a reference to the persistent slot.
    pub fn slot(&self) -> &Slot<S, Cart> {
        &self.slot
    }

    /// Adds one unit of a product to the cart.
    ///
    /// A product not yet in the cart is appended with amount 1. A product
    /// already present has its amount raised by one, subject to the same
    /// checks as [`CartService::update_product_amount`].
    #[tracing::instrument(skip(self))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<CartOutcome, CartError> {
        let _operation = self.operation.lock().await;
        let cart = self.cart().await;
        let result = self.try_add_product(&cart, product_id).await;
        self.finish(CartOperation::AddProduct, result)
    }

    /// Removes a product's line item from the cart.
    #[tracing::instrument(skip(self))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<CartOutcome, CartError> {
        let _operation = self.operation.lock().await;
        let cart = self.cart().await;
        let result = self.try_remove_product(&cart, product_id).await;
        self.finish(CartOperation::RemoveProduct, result)
    }

    /// Sets the amount of a product already in the cart.
    ///
    /// Checks run in order and the first failure wins: a non-positive
    /// amount, a product missing from the cart, then the current stock.
    #[tracing::instrument(skip(self))]
    pub async fn update_product_amount(
        &self,
        cmd: UpdateProductAmount,
    ) -> Result<CartOutcome, CartError> {
        let _operation = self.operation.lock().await;
        let cart = self.cart().await;
        let result = self
            .try_update_amount(&cart, cmd.product_id, cmd.amount)
            .await;
        self.finish(CartOperation::UpdateProductAmount, result)
    }

    async fn try_add_product(
        &self,
        cart: &Cart,
        product_id: ProductId,
    ) -> Result<CartOutcome, CartError> {
        let product = self.fetch_product(product_id).await?;

        if cart.contains(product_id) {
            let amount = cart.incremented_amount(product_id)?;
            return self.try_update_amount(cart, product_id, amount).await;
        }

        let event = cart.add_new(product)?;
        self.commit(cart, event).await
    }

    async fn try_remove_product(
        &self,
        cart: &Cart,
        product_id: ProductId,
    ) -> Result<CartOutcome, CartError> {
        let event = cart.remove(product_id)?;
        self.commit(cart, event).await
    }

    async fn try_update_amount(
        &self,
        cart: &Cart,
        product_id: ProductId,
        amount: i64,
    ) -> Result<CartOutcome, CartError> {
        cart.validate_amount(product_id, amount)?;
        let stock = self.fetch_stock(product_id).await?;
        let event = cart.update_amount(product_id, amount, &stock)?;
        self.commit(cart, event).await
    }

    async fn fetch_product(&self, product_id: ProductId) -> Result<Product, CartError> {
        match self.catalog.get_product(product_id).await {
            Ok(Some(product)) if product.id == product_id => Ok(product),
            Ok(Some(product)) => Err(CartError::ProductFetch {
                product_id,
                reason: format!("catalog returned product {}", product.id),
            }),
            Ok(None) => Err(CartError::ProductFetch {
                product_id,
                reason: "no product data".to_string(),
            }),
            Err(e) => Err(CartError::ProductFetch {
                product_id,
                reason: e.to_string(),
            }),
        }
    }

    async fn fetch_stock(&self, product_id: ProductId) -> Result<StockEntry, CartError> {
        match self.catalog.get_stock(product_id).await {
            Ok(Some(stock)) => Ok(stock),
            Ok(None) => Err(CartError::ProductFetch {
                product_id,
                reason: "no stock data".to_string(),
            }),
            Err(e) => Err(CartError::ProductFetch {
                product_id,
                reason: e.to_string(),
            }),
        }
    }

    /// Persists the cart with `event` applied, then commits it in memory.
    ///
    /// Callers hold the operation lock, so `cart` is still the committed
    /// state when the write lands.
    async fn commit(&self, cart: &Cart, event: CartEvent) -> Result<CartOutcome, CartError> {
        let mut next = cart.clone();
        next.apply(event.clone());

        self.slot.save(&next).await?;
        *self.cart.write().await = next.clone();

        tracing::debug!(
            event_type = event.event_type(),
            product_id = %event.product_id(),
            items = next.len(),
            "cart updated"
        );

        Ok(CartOutcome { event, cart: next })
    }

    fn finish(
        &self,
        operation: CartOperation,
        result: Result<CartOutcome, CartError>,
    ) -> Result<CartOutcome, CartError> {
        metrics::counter!("cart_operations_total", "operation" => operation.as_str())
            .increment(1);

        if let Err(error) = &result {
            metrics::counter!(
                "cart_operation_failures_total",
                "operation" => operation.as_str(),
                "kind" => error.kind().as_str()
            )
            .increment(1);
            tracing::info!(%operation, %error, "cart operation rejected");
            self.notifier
                .notify(&Notification::for_error(operation, error));
        }

        result
    }
}
