use crate::core::persistence::CartPersistence;
use crate::core::{Cart, CartLine, Notifier, ProductId, StockGateway, Storage};
use crate::domain::notification::Notification;
use crate::utils::error::{CartError, CartFailure, CartOperation};
use tokio::sync::{watch, Mutex};

pub type CartResult = std::result::Result<(), CartFailure>;

struct StoreState<S: Storage> {
    cart: Cart,
    persistence: CartPersistence<S>,
}

/// Single owner of the cart.
///
/// Every operation holds the state lock from the stock lookup until the new
/// snapshot is persisted, so concurrent callers are applied one at a time and
/// never overwrite each other's update. Failed operations leave the cart
/// untouched and are reported through the [`Notifier`] as well as the
/// returned [`CartFailure`].
pub struct CartStore<G: StockGateway, S: Storage, N: Notifier> {
    gateway: G,
    notifier: N,
    state: Mutex<StoreState<S>>,
    observers: watch::Sender<Cart>,
}

impl<G: StockGateway, S: Storage, N: Notifier> CartStore<G, S, N> {
    /// Hydrates the cart from storage. The store starts empty when the stored
    /// data cannot be parsed or the storage cannot be read.
    pub async fn open(gateway: G, storage: S, storage_key: &str, notifier: N) -> Self {
        let mut persistence = CartPersistence::new(storage, storage_key);
        let cart = match persistence.load().await {
            Ok(cart) => cart,
            Err(e @ CartError::SerializationError(_)) => {
                tracing::warn!(
                    "Stored cart under '{}' is unreadable: {} ({})",
                    storage_key,
                    e,
                    e.recovery_suggestion()
                );
                Cart::new()
            }
            Err(e) => {
                // 儲存內容可能仍可復原，下一次變更會覆寫它
                tracing::error!(
                    "❌ Could not read cart storage '{}': {}. The next change will overwrite it ({})",
                    storage_key,
                    e,
                    e.recovery_suggestion()
                );
                Cart::new()
            }
        };

        tracing::info!("🛒 Cart ready with {} lines", cart.len());
        let (observers, _) = watch::channel(cart.clone());

        Self {
            gateway,
            notifier,
            state: Mutex::new(StoreState { cart, persistence }),
            observers,
        }
    }

    pub async fn snapshot(&self) -> Cart {
        self.state.lock().await.cart.clone()
    }

    /// Receives every committed cart snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.observers.subscribe()
    }

    /// Adds one unit of the product, creating the line on first add.
    pub async fn add_item(&self, product_id: ProductId) -> CartResult {
        let mut state = self.state.lock().await;
        let outcome = self.plan_add(&state.cart, product_id).await;
        self.finish(&mut state, CartOperation::AddItem, outcome).await
    }

    pub async fn remove_item(&self, product_id: ProductId) -> CartResult {
        let mut state = self.state.lock().await;
        let outcome = state
            .cart
            .without(product_id)
            .map(Some)
            .ok_or(CartFailure::ProductNotInCart { product_id });
        self.finish(&mut state, CartOperation::RemoveItem, outcome)
            .await
    }

    /// Sets the line's amount. Non-positive amounts and products not in the
    /// cart are ignored.
    pub async fn set_amount(&self, product_id: ProductId, amount: i64) -> CartResult {
        if amount <= 0 {
            tracing::debug!("Ignoring non-positive amount {} for product {}", amount, product_id);
            return Ok(());
        }

        let mut state = self.state.lock().await;
        let outcome = self.plan_set_amount(&state.cart, product_id, amount).await;
        self.finish(&mut state, CartOperation::SetAmount, outcome)
            .await
    }

    async fn plan_add(
        &self,
        cart: &Cart,
        product_id: ProductId,
    ) -> Result<Option<Cart>, CartFailure> {
        let stock = self
            .gateway
            .fetch_stock(product_id)
            .await
            .map_err(|source| CartFailure::GatewayFailure {
                operation: CartOperation::AddItem,
                product_id,
                source,
            })?;

        if let Some(line) = cart.get(product_id) {
            let requested = i64::from(line.amount) + 1;
            if requested > stock.amount {
                return Err(CartFailure::OutOfStock {
                    product_id,
                    requested,
                    available: stock.amount,
                });
            }
            return Ok(Some(cart.with_line(line.with_amount(line.amount + 1))));
        }

        if stock.amount < 1 {
            return Err(CartFailure::OutOfStock {
                product_id,
                requested: 1,
                available: stock.amount,
            });
        }

        let entry = self
            .gateway
            .fetch_product(product_id)
            .await
            .map_err(|source| CartFailure::GatewayFailure {
                operation: CartOperation::AddItem,
                product_id,
                source,
            })?;

        // 以回傳的 id 建立購物車項目前先確認是同一個商品
        if entry.id != product_id {
            return Err(CartFailure::GatewayFailure {
                operation: CartOperation::AddItem,
                product_id,
                source: CartError::MismatchedProduct {
                    requested: product_id,
                    returned: entry.id,
                },
            });
        }

        Ok(Some(cart.with_line(CartLine::from_catalog(entry, 1))))
    }

    async fn plan_set_amount(
        &self,
        cart: &Cart,
        product_id: ProductId,
        amount: i64,
    ) -> Result<Option<Cart>, CartFailure> {
        let stock = self
            .gateway
            .fetch_stock(product_id)
            .await
            .map_err(|source| CartFailure::GatewayFailure {
                operation: CartOperation::SetAmount,
                product_id,
                source,
            })?;

        let out_of_stock = CartFailure::OutOfStock {
            product_id,
            requested: amount,
            available: stock.amount,
        };
        if amount > stock.amount {
            return Err(out_of_stock);
        }
        let Ok(amount) = u32::try_from(amount) else {
            return Err(out_of_stock);
        };

        match cart.get(product_id) {
            Some(line) => Ok(Some(cart.with_line(line.with_amount(amount)))),
            None => {
                tracing::debug!("Product {} not in cart, amount change ignored", product_id);
                Ok(None)
            }
        }
    }

    /// Commits a planned snapshot or reports the failure.
    async fn finish(
        &self,
        state: &mut StoreState<S>,
        operation: CartOperation,
        outcome: Result<Option<Cart>, CartFailure>,
    ) -> CartResult {
        let next = match outcome {
            Ok(Some(next)) => next,
            Ok(None) => return Ok(()),
            Err(failure) => {
                tracing::warn!("⚠️ {} rejected: {}", operation, failure);
                self.notifier.notify(Notification::from(&failure));
                return Err(failure);
            }
        };

        state.cart = next.clone();

        // 寫入失敗不影響記憶體中的購物車
        if let Err(e) = state.persistence.save(&next).await {
            tracing::error!(
                "❌ Failed to persist cart to '{}' after {}: {}",
                state.persistence.key(),
                operation,
                e
            );
        }

        tracing::info!(
            "✅ {} committed: {} lines, {} items",
            operation,
            next.len(),
            next.item_count()
        );
        self.observers.send_replace(next);
        Ok(())
    }
}
