use crate::core::{Cart, Storage};
use crate::utils::error::Result;

/// Keeps the cart snapshot in durable storage under a single key.
pub struct CartPersistence<S: Storage> {
    storage: S,
    key: String,
    last_persisted: Option<Cart>,
}

impl<S: Storage> CartPersistence<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            last_persisted: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// 讀取已儲存的購物車，沒有資料時回傳空購物車
    pub async fn load(&mut self) -> Result<Cart> {
        let cart = match self.storage.get_item(&self.key).await? {
            Some(raw) => serde_json::from_str::<Cart>(&raw)?,
            None => {
                tracing::debug!("No stored cart under '{}', starting empty", self.key);
                Cart::new()
            }
        };

        tracing::debug!("Loaded cart with {} lines from '{}'", cart.len(), self.key);
        self.last_persisted = Some(cart.clone());
        Ok(cart)
    }

    /// Writes the cart when it differs from the last persisted snapshot.
    /// Returns whether anything was written.
    pub async fn save(&mut self, cart: &Cart) -> Result<bool> {
        if self.last_persisted.as_ref() == Some(cart) {
            tracing::debug!("Cart unchanged, skipping write to '{}'", self.key);
            return Ok(false);
        }

        let json = serde_json::to_string(cart)?;
        self.storage.set_item(&self.key, &json).await?;

        tracing::debug!("Persisted cart ({} bytes) to '{}'", json.len(), self.key);
        self.last_persisted = Some(cart.clone());
        Ok(true)
    }
}
