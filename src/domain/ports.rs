use crate::domain::model::{CatalogEntry, ProductId, StockRecord};
use crate::domain::notification::Notification;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Client-local key/value storage that survives process restarts.
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str)
        -> impl std::future::Future<Output = Result<Option<String>>> + Send;
    fn set_item(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn storage_dir(&self) -> &str;
    fn storage_key(&self) -> &str;
    fn request_timeout(&self) -> Option<Duration>;
}

/// Read-only inventory and catalog service.
#[async_trait]
pub trait StockGateway: Send + Sync {
    async fn fetch_stock(&self, product_id: ProductId) -> Result<StockRecord>;
    async fn fetch_product(&self, product_id: ProductId) -> Result<CatalogEntry>;
    async fn list_products(&self) -> Result<Vec<CatalogEntry>>;
}

/// Receives user-visible failure notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
