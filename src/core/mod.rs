pub mod cart_store;
pub mod persistence;

pub use crate::domain::model::{Cart, CartLine, CatalogEntry, ProductId, StockRecord};
pub use crate::domain::ports::{ConfigProvider, Notifier, StockGateway, Storage};
pub use crate::utils::error::Result;
