pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CartCommand, CliConfig};

pub use adapters::{HttpStockGateway, LocalStorage};
pub use config::toml_config::TomlConfig;
pub use core::{cart_store::CartStore, persistence::CartPersistence};
pub use domain::model::{Cart, CartLine, CatalogEntry, ProductId, StockRecord};
pub use domain::notification::{ConsoleNotifier, MemoryNotifier, Notification, NotificationKind};
pub use utils::error::{CartError, CartFailure, CartOperation, Result};
