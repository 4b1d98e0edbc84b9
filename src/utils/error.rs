use crate::domain::model::ProductId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CartError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Unexpected response from {url}: HTTP {status}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("Catalog returned product {returned} when product {requested} was requested")]
    MismatchedProduct {
        requested: ProductId,
        returned: ProductId,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

impl CartError {
    pub fn user_friendly_message(&self) -> String {
        match self {
            CartError::ApiError(_) | CartError::UnexpectedStatus { .. } => {
                "Could not reach the stock service".to_string()
            }
            CartError::MismatchedProduct { .. } => {
                "The catalog returned a different product".to_string()
            }
            CartError::IoError(_) => "Could not access cart storage".to_string(),
            CartError::SerializationError(_) => "Stored cart data is unreadable".to_string(),
            CartError::ConfigError { message } => format!("Configuration problem: {}", message),
            CartError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            CartError::ConfigValidationError { field, message } => {
                format!("Invalid configuration ({}): {}", field, message)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CartError::ApiError(_) | CartError::UnexpectedStatus { .. } => {
                "Check that the API base URL is correct and the service is running"
            }
            CartError::MismatchedProduct { .. } => "Check the catalog service's product data",
            CartError::IoError(_) => "Check that the storage directory exists and is writable",
            CartError::SerializationError(_) => {
                "Remove the stored cart file to start with an empty cart"
            }
            CartError::ConfigError { .. }
            | CartError::InvalidConfigValueError { .. }
            | CartError::ConfigValidationError { .. } => {
                "Review the command line flags or the TOML configuration file"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CartError>;

/// Cart operation that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
    AddItem,
    RemoveItem,
    SetAmount,
}

impl std::fmt::Display for CartOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CartOperation::AddItem => "add item",
            CartOperation::RemoveItem => "remove item",
            CartOperation::SetAmount => "set amount",
        };
        f.write_str(name)
    }
}

/// Why a cart operation was rejected. The cart is unchanged whenever one of
/// these is returned.
#[derive(Error, Debug)]
pub enum CartFailure {
    #[error("product {product_id}: requested {requested}, only {available} in stock")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    #[error("product {product_id} is not in the cart")]
    ProductNotInCart { product_id: ProductId },

    #[error("{operation} failed for product {product_id}: {source}")]
    GatewayFailure {
        operation: CartOperation,
        product_id: ProductId,
        #[source]
        source: CartError,
    },
}

impl CartFailure {
    pub fn product_id(&self) -> ProductId {
        match self {
            CartFailure::OutOfStock { product_id, .. }
            | CartFailure::ProductNotInCart { product_id }
            | CartFailure::GatewayFailure { product_id, .. } => *product_id,
        }
    }

    /// Text shown to the shopper.
    pub fn notification_message(&self) -> &'static str {
        match self {
            CartFailure::OutOfStock { .. } => "requested quantity exceeds stock",
            CartFailure::ProductNotInCart { .. } => "could not remove product",
            CartFailure::GatewayFailure { operation, .. } => match operation {
                CartOperation::AddItem => "could not add product",
                CartOperation::SetAmount => "could not change product quantity",
                CartOperation::RemoveItem => "could not remove product",
            },
        }
    }
}
