pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::{ConfigProvider, ProductId};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_cart_settings, Validate};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3333";
pub const DEFAULT_STORAGE_DIR: &str = "./.cart";
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "cart")]
#[command(about = "Manage a local shopping cart backed by a remote stock service")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    #[arg(long, default_value = DEFAULT_STORAGE_DIR)]
    pub storage_dir: String,

    #[arg(long, default_value = DEFAULT_STORAGE_KEY)]
    pub storage_key: String,

    #[arg(long, help = "Per-request timeout for the stock service")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Load settings from a TOML file instead of flags")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: CartCommand,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum CartCommand {
    /// Add one unit of a product
    Add { product_id: ProductId },
    /// Remove a product line
    Remove { product_id: ProductId },
    /// Set the quantity of a product already in the cart
    Set {
        product_id: ProductId,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
    /// Show the cart
    Show,
    /// List the catalog
    Products,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn storage_dir(&self) -> &str {
        &self.storage_dir
    }

    fn storage_key(&self) -> &str {
        &self.storage_key
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_cart_settings(
            &self.api_base_url,
            &self.storage_dir,
            &self.storage_key,
            self.timeout_seconds,
        )
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let config = CliConfig::try_parse_from(["cart", "show"]).unwrap();

        assert_eq!(config.api_base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(config.storage_key(), DEFAULT_STORAGE_KEY);
        assert_eq!(config.request_timeout(), None);
        assert!(matches!(config.command, CartCommand::Show));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_set_with_negative_amount() {
        let config = CliConfig::try_parse_from([
            "cart",
            "--timeout-seconds",
            "5",
            "set",
            "3",
            "-1",
        ])
        .unwrap();

        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
        assert!(matches!(
            config.command,
            CartCommand::Set {
                product_id: 3,
                amount: -1
            }
        ));
    }

    #[test]
    fn test_invalid_timeout_fails_validation() {
        let config =
            CliConfig::try_parse_from(["cart", "--timeout-seconds", "0", "show"]).unwrap();
        assert!(config.validate().is_err());
    }
}
