use crate::core::{CatalogEntry, ConfigProvider, ProductId, StockGateway, StockRecord};
use crate::utils::error::{CartError, Result};
use crate::utils::validation::validate_url;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct StockResponse {
    amount: i64,
}

/// Stock and catalog lookups over HTTP.
///
/// Any non-success status or malformed body is returned as an error; callers
/// decide how to report it.
#[derive(Debug, Clone)]
pub struct HttpStockGateway {
    client: Client,
    base_url: String,
}

impl HttpStockGateway {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        validate_url("api_base_url", base_url)?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.api_base_url(), config.request_timeout())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);

        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(&url).send().await?;
        tracing::debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            return Err(CartError::UnexpectedStatus {
                url,
                status: response.status().as_u16(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait::async_trait]
impl StockGateway for HttpStockGateway {
    async fn fetch_stock(&self, product_id: ProductId) -> Result<StockRecord> {
        let stock: StockResponse = self.get_json(&format!("stock/{}", product_id)).await?;
        Ok(StockRecord {
            product_id,
            amount: stock.amount,
        })
    }

    async fn fetch_product(&self, product_id: ProductId) -> Result<CatalogEntry> {
        self.get_json(&format!("products/{}", product_id)).await
    }

    async fn list_products(&self) -> Result<Vec<CatalogEntry>> {
        self.get_json("products").await
    }
}
