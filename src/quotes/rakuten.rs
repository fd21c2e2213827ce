//! Rakuten Ichiba item-search quote source.
//!
//! Searches the Ichiba catalog by keyword and treats the first listing's
//! price as the sale-side reference quote. No buy-back quote is available
//! from this API.

use anyhow::{anyhow, Result};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{Quote, QuoteSource};

const RAKUTEN_BASE_URL: &str = "https://app.rakuten.co.jp";
const SEARCH_PATH: &str = "/services/api/IchibaItem/Search/20170706";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "Items", default)]
    items: Vec<ItemWrapper>,
}

#[derive(Debug, Deserialize)]
struct ItemWrapper {
    #[serde(rename = "Item")]
    item: Item,
}

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(rename = "itemPrice")]
    item_price: Decimal,
}

/// Rakuten Ichiba quote source. Requires an application ID.
#[derive(Debug, Clone)]
pub struct RakutenQuoteSource {
    client: Client,
    app_id: String,
    base_url: String,
}

impl RakutenQuoteSource {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            app_id: app_id.into(),
            base_url: RAKUTEN_BASE_URL.to_string(),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Override the API host, for tests against a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait::async_trait]
impl QuoteSource for RakutenQuoteSource {
    async fn lookup(&self, query: &str) -> Result<Option<Quote>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(anyhow!("quote query is empty"));
        }

        let url = format!("{}{}", self.base_url, SEARCH_PATH);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("applicationId", self.app_id.as_str()),
                ("keyword", query),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<SearchResponse>()
            .await?;

        let Some(wrapper) = response.items.first() else {
            return Ok(None);
        };

        Ok(Some(Quote {
            sale_price: wrapper.item.item_price,
            buy_price: None,
            source: self.name().to_string(),
        }))
    }

    fn name(&self) -> &str {
        "rakuten"
    }
}
