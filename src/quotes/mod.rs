pub mod rakuten;

pub use rakuten::RakutenQuoteSource;

use anyhow::Result;
use rust_decimal::Decimal;

/// Advisory market quote for a holding.
///
/// Quotes only ever update the reference price fields on an asset; they are
/// never authoritative for accounting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub sale_price: Decimal,
    /// Buy-back quote, when the source provides one.
    pub buy_price: Option<Decimal>,
    pub source: String,
}

#[async_trait::async_trait]
pub trait QuoteSource: Send + Sync {
    /// Look up a quote for a free-text query (typically the asset name).
    ///
    /// `Ok(None)` means the source answered but had no match.
    async fn lookup(&self, query: &str) -> Result<Option<Quote>>;

    fn name(&self) -> &str;
}

pub struct NoopQuoteSource;

#[async_trait::async_trait]
impl QuoteSource for NoopQuoteSource {
    async fn lookup(&self, _query: &str) -> Result<Option<Quote>> {
        Ok(None)
    }

    fn name(&self) -> &str {
        "noop"
    }
}
