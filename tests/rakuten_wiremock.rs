#![cfg(feature = "quotes")]

use std::sync::Arc;

use anyhow::Result;
use rust_decimal::Decimal;
use tradebook::ledger::{AssetDraft, Ledger, LedgerError};
use tradebook::models::ProductClass;
use tradebook::quotes::{QuoteSource, RakutenQuoteSource};
use tradebook::storage::MemoryStore;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_PATH: &str = "/services/api/IchibaItem/Search/20170706";

fn found_body(price: u64) -> String {
    format!(r#"{{"Items": [{{"Item": {{"itemPrice": {price}}}}}]}}"#)
}

#[tokio::test]
async fn lookup_returns_first_listing_price() -> Result<()> {
    let server = MockServer::start().await;
    let source = RakutenQuoteSource::new("test-app-id").with_base_url(server.uri());

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("applicationId", "test-app-id"))
        .and(query_param("keyword", "Charizard"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(found_body(4200), "application/json"))
        .mount(&server)
        .await;

    let quote = source
        .lookup("Charizard")
        .await?
        .expect("expected a quote");
    assert_eq!(quote.sale_price, Decimal::from(4200));
    assert_eq!(quote.buy_price, None);
    assert_eq!(quote.source, "rakuten");

    Ok(())
}

#[tokio::test]
async fn no_listings_means_no_quote() -> Result<()> {
    let server = MockServer::start().await;
    let source = RakutenQuoteSource::new("test-app-id").with_base_url(server.uri());

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"Items": []}"#, "application/json"),
        )
        .mount(&server)
        .await;

    assert_eq!(source.lookup("nothing like this").await?, None);

    Ok(())
}

#[tokio::test]
async fn empty_query_skips_http() -> Result<()> {
    let server = MockServer::start().await;
    let source = RakutenQuoteSource::new("test-app-id").with_base_url(server.uri());

    assert!(source.lookup("   ").await.is_err());

    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty(), "expected no HTTP requests");

    Ok(())
}

#[tokio::test]
async fn server_error_surfaces_as_lookup_failure() -> Result<()> {
    let server = MockServer::start().await;
    let source = RakutenQuoteSource::new("test-app-id").with_base_url(server.uri());

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(source.lookup("anything").await.is_err());

    Ok(())
}

#[tokio::test]
async fn refresh_updates_reference_price_only_on_success() -> Result<()> {
    let server = MockServer::start().await;
    let source = RakutenQuoteSource::new("test-app-id").with_base_url(server.uri());

    let store = Arc::new(MemoryStore::new());
    let ledger = Ledger::new(store);

    let mut draft = AssetDraft::new(ProductClass::Physical, "Graded card");
    draft.sale_price = Decimal::from(1000);
    let asset = ledger.register_asset(draft).await?;

    // Source down: prices stay as they were and the failure is soft.
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = ledger
        .refresh_reference_price(&asset.id, &source)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::QuoteLookup(_)));
    assert_eq!(
        ledger.asset(&asset.id).await?.sale_price,
        Decimal::from(1000)
    );

    server.reset().await;

    // Source healthy: the reference quote is refreshed.
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(found_body(2500), "application/json"))
        .mount(&server)
        .await;

    let refreshed = ledger.refresh_reference_price(&asset.id, &source).await?;
    assert_eq!(refreshed.sale_price, Decimal::from(2500));
    assert_eq!(
        ledger.asset(&asset.id).await?.sale_price,
        Decimal::from(2500)
    );

    Ok(())
}
