use std::time::Duration;

use cart_api::{BackoffStrategy, FetchPolicy, HttpCatalog, RetryPolicy, TimeoutConfig};
use cart_core::{CartManager, CatalogError, CatalogService, Notice, NoticeLog, ProductId};
use cart_store::MemoryStore;
use httpmock::prelude::*;
use serde_json::json;

#[tokio::test]
async fn test_stock_lookup() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/stock/1");
            then.status(200).json_body(json!({ "id": 1, "amount": 3 }));
        })
        .await;

    let catalog = HttpCatalog::new(&server.base_url()).unwrap();
    let stock = catalog.stock(ProductId::new(1)).await.unwrap();

    assert_eq!(stock.id, Some(ProductId::new(1)));
    assert_eq!(stock.amount, 3);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_stock_lookup_without_id() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/stock/4");
            then.status(200).json_body(json!({ "amount": 2 }));
        })
        .await;

    let catalog = HttpCatalog::new(&server.base_url()).unwrap();
    let stock = catalog.stock(ProductId::new(4)).await.unwrap();

    assert_eq!(stock.id, None);
    assert_eq!(stock.amount, 2);
}

#[tokio::test]
async fn test_product_lookup_keeps_extra_fields() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/products/2");
            then.status(200).json_body(json!({
                "id": 2,
                "title": "Tênis VR Caminhada Confortável",
                "price": 139.9,
                "image": "https://cdn.example/2.jpg",
                "brand": "VR"
            }));
        })
        .await;

    let catalog = HttpCatalog::new(&server.base_url()).unwrap();
    let product = catalog.product(ProductId::new(2)).await.unwrap();

    assert_eq!(product.title, "Tênis VR Caminhada Confortável");
    assert_eq!(product.price, 139.9);
    assert_eq!(product.extra["brand"], "VR");
}

#[tokio::test]
async fn test_missing_product_is_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/products/99");
            then.status(404).json_body(json!({}));
        })
        .await;

    let catalog = HttpCatalog::new(&server.base_url()).unwrap();
    let result = catalog.product(ProductId::new(99)).await;

    assert_eq!(result, Err(CatalogError::NotFound(ProductId::new(99))));
}

#[tokio::test]
async fn test_malformed_stock_is_invalid_response() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/stock/1");
            then.status(200).body("<html>maintenance</html>");
        })
        .await;

    let catalog = HttpCatalog::new(&server.base_url()).unwrap();
    let result = catalog.stock(ProductId::new(1)).await;

    assert!(matches!(result, Err(CatalogError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_server_error_is_unavailable_without_retry() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/stock/1");
            then.status(503);
        })
        .await;

    let catalog = HttpCatalog::new(&server.base_url()).unwrap();
    let result = catalog.stock(ProductId::new(1)).await;

    assert!(matches!(result, Err(CatalogError::Unavailable(_))));
    assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn test_server_error_retried_per_policy() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/stock/1");
            then.status(503);
        })
        .await;

    let policy = FetchPolicy::new(
        TimeoutConfig::default(),
        RetryPolicy::new(2).with_backoff(BackoffStrategy::Fixed(Duration::from_millis(5))),
    );
    let catalog = HttpCatalog::with_policy(&server.base_url(), policy).unwrap();
    let result = catalog.stock(ProductId::new(1)).await;

    assert!(matches!(result, Err(CatalogError::Unavailable(_))));
    assert_eq!(mock.hits_async().await, 3);
}

#[tokio::test]
async fn test_slow_catalog_times_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/stock/1");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(json!({ "id": 1, "amount": 3 }));
        })
        .await;

    let policy = FetchPolicy::new(
        TimeoutConfig::from_total(Duration::from_millis(100)),
        RetryPolicy::none(),
    );
    let catalog = HttpCatalog::with_policy(&server.base_url(), policy).unwrap();
    let result = catalog.stock(ProductId::new(1)).await;

    assert!(matches!(result, Err(CatalogError::Unavailable(_))));
}

#[tokio::test]
async fn test_cart_manager_over_http() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/stock/1");
            then.status(200).json_body(json!({ "id": 1, "amount": 2 }));
        })
        .await;
    let product_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/products/1");
            then.status(200).json_body(json!({
                "id": 1,
                "title": "Tênis de Caminhada Leve Confortável",
                "price": 179.9,
                "image": "https://cdn.example/1.jpg"
            }));
        })
        .await;

    let catalog = HttpCatalog::new(&server.base_url()).unwrap();
    let notices = NoticeLog::new();
    let mut manager = CartManager::new(catalog, MemoryStore::new(), notices.clone());

    assert!(manager.add_product(ProductId::new(1)).await);
    assert!(manager.add_product(ProductId::new(1)).await);
    assert!(!manager.add_product(ProductId::new(1)).await);

    assert_eq!(manager.cart().amount_of(ProductId::new(1)), 2);
    assert_eq!(notices.notices(), vec![Notice::StockExceeded]);
    assert_eq!(product_mock.hits_async().await, 1);
}
