//! Integration tests for the product response cache.

#![allow(clippy::unwrap_used)]

use serde_json::json;
use shopfront_core::{FilterChange, FilterState, NewProduct, Price, ProductId, ProductUpdate};
use shopfront_integration_tests::{envelope, paged, product_json};
use shopfront_storefront::{ApiClient, ApiConfig};
use url::Url;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&ApiConfig::new(Url::parse(&server.uri()).unwrap())).unwrap()
}

async fn mount_product(server: &MockServer, id: &str, price: &str, hits: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/products/{id}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(product_json(id, "Sencha", price, Some(5)))),
        )
        .expect(hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_repeated_product_reads_hit_the_cache() {
    let server = MockServer::start().await;
    mount_product(&server, "p1", "12.50", 1).await;

    let api = client(&server);
    let first = api.get_product(&ProductId::new("p1")).await.unwrap();
    let second = api.get_product(&ProductId::new("p1")).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_clones_share_one_cache() {
    let server = MockServer::start().await;
    mount_product(&server, "p1", "12.50", 1).await;

    let api = client(&server);
    let other = api.clone();
    api.get_product(&ProductId::new("p1")).await.unwrap();
    other.get_product(&ProductId::new("p1")).await.unwrap();
}

#[tokio::test]
async fn test_listings_are_cached_per_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paged(
            json!([product_json("p1", "Sencha", "12.50", None)]),
            1,
            12,
            13,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paged(
            json!([product_json("p13", "Genmaicha", "9.00", None)]),
            2,
            12,
            13,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    let mut filter = FilterState::default();

    let first = api.list_products(&filter, 12).await.unwrap();
    api.list_products(&filter, 12).await.unwrap();

    filter.apply(FilterChange::Page(2));
    let second = api.list_products(&filter, 12).await.unwrap();
    api.list_products(&filter, 12).await.unwrap();

    assert_eq!(first.items[0].id.as_str(), "p1");
    assert_eq!(second.items[0].id.as_str(), "p13");
}

#[tokio::test]
async fn test_update_drops_cached_products() {
    let server = MockServer::start().await;
    mount_product(&server, "p1", "12.50", 2).await;

    Mock::given(method("PUT"))
        .and(path("/products/p1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(product_json("p1", "Sencha", "11.00", Some(5)))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    let id = ProductId::new("p1");
    api.get_product(&id).await.unwrap();

    let update = ProductUpdate {
        price: Some(Price::from_cents(1100)),
        ..ProductUpdate::default()
    };
    let updated = api.update_product(&id, &update).await.unwrap();
    assert_eq!(updated.price, Price::from_cents(1100));

    // The next read goes back to the server
    api.get_product(&id).await.unwrap();
}

#[tokio::test]
async fn test_failed_delete_still_drops_cached_products() {
    let server = MockServer::start().await;
    mount_product(&server, "p1", "12.50", 2).await;

    Mock::given(method("DELETE"))
        .and(path("/products/p1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    let id = ProductId::new("p1");
    api.get_product(&id).await.unwrap();

    assert!(api.delete_product(&id).await.is_err());
    api.get_product(&id).await.unwrap();
}

#[tokio::test]
async fn test_errors_are_not_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/p1"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_product(&server, "p1", "12.50", 1).await;

    let api = client(&server);
    let id = ProductId::new("p1");

    assert!(api.get_product(&id).await.is_err());
    assert_eq!(
        api.get_product(&id).await.unwrap().price,
        Price::from_cents(1250)
    );
}

#[tokio::test]
async fn test_create_posts_product_and_drops_cache() {
    let server = MockServer::start().await;
    mount_product(&server, "p1", "12.50", 2).await;

    Mock::given(method("POST"))
        .and(path("/products"))
        .and(body_partial_json(json!({
            "name": "Hojicha",
            "category": "tea",
            "stock": 40
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(envelope(product_json("p2", "Hojicha", "8.50", Some(40)))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    let id = ProductId::new("p1");
    api.get_product(&id).await.unwrap();

    let created = api.create_product(&new_product()).await.unwrap();
    assert_eq!(created.id.as_str(), "p2");
    assert_eq!(created.price, Price::from_cents(850));

    api.get_product(&id).await.unwrap();
}

#[tokio::test]
async fn test_failed_create_still_drops_cached_products() {
    let server = MockServer::start().await;
    mount_product(&server, "p1", "12.50", 2).await;

    Mock::given(method("POST"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(504))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    let id = ProductId::new("p1");
    api.get_product(&id).await.unwrap();

    assert!(api.create_product(&new_product()).await.is_err());
    api.get_product(&id).await.unwrap();
}

fn new_product() -> NewProduct {
    NewProduct {
        name: "Hojicha".to_string(),
        description: "Roasted green tea".to_string(),
        price: Price::from_cents(850),
        category: "tea".to_string(),
        stock: 40,
        image: String::new(),
    }
}
