//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::time::Duration;

use beer_catalog_integration::{catalog_config, CatalogClient, CatalogConfig};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN_PATH: &str = "/oauth2/token";
pub const BEERS_PATH: &str = "/api/v1/beers";
pub const BEER_ID: &str = "3f2c1f4e-8a7b-4c55-9d1e-0b6a3f9e2d10";

/// Start a mock server hosting both the token endpoint and the catalog.
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

pub fn test_config(server: &MockServer) -> CatalogConfig {
    catalog_config()
        .base_url(server.uri())
        .token_endpoint(format!("{}{}", server.uri(), TOKEN_PATH))
        .client_id("messaging-client")
        .client_secret("secret")
        .add_scope("message.read")
        .add_scope("message.write")
        .timeout(Duration::from_secs(5))
        .build()
        .expect("valid test configuration")
}

pub fn test_client(server: &MockServer) -> CatalogClient {
    CatalogClient::new(test_config(server)).expect("client builds")
}

pub fn token_body(token: &str) -> Value {
    json!({
        "access_token": token,
        "token_type": "Bearer",
        "expires_in": 3600,
        "scope": "message.read message.write"
    })
}

/// Mount a token endpoint that issues `token` exactly `times` times.
pub async fn mount_token(server: &MockServer, token: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(token)))
        .expect(times)
        .mount(server)
        .await;
}

pub fn beer_json(id: &str) -> Value {
    json!({
        "id": id,
        "version": 0,
        "beerName": "Mango Bobs",
        "beerStyle": "ALE",
        "upc": "0631234200036",
        "quantityOnHand": 500,
        "price": 12.95,
        "createdDate": "2024-03-01T10:15:30.123",
        "updateDate": "2024-03-01T10:15:30.123"
    })
}

pub fn page_json(content: Vec<Value>, number: u32, size: u32, total: u64) -> Value {
    json!({
        "content": content,
        "number": number,
        "size": size,
        "totalElements": total,
        "totalPages": if size == 0 { 0 } else { total.div_ceil(u64::from(size)) },
        "pageable": {"pageNumber": number, "pageSize": size},
        "first": number == 0,
        "empty": false
    })
}
