//! Catalog Client
//!
//! High-level client for the beer catalog combining token management,
//! authenticated transport, URI construction and response decoding.

use std::sync::Arc;

use url::Url;

use crate::core::{
    build_collection_uri, build_instance_uri, build_list_uri, AuthenticatedTransport, HttpMethod,
    HttpTransport, ReqwestHttpTransport,
};
use crate::error::{CatalogResult, DecodeError, ValidationError};
use crate::flows::ClientCredentialsFlowImpl;
use crate::pagination::{decode_page, decode_record, Page};
use crate::token::{CachingTokenManager, TokenManager, TokenManagerConfig};
use crate::types::{BeerDto, BeerId, BeerQuery, CatalogConfig};

/// Token manager used by [`CatalogClient::new`].
pub type DefaultTokenManager = CachingTokenManager<ClientCredentialsFlowImpl<ReqwestHttpTransport>>;

/// Client for the beer catalog service.
///
/// Safe to share across tasks; operations may run concurrently and share one
/// cached access token.
pub struct CatalogClient<T: HttpTransport = ReqwestHttpTransport, M: TokenManager = DefaultTokenManager>
{
    config: CatalogConfig,
    transport: AuthenticatedTransport<T, M>,
}

impl CatalogClient {
    /// Create a client backed by reqwest and a caching client-credentials
    /// token manager.
    pub fn new(config: CatalogConfig) -> CatalogResult<Self> {
        let http = Arc::new(ReqwestHttpTransport::with_options(
            config.timeout,
            config.max_response_size,
        )?);
        let flow = Arc::new(ClientCredentialsFlowImpl::new(
            config.clone(),
            Arc::clone(&http),
        ));
        let tokens = Arc::new(CachingTokenManager::new(
            flow,
            TokenManagerConfig::from(&config),
        ));
        let transport = AuthenticatedTransport::new(http, tokens).with_timeout(config.timeout);

        Ok(Self { config, transport })
    }
}

impl<T: HttpTransport, M: TokenManager> CatalogClient<T, M> {
    /// Create a client over an already assembled transport.
    pub fn with_transport(config: CatalogConfig, transport: AuthenticatedTransport<T, M>) -> Self {
        Self { config, transport }
    }

    /// Get the client configuration.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// List beers. `None` lists without filters at the server's default paging.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, query: Option<&BeerQuery>) -> CatalogResult<Page<BeerDto>> {
        let url = match query {
            Some(query) => build_list_uri(&self.config.base_url, query)?,
            None => build_collection_uri(&self.config.base_url)?,
        };

        let response = self
            .transport
            .execute(HttpMethod::Get, url.as_str(), None)
            .await?;
        let page = decode_page(&response.body)?;

        tracing::debug!(
            returned = page.number_of_elements(),
            total = page.total_elements,
            "Listed beers"
        );
        Ok(page)
    }

    /// List beers without filters.
    pub async fn list_all(&self) -> CatalogResult<Page<BeerDto>> {
        self.list(None).await
    }

    /// List beers whose name matches `name`.
    pub async fn list_by_name(&self, name: &str) -> CatalogResult<Page<BeerDto>> {
        self.list(Some(&BeerQuery::by_name(name))).await
    }

    /// Fetch a single beer.
    #[tracing::instrument(skip(self), fields(id = %id))]
    pub async fn get(&self, id: &BeerId) -> CatalogResult<BeerDto> {
        let url = build_instance_uri(&self.config.base_url, id)?;
        self.fetch(&url).await
    }

    /// Create a beer and return the stored representation.
    ///
    /// Server-assigned fields on `beer` are not sent. The record is re-read
    /// from the path of the `Location` the server answers with, always on
    /// the configured base URL.
    #[tracing::instrument(skip(self, beer), fields(beer_name = %beer.beer_name))]
    pub async fn create(&self, beer: &BeerDto) -> CatalogResult<BeerDto> {
        let url = build_collection_uri(&self.config.base_url)?;
        let body = serde_json::to_string(&beer.without_server_fields()).map_err(DecodeError::from)?;

        let response = self
            .transport
            .execute(HttpMethod::Post, url.as_str(), Some(body))
            .await?;

        let location = response
            .header("location")
            .filter(|location| !location.trim().is_empty())
            .ok_or(DecodeError::MissingLocation)?;
        let created = self.resolve_location(location)?;

        tracing::debug!(location = %created, "Beer created");
        self.fetch(&created).await
    }

    /// Replace a beer and return the stored representation.
    ///
    /// Fails with a validation error, without any request, when `beer` has
    /// no id.
    #[tracing::instrument(skip(self, beer), fields(id = ?beer.id))]
    pub async fn update(&self, beer: &BeerDto) -> CatalogResult<BeerDto> {
        let id = beer
            .id
            .as_ref()
            .ok_or(ValidationError::MissingId { operation: "update" })?;
        let url = build_instance_uri(&self.config.base_url, id)?;
        let body = serde_json::to_string(beer).map_err(DecodeError::from)?;

        self.transport
            .execute(HttpMethod::Put, url.as_str(), Some(body))
            .await?;

        self.fetch(&url).await
    }

    /// Delete a beer.
    #[tracing::instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: &BeerId) -> CatalogResult<()> {
        let url = build_instance_uri(&self.config.base_url, id)?;
        self.transport
            .execute(HttpMethod::Delete, url.as_str(), None)
            .await?;
        Ok(())
    }

    async fn fetch(&self, url: &Url) -> CatalogResult<BeerDto> {
        let response = self
            .transport
            .execute(HttpMethod::Get, url.as_str(), None)
            .await?;
        Ok(decode_record(&response.body)?)
    }

    // Only the path and query of the location are used; scheme and host
    // always come from the base URL so the token never leaves it.
    fn resolve_location(&self, location: &str) -> Result<Url, DecodeError> {
        let parsed = self
            .config
            .base_url
            .join(location.trim())
            .map_err(|_| DecodeError::InvalidLocation {
                location: location.to_string(),
            })?;

        let mut url = self.config.base_url.clone();
        url.set_path(parsed.path());
        url.set_query(parsed.query());
        url.set_fragment(None);
        Ok(url)
    }
}

/// Create a new catalog client.
pub fn catalog_client(config: CatalogConfig) -> CatalogResult<CatalogClient> {
    CatalogClient::new(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::catalog_config;
    use crate::core::{HttpResponse, MockHttpTransport};
    use crate::error::CatalogError;
    use crate::token::MockTokenManager;
    use crate::types::BeerStyle;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;

    const ID: &str = "3f2c1f4e-8a7b-4c55-9d1e-0b6a3f9e2d10";

    fn create_test_config() -> CatalogConfig {
        catalog_config()
            .base_url("http://localhost:8080")
            .token_endpoint("http://localhost:9000/oauth2/token")
            .client_id("catalog-client")
            .client_secret("secret")
            .build()
            .unwrap()
    }

    fn mock_client() -> (
        Arc<MockHttpTransport>,
        CatalogClient<MockHttpTransport, MockTokenManager>,
    ) {
        let http = Arc::new(MockHttpTransport::new());
        let tokens = Arc::new(MockTokenManager::new());
        let transport = AuthenticatedTransport::new(Arc::clone(&http), tokens);
        (http, CatalogClient::with_transport(create_test_config(), transport))
    }

    fn stored_beer() -> serde_json::Value {
        json!({
            "id": ID,
            "version": 0,
            "beerName": "Mango Bobs",
            "beerStyle": "ALE",
            "upc": "0631234200036",
            "quantityOnHand": 500,
            "price": "12.95",
            "createdDate": "2024-03-01T10:15:30",
            "updateDate": "2024-03-01T10:15:30"
        })
    }

    fn created(location: &str) -> HttpResponse {
        HttpResponse {
            status: 201,
            headers: HashMap::from([("location".to_string(), location.to_string())]),
            body: String::new(),
        }
    }

    #[test]
    fn test_client_creation() {
        let client = CatalogClient::new(create_test_config());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_list_without_query_has_no_parameters() {
        let (http, client) = mock_client();
        http.queue_json_response(
            200,
            &json!({"content": [stored_beer()], "number": 0, "size": 25, "totalElements": 1}),
        );

        let page = client.list_all().await.unwrap();
        assert_eq!(page.number_of_elements(), 1);
        assert_eq!(page.content[0].beer_name, "Mango Bobs");

        let request = http.get_last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.url, "http://localhost:8080/api/v1/beers");
    }

    #[tokio::test]
    async fn test_list_queries_do_not_leak_between_calls() {
        let (http, client) = mock_client();
        let empty = json!({"content": [], "number": 0, "size": 25, "totalElements": 0});
        http.queue_json_response(200, &empty)
            .queue_json_response(200, &empty);

        let query = BeerQuery::new()
            .style(BeerStyle::Stout)
            .show_inventory(true)
            .page_size(10);
        client.list(Some(&query)).await.unwrap();
        client.list_by_name("Porter").await.unwrap();

        let urls: Vec<String> = http.get_requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "http://localhost:8080/api/v1/beers?style=STOUT&showInventory=true&pageSize=10"
                    .to_string(),
                "http://localhost:8080/api/v1/beers?name=Porter".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let (http, client) = mock_client();
        http.queue_status(404);

        let err = client.get(&BeerId::from(ID)).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_create_strips_server_fields_and_follows_location() {
        let (http, client) = mock_client();
        http.queue_response(created(&format!("/api/v1/beers/{ID}")))
            .queue_json_response(200, &stored_beer());

        let mut beer = BeerDto::new("Mango Bobs", BeerStyle::Ale)
            .with_upc("0631234200036")
            .with_quantity_on_hand(500)
            .with_price(rust_decimal::Decimal::new(1295, 2))
            .with_id("client-chosen");
        beer.version = Some(7);

        let stored = client.create(&beer).await.unwrap();
        assert_eq!(stored.id, Some(BeerId::from(ID)));
        assert_eq!(stored.beer_name, beer.beer_name);
        assert_eq!(stored.beer_style, beer.beer_style);
        assert_eq!(stored.upc, beer.upc);
        assert_eq!(stored.quantity_on_hand, beer.quantity_on_hand);
        assert_eq!(stored.price, beer.price);

        let requests = http.get_requests();
        assert_eq!(requests[0].method, HttpMethod::Post);
        let sent: serde_json::Value =
            serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert!(sent.get("id").is_none());
        assert!(sent.get("version").is_none());
        assert_eq!(requests[1].url, format!("http://localhost:8080/api/v1/beers/{ID}"));
    }

    #[tokio::test]
    async fn test_create_keeps_foreign_location_on_base_host() {
        let (http, client) = mock_client();
        http.queue_response(created(&format!(
            "https://elsewhere.example.com/api/v1/beers/{ID}?v=1#frag"
        )))
        .queue_json_response(200, &stored_beer());

        client
            .create(&BeerDto::new("Mango Bobs", BeerStyle::Ale))
            .await
            .unwrap();

        assert_eq!(
            http.get_last_request().unwrap().url,
            format!("http://localhost:8080/api/v1/beers/{ID}?v=1")
        );
    }

    #[tokio::test]
    async fn test_create_without_location_is_decode_error() {
        let (http, client) = mock_client();
        http.queue_status(201);

        let err = client
            .create(&BeerDto::new("Galaxy Cat", BeerStyle::Ipa))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Decode(DecodeError::MissingLocation)));
        assert_eq!(http.request_count(), 1);
    }

    #[tokio::test]
    async fn test_create_with_invalid_location_is_decode_error() {
        let (http, client) = mock_client();
        http.queue_response(created("http://[::1"));

        let err = client
            .create(&BeerDto::new("Galaxy Cat", BeerStyle::Ipa))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Decode(DecodeError::InvalidLocation { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_without_id_makes_no_request() {
        let http = Arc::new(MockHttpTransport::new());
        let tokens = Arc::new(MockTokenManager::new());
        let transport = AuthenticatedTransport::new(Arc::clone(&http), Arc::clone(&tokens));
        let client = CatalogClient::with_transport(create_test_config(), transport);

        let err = client
            .update(&BeerDto::new("Galaxy Cat", BeerStyle::Ipa))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Validation(ValidationError::MissingId { .. })
        ));
        assert_eq!(http.request_count(), 0);
        assert_eq!(tokens.get_count(), 0);
    }

    #[tokio::test]
    async fn test_update_puts_then_refetches() {
        let (http, client) = mock_client();
        http.queue_status(204).queue_json_response(200, &stored_beer());

        let beer = BeerDto::new("Mango Bobs", BeerStyle::Ale).with_id(ID);
        let stored = client.update(&beer).await.unwrap();
        assert_eq!(stored.version, Some(0));

        let requests = http.get_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, HttpMethod::Put);
        assert_eq!(requests[0].url, requests[1].url);
        assert_eq!(requests[1].method, HttpMethod::Get);
    }

    #[tokio::test]
    async fn test_delete() {
        let (http, client) = mock_client();
        http.queue_status(204).queue_status(404);

        client.delete(&BeerId::from(ID)).await.unwrap();
        assert_eq!(http.get_last_request().unwrap().method, HttpMethod::Delete);

        let err = client.delete(&BeerId::from(ID)).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { .. }));
    }
}
