//! WooCommerce REST API client.

use std::sync::Arc;

use mini_product_manager_core::{NewProduct, Product, ProductId, ProductPatch};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::config::WooCommerceConfig;

use super::WooCommerceError;
use super::oauth::{self, Nonce};
use super::types::ProductPage;

/// User agent sent with every request.
const USER_AGENT: &str = concat!("mini-product-manager/", env!("CARGO_PKG_VERSION"));

/// How requests prove the consumer key/secret to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthMethod {
    /// HTTP Basic auth, only allowed over HTTPS.
    Basic,
    /// Signed query string for plain-HTTP stores.
    OAuth1,
}

/// WooCommerce REST API client.
///
/// Built once from validated configuration and shared by every request
/// handler; cloning is cheap.
#[derive(Clone)]
pub struct WooCommerceClient {
    inner: Arc<WooCommerceClientInner>,
}

struct WooCommerceClientInner {
    client: reqwest::Client,
    /// `{store}/wp-json/{version}/`, always with a trailing slash.
    api_base: Url,
    consumer_key: String,
    consumer_secret: SecretString,
    auth: AuthMethod,
}

impl std::fmt::Debug for WooCommerceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WooCommerceClient")
            .field("api_base", &self.inner.api_base.as_str())
            .field("consumer_key", &self.inner.consumer_key)
            .field("auth", &self.inner.auth)
            .finish_non_exhaustive()
    }
}

impl WooCommerceClient {
    /// Create a new WooCommerce API client.
    ///
    /// # Errors
    ///
    /// Returns error if the API base URL cannot be derived from the store URL
    /// or the HTTP client fails to build.
    pub fn new(config: &WooCommerceConfig) -> Result<Self, WooCommerceError> {
        let mut store = config.url.clone();
        if !store.path().ends_with('/') {
            let path = format!("{}/", store.path());
            store.set_path(&path);
        }
        let api_base = store.join(&format!("wp-json/{}/", config.api_version))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .build()?;

        let auth = if config.is_https() {
            AuthMethod::Basic
        } else {
            AuthMethod::OAuth1
        };

        Ok(Self {
            inner: Arc::new(WooCommerceClientInner {
                client,
                api_base,
                consumer_key: config.consumer_key.clone(),
                consumer_secret: config.consumer_secret.clone(),
                auth,
            }),
        })
    }

    /// Base URL all endpoints are resolved against.
    #[must_use]
    pub fn api_base(&self) -> &Url {
        &self.inner.api_base
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List one page of products.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the store answers non-2xx.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<ProductPage, WooCommerceError> {
        let query = [("page", page.to_string()), ("per_page", per_page.to_string())];
        let response = self
            .send::<()>(Method::GET, "products", &query, None)
            .await?;

        let (total, total_pages) = ProductPage::totals_from(response.headers());
        let products: Vec<Product> = parse_json(response).await?;

        debug!(count = products.len(), ?total, ?total_pages, "Listed products");

        Ok(ProductPage {
            products,
            total,
            total_pages,
        })
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the store answers non-2xx
    /// (404 with `woocommerce_rest_product_invalid_id` for unknown IDs).
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, WooCommerceError> {
        self.get(&format!("products/{id}")).await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the store rejects the product.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, WooCommerceError> {
        let created: Product = self.post("products", product).await?;
        debug!(product_id = %created.id, "Product created");
        Ok(created)
    }

    /// Apply a partial update to a product.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the store rejects the update.
    #[instrument(skip(self, patch), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, WooCommerceError> {
        self.put(&format!("products/{id}"), patch).await
    }

    /// Delete a product. With `force` the product bypasses the trash.
    ///
    /// Returns the deleted record as the store reports it.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the store refuses the delete.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(
        &self,
        id: ProductId,
        force: bool,
    ) -> Result<Value, WooCommerceError> {
        let query = [("force", force.to_string())];
        let response = self
            .send::<()>(Method::DELETE, &format!("products/{id}"), &query, None)
            .await?;
        parse_json(response).await
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    /// Execute a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> Result<T, WooCommerceError> {
        let response = self.send::<()>(Method::GET, endpoint, &[], None).await?;
        parse_json(response).await
    }

    /// Execute a POST request.
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, WooCommerceError> {
        let response = self.send(Method::POST, endpoint, &[], Some(body)).await?;
        parse_json(response).await
    }

    /// Execute a PUT request.
    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, WooCommerceError> {
        let response = self.send(Method::PUT, endpoint, &[], Some(body)).await?;
        parse_json(response).await
    }

    /// Build the absolute URL of an endpoint with its query parameters.
    fn endpoint_url(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<Url, WooCommerceError> {
        let mut url = self.inner.api_base.join(endpoint.trim_start_matches('/'))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Start a request carrying the store credentials.
    fn authorized(&self, method: &Method, url: Url) -> Result<RequestBuilder, WooCommerceError> {
        let inner = &self.inner;
        match inner.auth {
            AuthMethod::Basic => Ok(inner
                .client
                .request(method.clone(), url)
                .basic_auth(&inner.consumer_key, Some(inner.consumer_secret.expose_secret()))),
            AuthMethod::OAuth1 => {
                let signed = oauth::sign(
                    method,
                    &url,
                    &inner.consumer_key,
                    inner.consumer_secret.expose_secret(),
                    &Nonce::generate(),
                )?;
                Ok(inner.client.request(method.clone(), signed))
            }
        }
    }

    /// Send an authenticated request, turning non-2xx answers into errors.
    async fn send<B: Serialize + Sync>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Response, WooCommerceError> {
        let url = self.endpoint_url(endpoint, query)?;
        let mut request = self.authorized(&method, url)?;
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(%method, endpoint, status = status.as_u16(), "WooCommerce response");

        if status.is_success() {
            return Ok(response);
        }

        Err(api_error(response).await)
    }
}

/// Parse a success response body.
async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, WooCommerceError> {
    response
        .json()
        .await
        .map_err(|e| WooCommerceError::Parse(format!("Failed to parse response: {e}")))
}

/// Capture status, reason phrase and JSON body of a failed response.
async fn api_error(response: Response) -> WooCommerceError {
    let status = response.status();
    let status_text = status.canonical_reason().unwrap_or_default().to_string();
    let body = response
        .text()
        .await
        .ok()
        .and_then(|text| serde_json::from_str::<Value>(&text).ok());

    WooCommerceError::Api {
        status: status.as_u16(),
        status_text,
        body,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn config(url: &str) -> WooCommerceConfig {
        WooCommerceConfig {
            url: Url::parse(url).unwrap(),
            api_version: "wc/v3".to_string(),
            consumer_key: "ck_test".to_string(),
            consumer_secret: SecretString::from("cs_test"),
        }
    }

    #[test]
    fn test_api_base_for_root_store() {
        let client = WooCommerceClient::new(&config("https://shop.test")).unwrap();
        assert_eq!(client.api_base().as_str(), "https://shop.test/wp-json/wc/v3/");
    }

    #[test]
    fn test_api_base_for_store_in_subdirectory() {
        let client = WooCommerceClient::new(&config("https://example.test/shop")).unwrap();
        assert_eq!(
            client.api_base().as_str(),
            "https://example.test/shop/wp-json/wc/v3/"
        );
    }

    #[test]
    fn test_endpoint_url_with_query() {
        let client = WooCommerceClient::new(&config("https://shop.test/")).unwrap();
        let url = client
            .endpoint_url("products", &[("page", "2".to_string()), ("per_page", "5".to_string())])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://shop.test/wp-json/wc/v3/products?page=2&per_page=5"
        );

        let url = client.endpoint_url("/products/42", &[]).unwrap();
        assert_eq!(url.as_str(), "https://shop.test/wp-json/wc/v3/products/42");
    }

    #[test]
    fn test_auth_method_follows_scheme() {
        let https = WooCommerceClient::new(&config("https://shop.test")).unwrap();
        assert_eq!(https.inner.auth, AuthMethod::Basic);

        let http = WooCommerceClient::new(&config("http://localhost:8080")).unwrap();
        assert_eq!(http.inner.auth, AuthMethod::OAuth1);
    }

    #[test]
    fn test_https_requests_use_basic_auth() {
        let client = WooCommerceClient::new(&config("https://shop.test")).unwrap();
        let url = client.endpoint_url("products", &[]).unwrap();
        let request = client.authorized(&Method::GET, url).unwrap().build().unwrap();

        // base64("ck_test:cs_test")
        assert_eq!(
            request.headers().get(reqwest::header::AUTHORIZATION).unwrap(),
            "Basic Y2tfdGVzdDpjc190ZXN0"
        );
        assert_eq!(request.url().query(), None);
    }

    #[test]
    fn test_http_requests_are_signed_in_query() {
        let client = WooCommerceClient::new(&config("http://localhost:8080")).unwrap();
        let url = client.endpoint_url("products", &[]).unwrap();
        let request = client.authorized(&Method::GET, url).unwrap().build().unwrap();

        assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());
        assert!(
            request
                .url()
                .query_pairs()
                .any(|(k, v)| k == "oauth_consumer_key" && v == "ck_test")
        );
    }

    #[test]
    fn test_debug_hides_secret() {
        let client = WooCommerceClient::new(&config("https://shop.test")).unwrap();
        let debug_output = format!("{client:?}");
        assert!(debug_output.contains("ck_test"));
        assert!(!debug_output.contains("cs_test"));
    }
}
