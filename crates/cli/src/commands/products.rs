//! Product commands.
//!
//! Every mutation is followed by a fresh listing, so the terminal always shows
//! what the store holds rather than a locally patched copy.
//!
//! # Environment Variables
//!
//! - `MPM_API_URL` - Admin server base URL (default: <http://127.0.0.1:3001>)

use std::io::{BufRead, Write};

use mini_product_manager_core::{
    ApiResponse, CreateProductRequest, PriceError, Product, ProductId, ProductImage,
    RegularPrice, UpdateProductRequest,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// Admin server used when `MPM_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3001";

/// Listing shown after a successful mutation.
const REFRESH_PAGE: u32 = 1;
const REFRESH_PER_PAGE: u32 = 10;

/// Errors that can occur while running product commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// `MPM_API_URL` is not a valid URL.
    #[error("Invalid MPM_API_URL: {0}")]
    InvalidApiUrl(#[from] url::ParseError),

    /// Could not reach the admin server.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with the failure envelope.
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    /// Price rejected before sending.
    #[error("Please enter a valid price: {0}")]
    InvalidPrice(#[from] PriceError),

    /// Reading the confirmation answer failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One page of products with the totals the server reported.
#[derive(Debug, Clone)]
pub struct Listing {
    pub products: Vec<Product>,
    pub total: Option<String>,
    pub total_pages: Option<String>,
}

/// Client for the admin server's product API.
#[derive(Debug, Clone)]
pub struct ProductsApi {
    client: reqwest::Client,
    base_url: Url,
}

impl ProductsApi {
    /// Create a client for the given admin server.
    ///
    /// # Errors
    ///
    /// Returns error if `base_url` is not a valid URL.
    pub fn new(base_url: &str) -> Result<Self, CliError> {
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: Url::parse(base_url)?,
        })
    }

    /// Create a client from `MPM_API_URL` (loading `.env` first).
    ///
    /// # Errors
    ///
    /// Returns error if the configured URL is invalid.
    pub fn from_env() -> Result<Self, CliError> {
        dotenvy::dotenv().ok();
        let base_url =
            std::env::var("MPM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_owned());
        Self::new(&base_url)
    }

    fn url(&self, path: &str) -> Result<Url, CliError> {
        Ok(self.base_url.join(path)?)
    }

    /// Read the envelope: `(data, total, total_pages)` on success,
    /// [`CliError::Api`] on failure.
    async fn envelope<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<(T, Option<String>, Option<String>), CliError> {
        let status = response.status().as_u16();
        match response.json::<ApiResponse<T>>().await? {
            ApiResponse::Success {
                data,
                total,
                total_pages,
                ..
            } => Ok((data, total, total_pages)),
            ApiResponse::Failure { error, .. } => Err(CliError::Api {
                status,
                message: error,
            }),
        }
    }

    async fn send<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: reqwest::Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<T, CliError> {
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let (data, _, _) = Self::envelope(request.send().await?).await?;
        Ok(data)
    }

    /// `GET /api/products`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the server reports a failure.
    pub async fn list(&self, page: u32, per_page: u32) -> Result<Listing, CliError> {
        let mut url = self.url("/api/products")?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string());

        let (products, total, total_pages) =
            Self::envelope(self.client.get(url).send().await?).await?;
        Ok(Listing {
            products,
            total,
            total_pages,
        })
    }

    /// `POST /api/products`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the server reports a failure.
    pub async fn create(&self, request: &CreateProductRequest) -> Result<Product, CliError> {
        let url = self.url("/api/products")?;
        self.send(reqwest::Method::POST, url, Some(request)).await
    }

    /// `PUT /api/products/{id}`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the server reports a failure.
    pub async fn update(
        &self,
        id: ProductId,
        request: &UpdateProductRequest,
    ) -> Result<Product, CliError> {
        let url = self.url(&format!("/api/products/{id}"))?;
        self.send(reqwest::Method::PUT, url, Some(request)).await
    }

    /// `DELETE /api/products/{id}`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the server reports a failure.
    pub async fn delete(&self, id: ProductId) -> Result<Value, CliError> {
        let url = self.url(&format!("/api/products/{id}"))?;
        self.send::<Value, ()>(reqwest::Method::DELETE, url, None)
            .await
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Print one page of products.
///
/// # Errors
///
/// Returns error if the listing cannot be fetched.
pub async fn list(api: &ProductsApi, page: u32, per_page: u32) -> Result<(), CliError> {
    let listing = api.list(page, per_page).await?;
    print_listing(&listing);
    Ok(())
}

/// Create a product and print the refreshed listing.
///
/// # Errors
///
/// Returns error if the price is invalid or the server rejects the product.
pub async fn create(
    api: &ProductsApi,
    name: &str,
    price: &str,
    images: &[String],
) -> Result<(), CliError> {
    let price = RegularPrice::parse(price)?;
    let request = CreateProductRequest {
        name: Some(name.to_owned()),
        regular_price: Some(price.as_str().to_owned()),
        images: image_refs(images),
    };

    let product = api.create(&request).await?;
    tracing::info!(product_id = %product.id, "Product created");
    report(&format!("Created product {} ({})", product.id, product.name));

    refresh(api).await
}

/// Change a product's price and print the refreshed listing.
///
/// # Errors
///
/// Returns error if the price is invalid or the server rejects the update.
pub async fn set_price(api: &ProductsApi, id: ProductId, price: &str) -> Result<(), CliError> {
    let price = RegularPrice::parse(price)?;
    let product = api
        .update(id, &UpdateProductRequest::price(price.as_str()))
        .await?;
    report(&format!(
        "Updated price of product {} to {}",
        product.id,
        price.display()
    ));

    refresh(api).await
}

/// Replace a product's images and print the refreshed listing.
///
/// # Errors
///
/// Returns error if the server rejects the update.
pub async fn set_images(
    api: &ProductsApi,
    id: ProductId,
    images: &[String],
) -> Result<(), CliError> {
    let request = UpdateProductRequest::images(image_refs(images).unwrap_or_default());
    let product = api.update(id, &request).await?;
    report(&format!(
        "Product {} now has {} image(s)",
        product.id,
        product.images.len()
    ));

    refresh(api).await
}

/// Delete a product after confirmation and print the refreshed listing.
///
/// # Errors
///
/// Returns error if the prompt cannot be read or the server refuses the delete.
pub async fn delete(api: &ProductsApi, id: ProductId, skip_confirm: bool) -> Result<(), CliError> {
    if !skip_confirm {
        let stdin = std::io::stdin();
        let mut stderr = std::io::stderr();
        if !confirm(
            &mut stdin.lock(),
            &mut stderr,
            "Are you sure you want to delete this product?",
        )? {
            report("Cancelled");
            return Ok(());
        }
    }

    api.delete(id).await?;
    report(&format!("Deleted product {id}"));

    refresh(api).await
}

async fn refresh(api: &ProductsApi) -> Result<(), CliError> {
    list(api, REFRESH_PAGE, REFRESH_PER_PAGE).await
}

fn image_refs(urls: &[String]) -> Option<Vec<ProductImage>> {
    let images: Vec<ProductImage> = urls
        .iter()
        .map(|url| url.trim())
        .filter(|url| !url.is_empty())
        .map(ProductImage::from_src)
        .collect();
    (!images.is_empty()).then_some(images)
}

/// Ask a yes/no question; anything but `y`/`yes` declines.
///
/// # Errors
///
/// Returns error if reading or writing the prompt fails.
pub fn confirm(
    input: &mut impl BufRead,
    output: &mut impl Write,
    question: &str,
) -> Result<bool, CliError> {
    write!(output, "{question} [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

// =============================================================================
// Output
// =============================================================================

#[allow(clippy::print_stdout)]
fn report(line: &str) {
    println!("{line}");
}

#[allow(clippy::print_stdout)]
fn print_listing(listing: &Listing) {
    print!("{}", format_listing(listing));
}

/// Render a listing as a plain-text table.
#[must_use]
pub fn format_listing(listing: &Listing) -> String {
    if listing.products.is_empty() {
        return "No products found. Create your first product!\n".to_owned();
    }

    let name_width = listing
        .products
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    let mut out = format!(
        "{:>8}  {:<name_width$}  {:>10}  {:<9}  {}\n",
        "ID", "NAME", "PRICE", "STATUS", "IMAGE"
    );
    for product in &listing.products {
        let price = product
            .price()
            .map_or_else(|| "-".to_owned(), |p| p.display());
        let image = product.thumbnail().map_or("-", |img| img.src.as_str());
        out.push_str(&format!(
            "{:>8}  {:<name_width$}  {:>10}  {:<9}  {}\n",
            product.id.to_string(),
            product.name,
            price,
            product.status.as_str(),
            image
        ));
    }

    if let (Some(total), Some(pages)) = (&listing.total, &listing.total_pages) {
        out.push_str(&format!("\n{total} product(s), {pages} page(s)\n"));
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    use axum::{
        Json, Router,
        extract::{Path, Query, State},
        http::StatusCode,
        routing::{get, put},
    };
    use serde_json::json;

    use super::*;

    fn product(id: u64, name: &str, price: &str) -> Product {
        serde_json::from_value(json!({
            "id": id,
            "name": name,
            "regular_price": price,
            "status": "publish",
            "images": [{"id": 1, "src": "https://shop.test/a.png"}]
        }))
        .unwrap()
    }

    #[test]
    fn test_confirm_accepts_yes() {
        for answer in ["y\n", "YES\n", "  yes  \n"] {
            let mut out = Vec::new();
            assert!(confirm(&mut Cursor::new(answer), &mut out, "Delete?").unwrap());
            assert_eq!(String::from_utf8(out).unwrap(), "Delete? [y/N] ");
        }
    }

    #[test]
    fn test_confirm_declines_by_default() {
        for answer in ["\n", "n\n", "nope\n", ""] {
            let mut out = Vec::new();
            assert!(!confirm(&mut Cursor::new(answer), &mut out, "Delete?").unwrap());
        }
    }

    #[test]
    fn test_format_listing_table() {
        let listing = Listing {
            products: vec![product(7, "Widget", "9.5")],
            total: Some("1".to_owned()),
            total_pages: Some("1".to_owned()),
        };
        let text = format_listing(&listing);
        assert!(text.contains("Widget"));
        assert!(text.contains("$9.50"));
        assert!(text.contains("https://shop.test/a.png"));
        assert!(text.ends_with("1 product(s), 1 page(s)\n"));
    }

    #[test]
    fn test_format_empty_listing() {
        let listing = Listing {
            products: vec![],
            total: None,
            total_pages: None,
        };
        assert_eq!(
            format_listing(&listing),
            "No products found. Create your first product!\n"
        );
    }

    #[test]
    fn test_image_refs_skip_blank_urls() {
        assert!(image_refs(&[]).is_none());
        assert!(image_refs(&[" ".to_owned()]).is_none());
        let images = image_refs(&["https://shop.test/a.png".to_owned()]).unwrap();
        assert_eq!(images[0].src, "https://shop.test/a.png");
    }

    // =========================================================================
    // Against a stub admin server
    // =========================================================================

    #[derive(Clone, Default)]
    struct Seen(Arc<Mutex<Vec<String>>>);

    async fn spawn_stub(seen: Seen) -> ProductsApi {
        async fn list(
            State(seen): State<Seen>,
            Query(query): Query<std::collections::HashMap<String, String>>,
        ) -> Json<Value> {
            seen.0.lock().unwrap().push(format!(
                "GET page={} per_page={}",
                query.get("page").cloned().unwrap_or_default(),
                query.get("per_page").cloned().unwrap_or_default()
            ));
            Json(json!({
                "success": true,
                "data": [{"id": 7, "name": "Widget", "regular_price": "5.00", "status": "publish"}],
                "total": "1",
                "totalPages": "1"
            }))
        }

        async fn update(
            State(seen): State<Seen>,
            Path(id): Path<u64>,
            Json(body): Json<Value>,
        ) -> (StatusCode, Json<Value>) {
            seen.0.lock().unwrap().push(format!("PUT {id} {body}"));
            if id == 999 {
                return (
                    StatusCode::NOT_FOUND,
                    Json(json!({
                        "success": false,
                        "error": "Product with ID 999 not found. Request failed with status code 404"
                    })),
                );
            }
            (
                StatusCode::OK,
                Json(json!({"success": true, "data": {"id": id, "name": "Widget", "regular_price": "5.00"}})),
            )
        }

        let app = Router::new()
            .route("/api/products", get(list))
            .route("/api/products/{id}", put(update))
            .with_state(seen);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        ProductsApi::new(&format!("http://{addr}")).unwrap()
    }

    #[tokio::test]
    async fn test_set_price_updates_then_refreshes() {
        let seen = Seen::default();
        let api = spawn_stub(seen.clone()).await;

        set_price(&api, ProductId::new(7), "5.00").await.unwrap();

        let calls = seen.0.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                r#"PUT 7 {"regular_price":"5.00"}"#.to_owned(),
                "GET page=1 per_page=10".to_owned(),
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_price_never_reaches_server() {
        let seen = Seen::default();
        let api = spawn_stub(seen.clone()).await;

        let err = set_price(&api, ProductId::new(7), "-3").await.unwrap_err();
        assert!(matches!(err, CliError::InvalidPrice(PriceError::Negative)));
        assert!(seen.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_envelope_becomes_api_error() {
        let api = spawn_stub(Seen::default()).await;

        let err = api
            .update(ProductId::new(999), &UpdateProductRequest::price("5.00"))
            .await
            .unwrap_err();
        match err {
            CliError::Api { status, message } => {
                assert_eq!(status, 404);
                assert!(message.starts_with("Product with ID 999 not found."));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_list_reads_totals() {
        let api = spawn_stub(Seen::default()).await;
        let listing = api.list(1, 10).await.unwrap();
        assert_eq!(listing.products.len(), 1);
        assert_eq!(listing.total.as_deref(), Some("1"));
        assert_eq!(listing.total_pages.as_deref(), Some("1"));
    }
}
