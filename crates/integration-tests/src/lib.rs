//! Integration tests for Mini Product Manager.
//!
//! Each test starts two servers on ephemeral ports:
//!
//! - [`FakeWooCommerce`]: an in-memory stand-in for the WooCommerce
//!   `wc/v3/products` endpoints that records every call it receives
//! - the admin app, configured to talk to the fake store
//!
//! and drives the admin app over HTTP with `reqwest`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mini-product-manager-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use mini_product_manager_admin::{
    app,
    config::{AdminConfig, ConfigError, WooCommerceConfig},
    state::AppState,
};
use secrecy::SecretString;
use serde_json::{Map, Value, json};
use tokio::sync::Mutex;
use url::Url;

/// Consumer key the admin app is configured with.
pub const CONSUMER_KEY: &str = "ck_integration";

/// Consumer secret the admin app is configured with.
pub const CONSUMER_SECRET: &str = "cs_integration_Q7v2Lm9xRt4Kp8Wn";

/// A request the fake store received.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    /// Path below `/wp-json/wc/v3/`, e.g. `products/7`.
    pub path: String,
    /// Query parameters other than the OAuth ones.
    pub query: BTreeMap<String, String>,
    /// Whether the request carried an OAuth signature for [`CONSUMER_KEY`].
    pub signed: bool,
    pub body: Option<Value>,
}

#[derive(Default)]
struct FakeStore {
    products: BTreeMap<u64, Value>,
    next_id: u64,
    calls: Vec<RecordedCall>,
    /// Failure returned by every update and delete when set.
    fail_writes: Option<(StatusCode, Value)>,
}

/// In-memory WooCommerce products API.
#[derive(Clone)]
pub struct FakeWooCommerce {
    store: Arc<Mutex<FakeStore>>,
    addr: SocketAddr,
}

/// Error body WooCommerce returns for unknown product IDs.
#[must_use]
pub fn invalid_id_body() -> Value {
    json!({
        "code": "woocommerce_rest_product_invalid_id",
        "message": "Invalid ID.",
        "data": {"status": 404}
    })
}

impl FakeWooCommerce {
    /// Start the fake store on an ephemeral port.
    pub async fn start() -> Self {
        let store = Arc::new(Mutex::new(FakeStore {
            next_id: 100,
            ..FakeStore::default()
        }));

        let router = Router::new()
            .route("/wp-json/wc/v3/products", get(list).post(create))
            .route(
                "/wp-json/wc/v3/products/{id}",
                get(show).put(update).delete(remove),
            )
            .with_state(Arc::clone(&store));

        let addr = serve(router).await;
        Self { store, addr }
    }

    /// Store URL to configure the admin app with.
    #[must_use]
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).unwrap()
    }

    /// Seed a product and return its ID.
    pub async fn insert(&self, name: &str, price: &str) -> u64 {
        let mut store = self.store.lock().await;
        store.next_id += 1;
        let id = store.next_id;
        store.products.insert(
            id,
            json!({
                "id": id,
                "name": name,
                "type": "simple",
                "status": "publish",
                "regular_price": price,
                "permalink": format!("https://shop.test/product/{id}"),
                "images": []
            }),
        );
        id
    }

    /// Current upstream record for a product.
    pub async fn product(&self, id: u64) -> Option<Value> {
        self.store.lock().await.products.get(&id).cloned()
    }

    /// Every call received so far.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.store.lock().await.calls.clone()
    }

    /// Make every update and delete fail with the given answer; reads keep working.
    pub async fn fail_writes(&self, status: StatusCode, body: Value) {
        self.store.lock().await.fail_writes = Some((status, body));
    }
}

type Shared = Arc<Mutex<FakeStore>>;

fn record(
    store: &mut FakeStore,
    method: Method,
    path: String,
    query: HashMap<String, String>,
    body: Option<Value>,
) {
    let signed = query.get("oauth_consumer_key").map(String::as_str) == Some(CONSUMER_KEY)
        && query.contains_key("oauth_signature");
    let query = query
        .into_iter()
        .filter(|(k, _)| !k.starts_with("oauth_"))
        .collect();
    store.calls.push(RecordedCall {
        method,
        path,
        query,
        signed,
        body,
    });
}

fn invalid_id() -> Response {
    (StatusCode::NOT_FOUND, Json(invalid_id_body())).into_response()
}

async fn list(
    State(store): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut store = store.lock().await;
    let page: usize = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let per_page: usize = query
        .get("per_page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(10);
    record(&mut store, Method::GET, "products".to_string(), query, None);

    let total = store.products.len();
    let pages = total.div_ceil(per_page.max(1));
    let items: Vec<Value> = store
        .products
        .values()
        .rev()
        .skip((page.saturating_sub(1)) * per_page)
        .take(per_page)
        .cloned()
        .collect();

    let mut headers = HeaderMap::new();
    headers.insert("x-wp-total", HeaderValue::from(total));
    headers.insert("x-wp-totalpages", HeaderValue::from(pages));
    (headers, Json(items)).into_response()
}

async fn create(
    State(store): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    let mut store = store.lock().await;
    record(
        &mut store,
        Method::POST,
        "products".to_string(),
        query,
        Some(body.clone()),
    );

    store.next_id += 1;
    let id = store.next_id;
    let mut product: Map<String, Value> = body.as_object().cloned().unwrap_or_default();
    product.insert("id".to_string(), json!(id));
    product.insert(
        "permalink".to_string(),
        json!(format!("https://shop.test/product/{id}")),
    );
    product.entry("images").or_insert_with(|| json!([]));
    let product = Value::Object(product);
    store.products.insert(id, product.clone());

    (StatusCode::CREATED, Json(product)).into_response()
}

async fn show(
    State(store): State<Shared>,
    Path(id): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut store = store.lock().await;
    record(&mut store, Method::GET, format!("products/{id}"), query, None);

    store
        .products
        .get(&id)
        .cloned()
        .map_or_else(invalid_id, |p| Json(p).into_response())
}

async fn update(
    State(store): State<Shared>,
    Path(id): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    let mut store = store.lock().await;
    record(
        &mut store,
        Method::PUT,
        format!("products/{id}"),
        query,
        Some(body.clone()),
    );

    if let Some((status, body)) = store.fail_writes.clone() {
        return (status, Json(body)).into_response();
    }
    let Some(product) = store.products.get_mut(&id) else {
        return invalid_id();
    };
    if let (Some(product), Some(patch)) = (product.as_object_mut(), body.as_object()) {
        for (key, value) in patch {
            product.insert(key.clone(), value.clone());
        }
    }
    Json(product.clone()).into_response()
}

async fn remove(
    State(store): State<Shared>,
    Path(id): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut store = store.lock().await;
    let force = query.get("force").map(String::as_str) == Some("true");
    record(&mut store, Method::DELETE, format!("products/{id}"), query, None);

    if let Some((status, body)) = store.fail_writes.clone() {
        return (status, Json(body)).into_response();
    }
    if !force {
        return (
            StatusCode::NOT_IMPLEMENTED,
            Json(json!({
                "code": "woocommerce_rest_trash_not_supported",
                "message": "Resource does not support trashing.",
                "data": {"status": 501}
            })),
        )
            .into_response();
    }
    store
        .products
        .remove(&id)
        .map_or_else(invalid_id, |p| Json(p).into_response())
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// A running admin app wired to a [`FakeWooCommerce`].
pub struct TestContext {
    pub client: reqwest::Client,
    pub admin_url: String,
    pub store: FakeWooCommerce,
}

impl TestContext {
    /// Start a fake store and an admin app configured for it.
    pub async fn new() -> Self {
        let store = FakeWooCommerce::start().await;
        let woocommerce = WooCommerceConfig {
            url: store.url(),
            api_version: "wc/v3".to_string(),
            consumer_key: CONSUMER_KEY.to_string(),
            consumer_secret: SecretString::from(CONSUMER_SECRET),
        };
        let admin_url = start_admin(Ok(woocommerce)).await;

        Self {
            client: reqwest::Client::new(),
            admin_url,
            store,
        }
    }

    /// Absolute URL of an admin path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.admin_url)
    }

    /// Send a request and return the status and JSON body.
    pub async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<Value>,
    ) -> (reqwest::StatusCode, Value) {
        let mut request = self.client.request(method, self.url(path));
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }
}

/// Start an admin app with the given WooCommerce configuration and return its base URL.
pub async fn start_admin(woocommerce: Result<WooCommerceConfig, ConfigError>) -> String {
    let mut config = AdminConfig::with_woocommerce(woocommerce);
    config.static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../admin/static").to_string();

    let addr = serve(app(AppState::new(config))).await;
    format!("http://{addr}")
}
