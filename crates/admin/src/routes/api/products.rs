//! Product API handlers.
//!
//! Thin pass-through to WooCommerce: validate, forward, wrap the answer in
//! [`ApiResponse`].

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    routing::get,
};
use mini_product_manager_core::{
    ApiResponse, CreateProductRequest, Product, ProductId, UpdateProductRequest,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::{
    error::{AppError, ProductOperation},
    state::AppState,
};

/// Page requested when the query omits `page`.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size requested when the query omits `per_page`.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Build the products API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list).post(create))
        .route("/api/products/{id}", get(show).put(update).delete(delete))
}

/// Query parameters for the product listing.
///
/// Kept as strings so bad numbers reach [`ListQuery::resolve`]; malformed
/// query strings are turned into the JSON envelope by the handler.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl ListQuery {
    fn parse(value: Option<&str>, name: &str, default: u32) -> Result<u32, AppError> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(default),
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| AppError::BadRequest(format!("{name} must be a positive integer"))),
        }
    }

    /// Resolve `(page, per_page)`, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] if either value is not a positive integer.
    pub fn resolve(&self) -> Result<(u32, u32), AppError> {
        Ok((
            Self::parse(self.page.as_deref(), "page", DEFAULT_PAGE)?,
            Self::parse(self.per_page.as_deref(), "per_page", DEFAULT_PER_PAGE)?,
        ))
    }
}

/// Parse the `{id}` path segment.
fn parse_id(raw: &str) -> Result<ProductId, AppError> {
    ProductId::from_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid product ID: {raw}")))
}

/// Unwrap a JSON body, answering malformed input with a 400 envelope.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// List one page of products.
///
/// # Errors
///
/// 400 for bad paging values, 500 for any upstream failure.
#[instrument(skip(state, query))]
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Product>>>, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let (page, per_page) = query.resolve()?;

    let result = state
        .woocommerce()?
        .list_products(page, per_page)
        .await
        .map_err(|e| AppError::woocommerce(ProductOperation::List, e))?;

    Ok(Json(ApiResponse::paginated(
        result.products,
        result.total,
        result.total_pages,
    )))
}

/// Create a simple, published product.
///
/// # Errors
///
/// 400 for missing or invalid fields, 500 for any upstream failure.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let product = json_body(payload)?.validate()?;

    let created = state
        .woocommerce()?
        .create_product(&product)
        .await
        .map_err(|e| AppError::woocommerce(ProductOperation::Create, e))?;

    tracing::info!(product_id = %created.id, name = %created.name, "Product created");

    Ok(Json(ApiResponse::success(created)))
}

/// Fetch one product.
///
/// # Errors
///
/// 400 for a non-numeric id, otherwise the upstream status (or 500).
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let id = parse_id(&id)?;

    let product = state
        .woocommerce()?
        .get_product(id)
        .await
        .map_err(|e| AppError::woocommerce(ProductOperation::Get, e))?;

    Ok(Json(ApiResponse::success(product)))
}

/// Update a product's price and/or images.
///
/// The product is read first so a missing id is reported as 404 before any
/// write is attempted.
///
/// # Errors
///
/// 400 for invalid input, 404 when the product does not exist, otherwise the
/// upstream status (or 500).
#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let id = parse_id(&id)?;
    let patch = json_body(payload)?.validate()?;
    let client = state.woocommerce()?;

    if let Err(e) = client.get_product(id).await {
        tracing::warn!(product_id = %id, error = %e, "Product check failed");
        return Err(AppError::NotFound(format!(
            "Product with ID {id} not found. {e}"
        )));
    }

    let product = client
        .update_product(id, &patch)
        .await
        .map_err(|e| AppError::woocommerce(ProductOperation::Update, e))?;

    tracing::info!(
        product_id = %id,
        price_changed = patch.regular_price.is_some(),
        images_changed = patch.images.is_some(),
        "Product updated"
    );

    Ok(Json(ApiResponse::success(product)))
}

/// Permanently delete a product.
///
/// # Errors
///
/// 400 for a non-numeric id, otherwise the upstream status (or 500).
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let id = parse_id(&id)?;

    let deleted = state
        .woocommerce()?
        .delete_product(id, true)
        .await
        .map_err(|e| AppError::woocommerce(ProductOperation::Delete, e))?;

    tracing::info!(product_id = %id, "Product deleted");

    Ok(Json(ApiResponse::success(deleted)))
}
