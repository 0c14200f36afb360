//! Product manager page.
//!
//! Renders the page shell; `static/js/products.js` loads and mutates the list
//! through the `/api/products` routes.

use askama::Template;
use axum::{extract::State, response::Html};
use tracing::instrument;

use crate::state::AppState;

use super::api::products::DEFAULT_PER_PAGE;

/// Product manager page template.
#[derive(Template)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    /// Store the page manages, shown in the header.
    pub store_url: Option<String>,
    /// Why product routes will fail, if they will.
    pub config_error: Option<String>,
    pub per_page: u32,
}

/// Product manager page handler.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let (store_url, config_error) = match &state.config().woocommerce {
        Ok(wc) => (Some(wc.url.to_string()), None),
        Err(e) => (None, Some(e.to_string())),
    };

    let template = ProductsIndexTemplate {
        store_url,
        config_error,
        per_page: DEFAULT_PER_PAGE,
    };

    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}
