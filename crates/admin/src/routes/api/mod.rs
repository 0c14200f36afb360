//! API route handlers for admin.
//!
//! JSON endpoints answering with the `ApiResponse` envelope.

pub mod products;

use axum::Router;

use crate::state::AppState;

/// Build the complete API router.
pub fn router() -> Router<AppState> {
    Router::new().merge(products::router())
}
