//! WooCommerce response types.

use mini_product_manager_core::Product;
use reqwest::header::HeaderMap;

/// Header carrying the total number of records matching a listing.
pub const TOTAL_HEADER: &str = "x-wp-total";

/// Header carrying the total number of pages for a listing.
pub const TOTAL_PAGES_HEADER: &str = "x-wp-totalpages";

/// One page of products plus the totals WordPress reports in headers.
///
/// Totals are kept exactly as the store sent them.
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: Option<String>,
    pub total_pages: Option<String>,
}

impl ProductPage {
    /// Read the pagination headers of a listing response.
    pub(crate) fn totals_from(headers: &HeaderMap) -> (Option<String>, Option<String>) {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };
        (read(TOTAL_HEADER), read(TOTAL_PAGES_HEADER))
    }
}
