//! The JSON envelope every `/api` route answers with.
//!
//! ```text
//! {"success": true,  "data": ..., "total": "12", "totalPages": "2"}
//! {"success": false, "error": "Product with ID 9 not found. ...", "details": {...}}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tagged success/failure wrapper returned by the product routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiResponse<T> {
    Success {
        success: bool,
        data: T,
        /// Total record count, echoed from the upstream `X-WP-Total` header.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        total: Option<String>,
        /// Total page count, echoed from the upstream `X-WP-TotalPages` header.
        #[serde(
            default,
            rename = "totalPages",
            skip_serializing_if = "Option::is_none"
        )]
        total_pages: Option<String>,
    },
    Failure {
        success: bool,
        error: String,
        /// Raw upstream error body, when there was one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<Value>,
    },
}

impl<T> ApiResponse<T> {
    /// Successful response without pagination totals.
    #[must_use]
    pub const fn success(data: T) -> Self {
        Self::Success {
            success: true,
            data,
            total: None,
            total_pages: None,
        }
    }

    /// Successful listing with the totals reported by the store.
    #[must_use]
    pub const fn paginated(data: T, total: Option<String>, total_pages: Option<String>) -> Self {
        Self::Success {
            success: true,
            data,
            total,
            total_pages,
        }
    }

    /// Failed response.
    #[must_use]
    pub fn failure(error: impl Into<String>, details: Option<Value>) -> Self {
        Self::Failure {
            success: false,
            error: error.into(),
            details,
        }
    }

    /// Whether this is the success variant.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Convert into a `Result`, keeping only the error message on failure.
    ///
    /// # Errors
    ///
    /// Returns the envelope's error message for the failure variant.
    pub fn into_result(self) -> Result<T, String> {
        match self {
            Self::Success { data, .. } => Ok(data),
            Self::Failure { error, .. } => Err(error),
        }
    }
}
