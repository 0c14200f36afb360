//! One-legged OAuth 1.0a request signing.
//!
//! WooCommerce refuses Basic auth over plain HTTP, so requests to `http://`
//! stores carry an `HMAC-SHA256` signature in the query string instead.
//! See <https://woocommerce.github.io/woocommerce-rest-api-docs/#authentication-over-http>.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use rand::{Rng, distr::Alphanumeric};
use reqwest::Method;
use sha2::Sha256;
use url::Url;

use super::WooCommerceError;

const SIGNATURE_METHOD: &str = "HMAC-SHA256";
const OAUTH_VERSION: &str = "1.0";
const NONCE_LENGTH: usize = 32;

/// Per-request values that make a signature unique.
#[derive(Debug, Clone)]
pub struct Nonce {
    pub value: String,
    pub timestamp: u64,
}

impl Nonce {
    /// Fresh random nonce stamped with the current time.
    pub fn generate() -> Self {
        let value = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(NONCE_LENGTH)
            .map(char::from)
            .collect();
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        Self { value, timestamp }
    }
}

/// RFC 3986 percent-encoding (unreserved characters are left alone).
fn percent_encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Build the signature base string: `METHOD&encoded(base_uri)&encoded(params)`.
///
/// Parameters are percent-encoded, then sorted by key and value.
fn signature_base_string(method: &Method, url: &Url, params: &[(String, String)]) -> String {
    let mut base_uri = url.clone();
    base_uri.set_query(None);
    base_uri.set_fragment(None);

    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    let normalized = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.as_str().to_uppercase(),
        percent_encode(base_uri.as_str()),
        percent_encode(&normalized)
    )
}

/// Return `url` with the OAuth parameters and signature appended to its query.
///
/// # Errors
///
/// Returns [`WooCommerceError::Signing`] if the HMAC cannot be keyed.
pub fn sign(
    method: &Method,
    url: &Url,
    consumer_key: &str,
    consumer_secret: &str,
    nonce: &Nonce,
) -> Result<Url, WooCommerceError> {
    let mut params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    let oauth_params = [
        ("oauth_consumer_key", consumer_key.to_string()),
        ("oauth_nonce", nonce.value.clone()),
        ("oauth_signature_method", SIGNATURE_METHOD.to_string()),
        ("oauth_timestamp", nonce.timestamp.to_string()),
        ("oauth_version", OAUTH_VERSION.to_string()),
    ];
    params.extend(oauth_params.iter().map(|(k, v)| ((*k).to_string(), v.clone())));

    let base_string = signature_base_string(method, url, &params);

    // No token secret in one-legged OAuth, hence the bare trailing '&'.
    let key = format!("{consumer_secret}&");
    let mut mac = Hmac::<Sha256>::new_from_slice(key.as_bytes())
        .map_err(|e| WooCommerceError::Signing(e.to_string()))?;
    mac.update(base_string.as_bytes());
    let signature = STANDARD.encode(mac.finalize().into_bytes());

    let mut signed = url.clone();
    {
        let mut query = signed.query_pairs_mut();
        for (k, v) in &oauth_params {
            query.append_pair(k, v);
        }
        query.append_pair("oauth_signature", &signature);
    }
    Ok(signed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn fixed_nonce() -> Nonce {
        Nonce {
            value: "abc123".to_string(),
            timestamp: 1_700_000_000,
        }
    }

    #[test]
    fn test_base_string_sorts_and_encodes() {
        let url = Url::parse("http://shop.test/wp-json/wc/v3/products?per_page=10&page=1").unwrap();
        let params = vec![
            ("per_page".to_string(), "10".to_string()),
            ("page".to_string(), "1".to_string()),
            ("oauth_consumer_key".to_string(), "ck_1".to_string()),
        ];

        assert_eq!(
            signature_base_string(&Method::GET, &url, &params),
            "GET&http%3A%2F%2Fshop.test%2Fwp-json%2Fwc%2Fv3%2Fproducts&\
             oauth_consumer_key%3Dck_1%26page%3D1%26per_page%3D10"
        );
    }

    #[test]
    fn test_sign_appends_oauth_parameters() {
        let url = Url::parse("http://shop.test/wp-json/wc/v3/products/7?force=true").unwrap();
        let signed = sign(&Method::DELETE, &url, "ck_1", "cs_1", &fixed_nonce()).unwrap();

        let query: HashMap<String, String> = signed.query_pairs().into_owned().collect();
        assert_eq!(query.get("force").map(String::as_str), Some("true"));
        assert_eq!(query.get("oauth_consumer_key").map(String::as_str), Some("ck_1"));
        assert_eq!(query.get("oauth_nonce").map(String::as_str), Some("abc123"));
        assert_eq!(
            query.get("oauth_signature_method").map(String::as_str),
            Some("HMAC-SHA256")
        );
        assert_eq!(
            query.get("oauth_timestamp").map(String::as_str),
            Some("1700000000")
        );
        assert_eq!(query.get("oauth_version").map(String::as_str), Some("1.0"));
        assert!(query.contains_key("oauth_signature"));
        assert_eq!(signed.path(), "/wp-json/wc/v3/products/7");
    }

    #[test]
    fn test_signature_is_deterministic_for_same_inputs() {
        let url = Url::parse("http://shop.test/wp-json/wc/v3/products").unwrap();
        let a = sign(&Method::GET, &url, "ck_1", "cs_1", &fixed_nonce()).unwrap();
        let b = sign(&Method::GET, &url, "ck_1", "cs_1", &fixed_nonce()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_signature_covers_method_and_secret() {
        let url = Url::parse("http://shop.test/wp-json/wc/v3/products").unwrap();
        let signature = |method: &Method, secret: &str| {
            sign(method, &url, "ck_1", secret, &fixed_nonce())
                .unwrap()
                .query_pairs()
                .find(|(k, _)| k == "oauth_signature")
                .map(|(_, v)| v.into_owned())
                .unwrap()
        };

        let base = signature(&Method::GET, "cs_1");
        assert_ne!(base, signature(&Method::POST, "cs_1"));
        assert_ne!(base, signature(&Method::GET, "cs_2"));
    }

    #[test]
    fn test_signature_matches_known_value() {
        let url = Url::parse("http://shop.test/wp-json/wc/v3/products?page=1&per_page=10").unwrap();
        let signed = sign(&Method::GET, &url, "ck_1", "cs_1", &fixed_nonce()).unwrap();

        let signature = signed
            .query_pairs()
            .find(|(k, _)| k == "oauth_signature")
            .map(|(_, v)| v.into_owned());
        assert_eq!(
            signature.as_deref(),
            Some("+6kY9L2HuBFcasCkABEpDdirDQUHZKR3gM2dvCqcvcs=")
        );
    }

    #[test]
    fn test_sign_accepts_empty_secret() {
        let url = Url::parse("http://shop.test/wp-json/wc/v3/products").unwrap();
        assert!(sign(&Method::GET, &url, "ck_1", "", &fixed_nonce()).is_ok());
    }

    #[test]
    fn test_generated_nonces_differ() {
        let a = Nonce::generate();
        let b = Nonce::generate();
        assert_eq!(a.value.len(), NONCE_LENGTH);
        assert_ne!(a.value, b.value);
        assert!(a.timestamp > 0);
    }
}
