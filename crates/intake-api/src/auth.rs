//! Shared-secret verification for inbound webhooks.
//!
//! Despite its name, `X-Signature` carries the pre-shared secret itself, not
//! an HMAC of the body. Verification is an exact byte comparison done in
//! constant time.

use axum::http::HeaderMap;

use crate::error::IntakeError;

/// Header carrying the shared secret.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Checks `X-Signature` against the configured secret.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] when no secret is configured and
/// [`IntakeError::Unauthorized`] when the header is absent or differs.
pub fn verify_shared_secret(headers: &HeaderMap, secret: Option<&str>) -> Result<(), IntakeError> {
    let secret = secret.filter(|s| !s.is_empty()).ok_or(IntakeError::Configuration)?;

    let provided = headers.get(SIGNATURE_HEADER).ok_or(IntakeError::Unauthorized)?;

    if timing_safe_eq(provided.as_bytes(), secret.as_bytes()) {
        Ok(())
    } else {
        Err(IntakeError::Unauthorized)
    }
}

/// Compares two byte strings without short-circuiting on the first
/// difference.
fn timing_safe_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (a_byte, b_byte) in a.iter().zip(b.iter()) {
        result |= a_byte ^ b_byte;
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with(signature: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(SIGNATURE_HEADER, HeaderValue::from_static(signature));
        headers
    }

    #[test]
    fn matching_secret_is_accepted() {
        assert!(verify_shared_secret(&headers_with("s3cret"), Some("s3cret")).is_ok());
    }

    #[test]
    fn header_name_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Signature", HeaderValue::from_static("s3cret"));

        assert!(verify_shared_secret(&headers, Some("s3cret")).is_ok());
    }

    #[test]
    fn mismatched_secret_is_rejected() {
        let result = verify_shared_secret(&headers_with("S3CRET"), Some("s3cret"));
        assert!(matches!(result, Err(IntakeError::Unauthorized)));
    }

    #[test]
    fn missing_header_is_rejected() {
        let result = verify_shared_secret(&HeaderMap::new(), Some("s3cret"));
        assert!(matches!(result, Err(IntakeError::Unauthorized)));
    }

    #[test]
    fn missing_secret_is_a_configuration_error() {
        let result = verify_shared_secret(&headers_with("anything"), None);
        assert!(matches!(result, Err(IntakeError::Configuration)));

        let result = verify_shared_secret(&headers_with(""), Some(""));
        assert!(matches!(result, Err(IntakeError::Configuration)));
    }

    #[test]
    fn timing_safe_eq_different_length() {
        assert!(!timing_safe_eq(b"hello", b"hello_world"));
    }

    #[test]
    fn timing_safe_eq_same() {
        assert!(timing_safe_eq(b"hello", b"hello"));
    }
}
