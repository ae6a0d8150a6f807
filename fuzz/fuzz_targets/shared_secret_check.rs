#![no_main]

//! Fuzz target for shared-secret verification.
//!
//! Splits the input into a configured secret and a header value, then
//! checks that verification accepts exactly when the two are equal.

use axum::http::{HeaderMap, HeaderValue};
use intake_api::{auth::verify_shared_secret, IntakeError};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let (secret, provided) = rest.split_at(usize::from(split).min(rest.len()));

    let Ok(secret) = std::str::from_utf8(secret) else {
        return;
    };
    let Ok(value) = HeaderValue::from_bytes(provided) else {
        return;
    };

    let mut headers = HeaderMap::new();
    headers.insert("x-signature", value);

    match verify_shared_secret(&headers, Some(secret)) {
        Ok(()) => assert_eq!(secret.as_bytes(), provided),
        Err(IntakeError::Configuration) => assert!(secret.is_empty()),
        Err(IntakeError::Unauthorized) => assert_ne!(secret.as_bytes(), provided),
        Err(other) => panic!("unexpected error: {other}"),
    }
});
