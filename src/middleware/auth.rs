//! Admin API key authentication middleware.
//!
//! This middleware intercepts every admin request to:
//! 1. Extract the API key from the Authorization header
//! 2. Hash it and compare against the configured admin key digest
//! 3. Reject unauthorized requests with HTTP 401

use crate::{AppState, error::AppError};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};

/// SHA-256 hex digest of a string.
///
/// Used both at startup (to digest the configured admin key) and per
/// request (to digest the presented key), so plaintext keys are never
/// compared directly.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Admin API key authentication middleware function.
///
/// # Flow
///
/// 1. Extract `Authorization: Bearer <key>` header from request
/// 2. Hash the `<key>` using SHA-256
/// 3. Compare against the configured admin key digest
/// 4. If it matches: call next handler
/// 5. If not: return 401 Unauthorized error
///
/// # Headers
///
/// Expected header format:
/// ```text
/// Authorization: Bearer abc123xyz
/// ```
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extract Authorization header
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::InvalidApiKey)?;

    // Expected format: "Bearer <api_key>"
    let api_key = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::InvalidApiKey)?;

    // Compare digests, not plaintext
    if sha256_hex(api_key) != state.admin_key_hash {
        return Err(AppError::InvalidApiKey);
    }

    // Call the next middleware/handler
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::sha256_hex;

    #[test]
    fn digest_is_64_hex_chars() {
        let digest = sha256_hex("secret");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn digest_is_deterministic_and_key_sensitive() {
        assert_eq!(sha256_hex("admin-key"), sha256_hex("admin-key"));
        assert_ne!(sha256_hex("admin-key"), sha256_hex("admin-key2"));
    }
}
