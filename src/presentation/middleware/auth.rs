//! Authentication Middleware
//!
//! API key validation for every non-exempt route.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::config::ApiKeySettings;
use crate::shared::error::AppError;

/// Checks the configured header against the expected key.
///
/// Only the SHA-256 digest of the key is kept; presented keys are hashed and
/// the digests compared without early exit.
#[derive(Debug, Clone)]
pub struct ApiKeyAuth {
    enabled: bool,
    header_name: String,
    expected_digest: [u8; 32],
    exempt_paths: Vec<String>,
}

impl ApiKeyAuth {
    pub fn new(settings: &ApiKeySettings) -> Self {
        Self {
            enabled: settings.enabled,
            header_name: settings.header_name.clone(),
            expected_digest: digest(&settings.key),
            exempt_paths: settings.exempt_paths.clone(),
        }
    }

    pub fn is_exempt(&self, path: &str) -> bool {
        self.exempt_paths
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// Validate a presented key, if any.
    pub fn verify(&self, presented: Option<&str>) -> Result<(), AppError> {
        let presented = presented
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AppError::Unauthorized("API key is missing".into()))?;

        let presented = digest(presented);
        let diff = presented
            .iter()
            .zip(self.expected_digest.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b));

        if diff != 0 {
            return Err(AppError::Unauthorized("Invalid API key".into()));
        }
        Ok(())
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

/// Authentication middleware that validates the API key header
pub async fn api_key_middleware(
    State(auth): State<Arc<ApiKeyAuth>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !auth.enabled || auth.is_exempt(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let presented = request
        .headers()
        .get(auth.header_name.as_str())
        .and_then(|h| h.to_str().ok());

    if let Err(e) = auth.verify(presented) {
        warn!(
            path = %request.uri().path(),
            reason = %e.message(),
            "Rejected unauthenticated request"
        );
        return Err(e);
    }

    // Continue to the next handler
    Ok(next.run(request).await)
}
