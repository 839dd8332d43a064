/**
 * Caller Identity
 *
 * Authentication happens upstream of this server. The gateway in front of it
 * forwards the authenticated user's id in a request header (by default
 * `x-user-id`, see `AppConfig::identity_header`). This module turns that
 * header into an [`AuthenticatedUser`] extractor for handlers.
 *
 * Requests without the header, or with a value that is not a UUID, are
 * rejected with `401 Unauthorized`.
 */

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
};
use thiserror::Error;
use uuid::Uuid;

use crate::backend::server::state::AppState;

/// Why a request carried no usable identity
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("identity header '{0}' is missing")]
    Missing(String),

    #[error("identity header '{header}' is not a valid user id: {value}")]
    Malformed { header: String, value: String },
}

/// User id taken from the identity header
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

/// Read the caller's user id from `header`.
pub fn user_from_headers(headers: &HeaderMap, header: &str) -> Result<Uuid, IdentityError> {
    let value = headers
        .get(header)
        .ok_or_else(|| IdentityError::Missing(header.to_string()))?;
    let text = value.to_str().map_err(|_| IdentityError::Malformed {
        header: header.to_string(),
        value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
    })?;
    Uuid::parse_str(text.trim()).map_err(|_| IdentityError::Malformed {
        header: header.to_string(),
        value: text.to_string(),
    })
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        user_from_headers(&parts.headers, &state.config.identity_header)
            .map(|user_id| AuthenticatedUser { user_id })
            .map_err(|e| {
                tracing::warn!("[Identity] {}", e);
                StatusCode::UNAUTHORIZED
            })
    }
}
