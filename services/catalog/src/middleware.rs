//! Authentication middleware for JWT token validation

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::{
    error::{ApiError, ErrorBody, TOKEN_INVALID, TOKEN_MISSING},
    jwt::Claims,
    state::AppState,
};

/// Authentication middleware
///
/// Accepts the token with or without the `Bearer ` prefix. On success the
/// decoded [`Claims`] are stored in the request extensions.
pub async fn validate_token(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = match req.headers().get(AUTHORIZATION) {
        Some(value) if !value.is_empty() => value,
        _ => return Err(ApiError::Unauthorized(ErrorBody::error(TOKEN_MISSING))),
    };

    let header = header.to_str().map_err(|_| {
        debug!("Authorization header is not valid UTF-8");
        ApiError::Unauthorized(ErrorBody::error(TOKEN_INVALID))
    })?;
    let token = header.strip_prefix("Bearer ").unwrap_or(header);

    let claims = state.jwt_service.validate_token(token).map_err(|e| {
        debug!("Failed to validate token: {}", e);
        ApiError::Unauthorized(ErrorBody::error(TOKEN_INVALID))
    })?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

