use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{AuthError, VerifiedClaims};
use crate::error::ApiError;

/// First auth check: the request must carry a well-formed bearer token with a
/// valid HMAC signature. The verified claim set is handed on in the request extensions.
pub async fn require_credential(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = match request.headers().get(AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| AuthError::MalformedHeader)?),
        None => None,
    };

    let claims = state.validator.verify_header(header)?;
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Second auth check: derive the owner identity from the verified claims.
/// Handlers read it with `Extension<OwnerIdentity>`.
pub async fn require_owner(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = request.extensions().get::<VerifiedClaims>().ok_or_else(|| {
        tracing::error!("Owner check ran without a verified credential");
        ApiError::unauthorized("Credential verification required before owner validation")
    })?;

    let owner = state.validator.owner_identity(claims)?;
    request.extensions_mut().insert(owner);

    Ok(next.run(request).await)
}
