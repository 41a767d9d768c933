use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{ApiError, AppState, verify_token};

/// Bearer-token gate for mutating routes. Verifies the JWT against the
/// configured secret and attaches the decoded [`crate::Claims`] as a request
/// extension; handlers still run their own role check on top.
pub async fn bearer_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.trim())
        .ok_or(ApiError::Unauthenticated)?;
    let claims = verify_token(token, &state.settings.secrets.jwt)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
