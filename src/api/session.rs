use axum::{Json, debug_handler, extract::State, http::HeaderMap};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use secrecy::ExposeSecret;
use time::Duration;
use tracing::{info, instrument, warn};

use crate::{ApiError, AppState, Claims, Role, TokenResponse, issue_token};

fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), ApiError> {
    let encoded = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Basic "))
        .map(|v| v.trim())
        .ok_or(ApiError::Unauthenticated)?;
    let decoded = STANDARD
        .decode(encoded)
        .map_err(|_| ApiError::Unauthenticated)?;
    let decoded = String::from_utf8(decoded).map_err(|_| ApiError::Unauthenticated)?;
    let (username, password) = decoded.split_once(':').ok_or(ApiError::Unauthenticated)?;
    Ok((username.to_string(), password.to_string()))
}

/// GET /auth - basic-auth against the configured bootstrap admin; on match,
/// sets a session cookie holding an admin JWT and echoes the token.
#[debug_handler]
#[instrument(skip_all)]
pub async fn session_login(
    State(appstate): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<(CookieJar, Json<TokenResponse>), ApiError> {
    let (username, password) = basic_credentials(&headers)?;
    let admin = &appstate.settings.admin;
    if username != admin.username || password != admin.password.expose_secret() {
        warn!("basic-auth rejected");
        return Err(ApiError::Unauthenticated);
    }

    let ttl_minutes = appstate.settings.token_options.session_cookie_ttl_minutes;
    let claims = Claims::new(&username, Role::Admin, ttl_minutes);
    let access_token = issue_token(&claims, &appstate.settings.secrets.jwt)?;
    info!(user = username, "admin session opened");

    // cookie and token expire together
    let cookie = Cookie::build(("session", access_token.clone()))
        .path("/")
        .http_only(true)
        .max_age(Duration::minutes(ttl_minutes))
        .build();
    Ok((jar.add(cookie), Json(TokenResponse { access_token })))
}
