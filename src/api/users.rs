use axum::{Json, debug_handler, extract::State, http::StatusCode};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::{
    ApiError, AppState, Claims, Role, TokenResponse, UserProfile, UserRecord, hash_password,
    issue_token, validate_username, verify_password,
};

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: SecretString, // received as plain text, stored hashed
}

#[derive(Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// POST /api/signup - creates a user record with the default `dev` role.
/// Duplicate usernames are a 409, not a silent overwrite.
#[debug_handler]
#[instrument(skip_all, fields(username = signup.username))]
pub async fn signup(
    State(appstate): State<AppState>,
    Json(signup): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
    info!("signing up new account");
    validate_username(&signup.username)?;
    let password_hash = hash_password(&signup.password)?;
    let record = UserRecord::new(&signup.username, password_hash, Role::Dev);
    let profile = UserProfile::from(record.clone());
    appstate.records.insert(record).await?;
    info!("account created");
    Ok((StatusCode::CREATED, Json(profile)))
}

/// POST /api/signin - verify credentials, issue a JWT carrying the record's
/// role. Unknown user and wrong password are the same 401.
#[debug_handler]
#[instrument(skip_all, fields(username = credentials.username))]
pub async fn signin(
    State(appstate): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = appstate
        .records
        .find(&credentials.username)
        .await?
        .ok_or_else(|| {
            warn!("sign-in for unknown username");
            ApiError::Unauthenticated
        })?;
    if !verify_password(&credentials.password, &user.password_hash)? {
        return Err(ApiError::Unauthenticated);
    }
    let claims = Claims::new(
        &user.username,
        user.role,
        appstate.settings.token_options.jwt_ttl_minutes,
    );
    let access_token = issue_token(&claims, &appstate.settings.secrets.jwt)?;
    info!(role = %user.role, "sign-in succeeded");
    Ok(Json(TokenResponse { access_token }))
}

/// GET /api/listUser - every record, passwords never serialized.
#[debug_handler]
#[instrument(skip_all)]
pub async fn list_users(
    State(appstate): State<AppState>,
) -> Result<Json<Vec<UserProfile>>, ApiError> {
    let users = appstate.records.list().await?;
    Ok(Json(users.into_iter().map(UserProfile::from).collect()))
}
