use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, warn};

use crate::{ApiError, Claims, CryptoError, Role};

//---------------------------------------------- access tokens

/// Signs the claims with HS256. Expiry is always present on the claims, so a
/// leaked token dies on its own.
pub fn issue_token(claims: &Claims, secret: &SecretString) -> Result<String, CryptoError> {
    debug!(user = %claims.sub, role = %claims.role, "issuing access token");
    Ok(encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .inspect_err(|e| error!("failed to sign access token: {}", e))?)
}

/// Checks signature and expiry. Any rejection collapses to
/// [`CryptoError::TokenRejected`] so callers cannot leak why a token failed.
pub fn verify_token(token: &str, secret: &SecretString) -> Result<Claims, CryptoError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        warn!("token verification failed: {}", e);
        CryptoError::TokenRejected
    })
}

//---------------------------------------------- authorization policy

/// The one role check in the codebase. Returns a value the caller has to
/// branch on (`authorize(..)?`), so a "checked but not enforced" path cannot
/// compile.
pub fn authorize(claims: &Claims, required: Role) -> Result<(), ApiError> {
    match (claims.role, required) {
        (Role::Admin, _) => Ok(()),
        (have, want) if have == want => Ok(()),
        (have, want) => {
            warn!(user = %claims.sub, %have, %want, "insufficient role");
            Err(ApiError::Forbidden)
        }
    }
}

//---------------------------------------------- user password hashing

/// One-way salted hash using Argon2id, stored as a PHC string.
pub fn hash_password(password: &SecretString) -> Result<String, CryptoError> {
    debug!("hashing password with Argon2id");
    let salt = SaltString::generate(&mut OsRng);
    let argon = Argon2::default();
    let password_hash = argon
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .inspect_err(|e| error!("password hashing failed: {}", e))?
        .to_string();
    Ok(password_hash)
}

/// Verifies a presented password against a stored PHC string. A mismatch is
/// `Ok(false)`; only a corrupted hash or an internal failure is an error.
pub fn verify_password(
    password: &SecretString,
    password_hash: &str,
) -> Result<bool, CryptoError> {
    let parsed_hash = PasswordHash::new(password_hash)
        .inspect_err(|e| error!("failed to parse stored password hash: {}", e))?;
    let argon = Argon2::default();

    match argon.verify_password(password.expose_secret().as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => {
            warn!("password verification failed - password mismatch");
            Ok(false)
        }
        Err(e) => {
            error!("password verification error: {}", e);
            Err(CryptoError::PasswordHash(e))
        }
    }
}

//---------------------------------------------- input validation

pub fn validate_username(name: &str) -> Result<(), ApiError> {
    if name.is_empty() || name.len() > 255 {
        return Err(ApiError::BadRequest(anyhow!(
            "username must be between 1 and 255 characters"
        )));
    }
    if name.chars().any(|c| c.is_whitespace() || (c as u32) < 0x20) {
        return Err(ApiError::BadRequest(anyhow!(
            "username cannot contain whitespace or control characters"
        )));
    }
    Ok(())
}
