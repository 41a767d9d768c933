use std::fmt::Display;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Coarse role model. `Admin` may mutate blobs; `Dev` is the sign-up default
/// and gets read-only access to the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Dev,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Admin => "admin",
                Self::Dev => "dev",
            }
        )
    }
}

/// Stored credential record. `password_hash` is an Argon2id PHC string,
/// never the raw password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

impl UserRecord {
    pub fn new(username: &str, password_hash: String, role: Role) -> Self {
        Self {
            username: username.into(),
            password_hash,
            role,
        }
    }
}

/// Public projection of a [`UserRecord`]; what listing and sign-up return.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub role: Role,
}

impl From<UserRecord> for UserProfile {
    fn from(record: UserRecord) -> Self {
        Self {
            username: record.username,
            role: record.role,
        }
    }
}

/// JWT claims attached to a request after the bearer middleware verifies the
/// token. Lives only for the duration of one request.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // username
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(username: &str, role: Role, ttl_minutes: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: username.into(),
            role,
            iat: now,
            exp: now + ttl_minutes * 60,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}
