use sqlx::{
    Row,
    postgres::{PgPool, PgPoolOptions, PgRow},
};
use tracing::error;

use crate::{DatabaseConfig, RecordError, RecordStore, Role, UserRecord};

/// Record store backed by a Postgres `users` table (see `migrations/`).
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub async fn connect(dconfig: &DatabaseConfig) -> Result<Self, RecordError> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .connect(&dconfig.url())
            .await
            .inspect_err(|e| error!("failed to connect to record store: {}", e))?;
        Ok(Self { pool })
    }
}

fn record_from_row(row: &PgRow) -> Result<UserRecord, RecordError> {
    let role: String = row.try_get("role")?;
    let role = match role.as_str() {
        "admin" => Role::Admin,
        _ => Role::Dev,
    };
    Ok(UserRecord {
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        role,
    })
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|d| d.code())
        .is_some_and(|code| code == "23505")
}

#[async_trait::async_trait]
impl RecordStore for PgRecordStore {
    async fn insert(&self, record: UserRecord) -> Result<(), RecordError> {
        sqlx::query("INSERT INTO users (username, password_hash, role) VALUES ($1, $2, $3)")
            .bind(&record.username)
            .bind(&record.password_hash)
            .bind(record.role.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    RecordError::Duplicate
                } else {
                    error!("user insert failed: {}", e);
                    RecordError::Connection(e)
                }
            })?;
        Ok(())
    }

    async fn find(&self, username: &str) -> Result<Option<UserRecord>, RecordError> {
        let row = sqlx::query("SELECT username, password_hash, role FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(record_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<UserRecord>, RecordError> {
        let rows = sqlx::query("SELECT username, password_hash, role FROM users")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(record_from_row).collect()
    }
}
