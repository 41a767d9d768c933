mod memory;
mod postgres;

pub use memory::*;
pub use postgres::*;

use crate::{RecordError, UserRecord};

/// Contract against the external key-value collection of user credentials.
/// Records are created at sign-up and read at sign-in; nothing updates or
/// deletes them.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts a new record; `RecordError::Duplicate` when the username is
    /// already taken.
    async fn insert(&self, record: UserRecord) -> Result<(), RecordError>;

    /// Keyed lookup by username.
    async fn find(&self, username: &str) -> Result<Option<UserRecord>, RecordError>;

    /// All records, in no guaranteed order.
    async fn list(&self) -> Result<Vec<UserRecord>, RecordError>;
}
