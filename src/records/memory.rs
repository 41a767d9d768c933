use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use crate::{RecordError, RecordStore, UserRecord};

/// In-process record store for tests and local development.
#[derive(Clone, Default)]
pub struct MemoryRecordStore {
    records: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert(&self, record: UserRecord) -> Result<(), RecordError> {
        let mut records = self.records.write().expect("record store lock poisoned");
        if records.contains_key(&record.username) {
            return Err(RecordError::Duplicate);
        }
        records.insert(record.username.clone(), record);
        Ok(())
    }

    async fn find(&self, username: &str) -> Result<Option<UserRecord>, RecordError> {
        Ok(self
            .records
            .read()
            .expect("record store lock poisoned")
            .get(username)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<UserRecord>, RecordError> {
        Ok(self
            .records
            .read()
            .expect("record store lock poisoned")
            .values()
            .cloned()
            .collect())
    }
}
