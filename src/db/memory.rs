use std::collections::HashMap;
use parking_lot::Mutex;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use super::login::ThrottleStore;
use crate::model::login::LoginRecord;
use crate::utils::errors::ChronicleError;

///
/// Throttle records held in process memory. Suitable for a single instance or tests - the state is
/// lost on restart and not shared between instances.
///
#[derive(Debug, Default)]
pub struct MemoryThrottleStore {
    logins: Mutex<HashMap<String, LoginRecord>>,
}

impl MemoryThrottleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.logins.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.logins.lock().is_empty()
    }
}

#[async_trait]
impl ThrottleStore for MemoryThrottleStore {
    async fn find(&self, identity_key: &str) -> Result<Option<LoginRecord>, ChronicleError> {
        Ok(self.logins.lock().get(identity_key).cloned())
    }

    async fn mark_in_progress(&self, identity_key: &str, now: DateTime<Utc>) -> Result<Option<LoginRecord>, ChronicleError> {
        let mut lock = self.logins.lock();
        let before = lock.get(identity_key).cloned();

        lock.entry(identity_key.to_string())
            .or_insert_with(|| LoginRecord::new(identity_key, now))
            .in_progress = true;

        Ok(before)
    }

    async fn record_failure(&self, identity_key: &str, now: DateTime<Utc>) -> Result<LoginRecord, ChronicleError> {
        let mut lock = self.logins.lock();
        let record = lock.entry(identity_key.to_string())
            .or_insert_with(|| LoginRecord::new(identity_key, now));

        record.failed_attempts += 1;
        record.timeout = bson::DateTime::from_chrono(now);
        record.in_progress = false;

        Ok(record.clone())
    }

    async fn remove(&self, identity_key: &str) -> Result<bool, ChronicleError> {
        Ok(self.logins.lock().remove(identity_key).is_some())
    }

    async fn remove_if_unchanged(&self, observed: &LoginRecord) -> Result<bool, ChronicleError> {
        let mut lock = self.logins.lock();

        let unchanged = match lock.get(&observed.identity_key) {
            Some(current) => current.failed_attempts == observed.failed_attempts && current.timeout == observed.timeout,
            None => false,
        };

        if unchanged {
            lock.remove(&observed.identity_key);
        }

        Ok(unchanged)
    }
}
