use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::db::{mongo, prelude::*};
use crate::model::login::LoginRecord;
use crate::utils::errors::ChronicleError;
use mongodb::{Collection, Database, bson::{self, doc}};

///
/// Persistence for login throttle records. Each operation must be atomic for a single identity key.
///
#[async_trait]
pub trait ThrottleStore: Send + Sync {
    ///
    /// Load the record for the key, if there is one.
    ///
    async fn find(&self, identity_key: &str) -> Result<Option<LoginRecord>, ChronicleError>;

    ///
    /// Set in_progress, creating the record with defaults if absent. Returns the record as it was
    /// before the update.
    ///
    async fn mark_in_progress(&self, identity_key: &str, now: DateTime<Utc>) -> Result<Option<LoginRecord>, ChronicleError>;

    ///
    /// Bump the failure count, stamp the failure time and clear in_progress, creating the record if absent.
    /// Returns the record after the update.
    ///
    async fn record_failure(&self, identity_key: &str, now: DateTime<Utc>) -> Result<LoginRecord, ChronicleError>;

    ///
    /// Delete the record for the key. Returns true if there was one.
    ///
    async fn remove(&self, identity_key: &str) -> Result<bool, ChronicleError>;

    ///
    /// Delete the record only if it still has the failure count and timeout observed. Returns true
    /// if it was deleted.
    ///
    async fn remove_if_unchanged(&self, observed: &LoginRecord) -> Result<bool, ChronicleError>;
}

///
/// Throttle records held in the Logins collection.
///
#[derive(Clone, Debug)]
pub struct MongoThrottleStore {
    logins: Collection<LoginRecord>,
}

impl MongoThrottleStore {
    pub fn new(db: &Database) -> Self {
        MongoThrottleStore { logins: db.collection::<LoginRecord>(LOGINS) }
    }
}

#[async_trait]
impl ThrottleStore for MongoThrottleStore {
    async fn find(&self, identity_key: &str) -> Result<Option<LoginRecord>, ChronicleError> {
        Ok(self.logins.find_one(doc!{ IDENTITY_KEY: identity_key }, None).await?)
    }

    async fn mark_in_progress(&self, identity_key: &str, now: DateTime<Utc>) -> Result<Option<LoginRecord>, ChronicleError> {
        let update = doc!{
            "$set": { IN_PROGRESS: true },
            "$setOnInsert": {
                FAILED_ATTEMPTS: 0,
                TIMEOUT: bson::DateTime::from_chrono(now),
            }
        };

        Ok(self.logins
            .find_one_and_update(doc!{ IDENTITY_KEY: identity_key }, update, mongo::upsert_returning_before())
            .await?)
    }

    async fn record_failure(&self, identity_key: &str, now: DateTime<Utc>) -> Result<LoginRecord, ChronicleError> {
        let update = doc!{
            "$inc": { FAILED_ATTEMPTS: 1 },
            "$set": {
                TIMEOUT: bson::DateTime::from_chrono(now),
                IN_PROGRESS: false,
            }
        };

        let updated = self.logins
            .find_one_and_update(doc!{ IDENTITY_KEY: identity_key }, update, mongo::upsert_returning_after())
            .await?;

        // An upsert returning the new document always yields one.
        Ok(updated.unwrap_or_else(|| LoginRecord {
            failed_attempts: 1,
            ..LoginRecord::new(identity_key, now)
        }))
    }

    async fn remove(&self, identity_key: &str) -> Result<bool, ChronicleError> {
        let result = self.logins.delete_one(doc!{ IDENTITY_KEY: identity_key }, None).await?;
        Ok(result.deleted_count > 0)
    }

    async fn remove_if_unchanged(&self, observed: &LoginRecord) -> Result<bool, ChronicleError> {
        let filter = doc!{
            IDENTITY_KEY: observed.identity_key.as_str(),
            FAILED_ATTEMPTS: observed.failed_attempts as i64,
            TIMEOUT: observed.timeout,
        };

        let result = self.logins.delete_one(filter, None).await?;
        Ok(result.deleted_count > 0)
    }
}
