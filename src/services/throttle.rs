use std::sync::Arc;
use tracing::instrument;
use chrono::{DateTime, Utc};
use crate::db::login::ThrottleStore;
use crate::utils::errors::ChronicleError;
use crate::model::login::{ThrottlePolicy, ThrottleState, Verdict};

///
/// Rate-limits authentication attempts per identity key.
///
/// An identity is Absent until it fails, then Throttled with a failure count. Once the count
/// reaches the policy's maximum, attempts are refused until the lockout has passed since the last
/// failure, at which point the record is dropped and the identity is Absent again. Any success
/// drops the record immediately.
///
#[derive(Clone)]
pub struct LoginThrottle {
    store: Arc<dyn ThrottleStore>,
    policy: ThrottlePolicy,
}

impl LoginThrottle {
    pub fn new(store: Arc<dyn ThrottleStore>, policy: ThrottlePolicy) -> Self {
        LoginThrottle { store, policy }
    }

    pub fn policy(&self) -> &ThrottlePolicy {
        &self.policy
    }

    pub async fn state(&self, identity_key: &str) -> Result<ThrottleState, ChronicleError> {
        Ok(self.store.find(identity_key).await?.into())
    }

    ///
    /// Flag an attempt as underway. Returns true if one was already flagged for this key.
    ///
    #[instrument(skip(self))]
    pub async fn mark_in_progress(&self, identity_key: &str, now: DateTime<Utc>) -> Result<bool, ChronicleError> {
        let before = self.store.mark_in_progress(identity_key, now).await?;
        Ok(before.map(|record| record.in_progress).unwrap_or(false))
    }

    ///
    /// Decide if an attempt may proceed. An expired lockout is cleared as a side-effect.
    ///
    #[instrument(skip(self))]
    pub async fn can_authenticate(&self, identity_key: &str, now: DateTime<Utc>) -> Result<bool, ChronicleError> {
        let record = match self.store.find(identity_key).await? {
            Some(record) => record,
            None => return Ok(true),
        };

        match self.policy.evaluate(&ThrottleState::from(Some(record.clone())), now) {
            Verdict::Permitted => Ok(true),

            Verdict::LockedOut { until } => {
                tracing::debug!("Identity locked out until {}", until);
                Ok(false)
            },

            Verdict::CooledDown => {
                if self.store.remove_if_unchanged(&record).await? {
                    tracing::info!("Lockout expired, throttle cleared");
                    return Ok(true)
                }

                // Someone else changed the record since we read it - judge what's there now.
                let current = self.state(identity_key).await?;
                Ok(!matches!(self.policy.evaluate(&current, now), Verdict::LockedOut { .. }))
            },
        }
    }

    ///
    /// Count a failed attempt against the key and restart its cool-down from now.
    ///
    #[instrument(skip(self))]
    pub async fn record_failed_attempt(&self, identity_key: &str, now: DateTime<Utc>) -> Result<ThrottleState, ChronicleError> {
        let record = self.store.record_failure(identity_key, now).await?;

        if record.failed_attempts == self.policy.max_failures() {
            tracing::warn!("Identity has reached {} failed attempts and is locked out", record.failed_attempts);
        }

        Ok(ThrottleState::from(Some(record)))
    }

    ///
    /// Clear all throttle state for the key. Returns false if there was none.
    ///
    #[instrument(skip(self))]
    pub async fn record_successful_attempt(&self, identity_key: &str) -> Result<bool, ChronicleError> {
        self.store.remove(identity_key).await
    }
}
