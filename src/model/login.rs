use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, Utc};

///
/// The persisted throttle document for an identity key. Only exists while the identity has
/// failed attempts (or an attempt in flight) and no subsequent success.
///
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginRecord {
    pub identity_key: String,
    #[serde(default)]
    pub failed_attempts: u32,
    pub timeout: bson::DateTime,
    #[serde(default)]
    pub in_progress: bool,
}

impl LoginRecord {
    ///
    /// A record as it would be created by an upsert, with defaults evaluated now.
    ///
    pub fn new(identity_key: &str, now: DateTime<Utc>) -> Self {
        LoginRecord {
            identity_key: identity_key.to_string(),
            failed_attempts: 0,
            timeout: bson::DateTime::from_chrono(now),
            in_progress: false,
        }
    }
}

///
/// The throttle state of a single identity key.
///
#[derive(Clone, Debug, PartialEq)]
pub enum ThrottleState {
    Absent,
    Throttled {
        failed_attempts: u32,
        last_failure: DateTime<Utc>,
        in_progress: bool,
    },
}

impl From<Option<LoginRecord>> for ThrottleState {
    fn from(record: Option<LoginRecord>) -> Self {
        match record {
            None => ThrottleState::Absent,
            Some(record) => ThrottleState::Throttled {
                failed_attempts: record.failed_attempts,
                last_failure: record.timeout.into(),
                in_progress: record.in_progress,
            },
        }
    }
}

impl ThrottleState {
    pub fn failed_attempts(&self) -> u32 {
        match self {
            ThrottleState::Absent => 0,
            ThrottleState::Throttled { failed_attempts, .. } => *failed_attempts,
        }
    }

    pub fn in_progress(&self) -> bool {
        match self {
            ThrottleState::Absent => false,
            ThrottleState::Throttled { in_progress, .. } => *in_progress,
        }
    }
}

///
/// What the policy makes of an identity's state at a point in time.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Verdict {
    Permitted,
    CooledDown,                            // Was locked out but the cool-down has passed, the record should go.
    LockedOut { until: DateTime<Utc> },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThrottlePolicy {
    max_failures: u32,
    lockout: Duration,
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        ThrottlePolicy {
            max_failures: 5,
            lockout: Duration::minutes(1),
        }
    }
}

impl ThrottlePolicy {
    pub fn new(max_failures: u32, lockout: Duration) -> Self {
        ThrottlePolicy { max_failures, lockout }
    }

    pub fn max_failures(&self) -> u32 {
        self.max_failures
    }

    pub fn lockout(&self) -> Duration {
        self.lockout
    }

    ///
    /// Once max_failures is reached, attempts are refused until lockout has passed since the last
    /// failure. Arriving exactly on the deadline is allowed.
    ///
    pub fn evaluate(&self, state: &ThrottleState, now: DateTime<Utc>) -> Verdict {
        match state {
            ThrottleState::Absent => Verdict::Permitted,

            ThrottleState::Throttled { failed_attempts, .. } if *failed_attempts < self.max_failures => Verdict::Permitted,

            ThrottleState::Throttled { last_failure, .. } => {
                let deadline = *last_failure + self.lockout;
                match now >= deadline {
                    true  => Verdict::CooledDown,
                    false => Verdict::LockedOut { until: deadline },
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
    }

    fn throttled(failed_attempts: u32, last_failure: DateTime<Utc>) -> ThrottleState {
        ThrottleState::Throttled { failed_attempts, last_failure, in_progress: false }
    }

    #[test]
    fn test_absent_is_permitted() {
        let policy = ThrottlePolicy::default();
        assert_eq!(policy.evaluate(&ThrottleState::Absent, Utc::now()), Verdict::Permitted);
    }

    #[test]
    fn test_below_max_failures_is_permitted() {
        let policy = ThrottlePolicy::default();
        let now = at("2021-08-23T09:30:00Z");
        assert_eq!(policy.evaluate(&throttled(4, now), now), Verdict::Permitted);
    }

    #[test]
    fn test_max_failures_locks_out_until_deadline() {
        let policy = ThrottlePolicy::default();
        let failure = at("2021-08-23T09:30:00Z");

        assert_eq!(policy.evaluate(&throttled(5, failure), at("2021-08-23T09:30:59Z")),
            Verdict::LockedOut { until: at("2021-08-23T09:31:00Z") });

        // Exactly on the deadline is allowed through.
        assert_eq!(policy.evaluate(&throttled(5, failure), at("2021-08-23T09:31:00Z")), Verdict::CooledDown);
        assert_eq!(policy.evaluate(&throttled(9, failure), at("2021-08-23T10:00:00Z")), Verdict::CooledDown);
    }

    #[test]
    fn test_custom_policy() {
        let policy = ThrottlePolicy::new(2, Duration::seconds(10));
        let failure = at("2021-08-23T09:30:00Z");

        assert_eq!(policy.evaluate(&throttled(1, failure), failure), Verdict::Permitted);
        assert_eq!(policy.evaluate(&throttled(2, failure), at("2021-08-23T09:30:09Z")),
            Verdict::LockedOut { until: at("2021-08-23T09:30:10Z") });
        assert_eq!(policy.evaluate(&throttled(2, failure), at("2021-08-23T09:30:10Z")), Verdict::CooledDown);
    }

    #[test]
    fn test_state_from_record() {
        let now = at("2021-08-23T09:30:00Z");
        let mut record = LoginRecord::new("alice", now);
        record.failed_attempts = 3;
        record.in_progress = true;

        let state = ThrottleState::from(Some(record));
        assert_eq!(state, ThrottleState::Throttled { failed_attempts: 3, last_failure: now, in_progress: true });
        assert_eq!(state.failed_attempts(), 3);
        assert!(state.in_progress());
        assert_eq!(ThrottleState::from(None), ThrottleState::Absent);
    }

    #[test]
    fn test_record_uses_original_field_names() -> Result<(), bson::ser::Error> {
        let doc = bson::to_document(&LoginRecord::new("alice", at("2021-08-23T09:30:00Z")))?;
        assert_eq!(doc.get_str("identityKey").unwrap(), "alice");
        assert!(doc.contains_key("failedAttempts"));
        assert!(doc.contains_key("timeout"));
        assert!(doc.contains_key("inProgress"));
        Ok(())
    }
}
