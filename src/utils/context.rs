use std::sync::Arc;
use mongodb::Database;
use parking_lot::RwLock;
use chrono::{DateTime, Duration, Utc};
use crate::db::login::{MongoThrottleStore, ThrottleStore};
use crate::model::algorithm::Algorithm;
use crate::services::throttle::LoginThrottle;
use crate::utils::{config::Configuration, errors::ChronicleError, time_provider::TimeProvider};

///
/// The context is available to all services and gives them access to the DB, config, clock and login throttle.
///
pub struct ServiceContext {
    db: Database,
    config: Configuration,
    algorithm: Algorithm,
    throttle: LoginThrottle,
    time_provider: RwLock<TimeProvider>,
}

impl ServiceContext {
    ///
    /// A context whose login throttle is persisted in MongoDB alongside everything else.
    ///
    pub fn new(config: Configuration, db: Database) -> Result<Self, ChronicleError> {
        let store = Arc::new(MongoThrottleStore::new(&db));
        Self::with_throttle_store(config, db, store)
    }

    ///
    /// A context with the throttle records held in the store given.
    ///
    pub fn with_throttle_store(config: Configuration, db: Database, store: Arc<dyn ThrottleStore>)
        -> Result<Self, ChronicleError> {

        Ok(ServiceContext {
            algorithm: config.algorithm()?,
            throttle: LoginThrottle::new(store, config.throttle_policy()),
            time_provider: RwLock::new(TimeProvider::default()),
            db,
            config,
        })
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.time_provider.read().now()
    }

    ///
    /// Set or clear the fixed time.
    ///
    pub fn set_now(&self, now: Option<DateTime<Utc>>) {
        self.time_provider.write().fix(now);
    }

    pub fn advance_now(&self, duration: Duration) {
        self.time_provider.write().advance(duration);
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn throttle(&self) -> &LoginThrottle {
        &self.throttle
    }

    ///
    /// The algorithm new credentials are hashed with.
    ///
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }
}
