use std::future::Future;
use tracing::instrument;
use chrono::{DateTime, Utc};
use crate::db;
use crate::model::account::Account;
use crate::services::throttle::LoginThrottle;
use crate::utils::{context::ServiceContext, errors::{ErrorCode, ChronicleError}};

const GENERIC_FAILURE: &str = "The username or password is incorrect, or too many attempts have been made";

///
/// Verify a username and password, applying the login throttle to the username.
///
/// Lock-out, unknown usernames, wrong passwords and unverifiable stored credentials all produce the
/// same AuthenticationFailed error so the caller can't tell them apart.
///
#[instrument(skip(ctx, plain_text_password))]
pub async fn authenticate(ctx: &ServiceContext, username: &str, plain_text_password: &str)
    -> Result<Account, ChronicleError> {

    let lookup = db::account::load_by_username(ctx.db(), username);
    authenticate_with(ctx.throttle(), || ctx.now(), username, plain_text_password, lookup).await
}

///
/// The authentication sequence against any account lookup. The lookup is only awaited once the
/// throttle has permitted the attempt.
///
async fn authenticate_with<N, L>(
    throttle: &LoginThrottle,
    now: N,
    username: &str,
    plain_text_password: &str,
    lookup: L) -> Result<Account, ChronicleError>
where
    N: Fn() -> DateTime<Utc>,
    L: Future<Output = Result<Option<Account>, ChronicleError>> {

    if !throttle.can_authenticate(username, now()).await? {
        tracing::warn!("Authentication refused, identity is locked out");
        return Err(ErrorCode::AuthenticationFailed.with_msg(GENERIC_FAILURE))
    }

    if throttle.mark_in_progress(username, now()).await? {
        tracing::debug!("Another attempt is already in progress for this identity");
    }

    let account = match lookup.await? {
        Some(account) => account,
        None => {
            throttle.record_failed_attempt(username, now()).await?;
            tracing::warn!("Authentication failed, unknown username");
            return Err(ErrorCode::AuthenticationFailed.with_msg(GENERIC_FAILURE))
        }
    };

    // Verifying is as CPU-bound as hashing, keep it off the event loop.
    let candidate = plain_text_password.to_string();
    let (account, valid) = tokio::task::spawn_blocking(move || {
            let valid = account.password_is_valid(&candidate);
            (account, valid)
        })
        .await
        .map_err(ChronicleError::from)?;

    match valid {
        Ok(true) => {},
        Ok(false) => {
            let state = throttle.record_failed_attempt(username, now()).await?;
            tracing::warn!("Authentication failed, password mismatch ({} failed attempts)", state.failed_attempts());
            return Err(ErrorCode::AuthenticationFailed.with_msg(GENERIC_FAILURE))
        },
        Err(err) => {
            // The stored credential can't be verified, it still counts against the identity.
            let state = throttle.record_failed_attempt(username, now()).await?;
            tracing::error!("Unable to verify the credential for account {} ({} failed attempts): {}",
                account.account_id, state.failed_attempts(), err);
            return Err(ErrorCode::AuthenticationFailed.with_msg(GENERIC_FAILURE))
        },
    }

    throttle.record_successful_attempt(username).await?;
    tracing::info!("Authenticated account {}", account.account_id);
    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::db::memory::MemoryThrottleStore;
    use crate::model::{account::NewAccount, algorithm::Algorithm, login::{ThrottlePolicy, ThrottleState}};

    fn at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2021-08-23T09:30:00Z").unwrap().with_timezone(&Utc)
    }

    fn throttle() -> LoginThrottle {
        LoginThrottle::new(Arc::new(MemoryThrottleStore::new()), ThrottlePolicy::default())
    }

    fn account(password: String) -> Account {
        let details = NewAccount {
            username: "alice".to_string(),
            password: String::new(),
            email: "alice@example.com".to_string(),
            ..NewAccount::default()
        };
        Account::new(details, password, at())
    }

    async fn found(account: Account) -> Result<Option<Account>, ChronicleError> {
        Ok(Some(account))
    }

    async fn missing() -> Result<Option<Account>, ChronicleError> {
        Ok(None)
    }

    #[tokio::test]
    async fn test_plain_text_stored_password_is_a_generic_failure() {
        let throttle = throttle();
        let stored = account("plaintextpassword1".to_string());

        let err = authenticate_with(&throttle, at, "alice", "plaintextpassword1", found(stored))
            .await
            .unwrap_err();

        assert_eq!(err.error_code(), ErrorCode::AuthenticationFailed);
        assert_eq!(err.message(), GENERIC_FAILURE);

        let state = throttle.state("alice").await.unwrap();
        assert_eq!(state.failed_attempts(), 1);
        assert_eq!(state.in_progress(), false);
    }

    #[tokio::test]
    async fn test_unverifiable_credentials_lock_out() {
        let throttle = throttle();

        for _ in 0..5 {
            let stored = account("$bogus$not-a-hash".to_string());
            authenticate_with(&throttle, at, "alice", "correcthorse42", found(stored)).await.unwrap_err();
        }

        assert_eq!(throttle.state("alice").await.unwrap().failed_attempts(), 5);
        assert!(!throttle.can_authenticate("alice", at()).await.unwrap());
    }

    #[tokio::test]
    async fn test_matching_password_clears_failures() -> Result<(), ChronicleError> {
        let throttle = throttle();
        let phc = Algorithm::Argon.hash_into_phc("correcthorse42")?;

        let err = authenticate_with(&throttle, at, "alice", "correcthorse43", found(account(phc.clone())))
            .await
            .unwrap_err();
        assert_eq!(err.message(), GENERIC_FAILURE);
        assert_eq!(throttle.state("alice").await?.failed_attempts(), 1);

        let authenticated = authenticate_with(&throttle, at, "alice", "correcthorse42", found(account(phc))).await?;
        assert_eq!(authenticated.username, "alice");
        assert_eq!(throttle.state("alice").await?, ThrottleState::Absent);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_username_counts_as_a_failure() {
        let throttle = throttle();

        let err = authenticate_with(&throttle, at, "ghost", "correcthorse42", missing())
            .await
            .unwrap_err();

        assert_eq!(err.message(), GENERIC_FAILURE);
        assert_eq!(throttle.state("ghost").await.unwrap().failed_attempts(), 1);
    }
}
