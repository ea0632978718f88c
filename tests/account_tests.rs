mod common;
use chrono::Duration;
use more_asserts::assert_ge;
use chronicle::{authenticate, register};
use chronicle::model::account::{Account, NewAccount};
use chronicle::model::login::ThrottleState;
use chronicle::utils::errors::ErrorCode;
use crate::common::{TestConfig, at, start_chronicle, unique_name};

const GOOD_PWD: &str = "W1bbleW0bble";
const BAD_PWD:  &str = "Hello4567890";

fn new_account(username: &str) -> NewAccount {
    NewAccount {
        first_name: Some("Test".to_string()),
        last_name: Some("User".to_string()),
        username: username.to_string(),
        password: GOOD_PWD.to_string(),
        email: "test.user@example.com".to_string(),
    }
}

#[tokio::test]
async fn test_usernames_are_unique() {
    let test = match start_chronicle(TestConfig::default()).await {
        Some(test) => test,
        None => return,
    };
    let username = unique_name("dupe");

    register(&test.ctx, new_account(&username)).await.unwrap();

    let err = register(&test.ctx, new_account(&username)).await.unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::UsernameTaken);
}

#[tokio::test]
async fn test_registered_account_authenticates() {
    let test = match start_chronicle(TestConfig::default()).await {
        Some(test) => test,
        None => return,
    };
    let ctx = &test.ctx;
    let username = unique_name("alice");
    let before = chrono::Utc::now() - Duration::seconds(1);

    let account = register(ctx, new_account(&username)).await.unwrap();
    assert_ne!(account.password, GOOD_PWD);
    assert_ge!(account.created.to_chrono(), before);

    let authenticated = authenticate(ctx, &username, GOOD_PWD).await.unwrap();
    assert_eq!(authenticated.account_id, account.account_id);
    assert_eq!(ctx.throttle().state(&username).await.unwrap(), ThrottleState::Absent);

    let loaded = chronicle::db::account::load(ctx.db(), &account.account_id).await.unwrap();
    assert_eq!(loaded.username, username);
}

#[tokio::test]
async fn test_failures_lock_out_even_the_right_password() {
    let test = match start_chronicle(TestConfig::default()).await {
        Some(test) => test,
        None => return,
    };
    let ctx = &test.ctx;
    let username = unique_name("bob");

    register(ctx, new_account(&username)).await.unwrap();
    ctx.set_now(Some(at("2021-08-23T09:30:00Z")));

    for _ in 0..5 {
        let err = authenticate(ctx, &username, BAD_PWD).await.unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::AuthenticationFailed);
    }

    // Locked out - indistinguishable from a bad password.
    let err = authenticate(ctx, &username, GOOD_PWD).await.unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::AuthenticationFailed);
    assert_eq!(ctx.throttle().state(&username).await.unwrap().failed_attempts(), 5);

    // Time-travel past the cool-down.
    ctx.advance_now(Duration::minutes(1));
    authenticate(ctx, &username, GOOD_PWD).await.unwrap();
    assert_eq!(ctx.throttle().state(&username).await.unwrap(), ThrottleState::Absent);

    ctx.set_now(None);
}

#[tokio::test]
async fn test_unknown_username_is_a_generic_failure() {
    let test = match start_chronicle(TestConfig::default()).await {
        Some(test) => test,
        None => return,
    };
    let username = unique_name("ghost");

    let err = authenticate(&test.ctx, &username, GOOD_PWD).await.unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::AuthenticationFailed);
    assert_eq!(test.ctx.throttle().state(&username).await.unwrap().failed_attempts(), 1);
}

#[tokio::test]
async fn test_invalid_registration_is_not_stored() {
    let test = match start_chronicle(TestConfig::default()).await {
        Some(test) => test,
        None => return,
    };
    let username = unique_name("weak");

    let err = register(&test.ctx, NewAccount { password: "tooshort1".to_string(), ..new_account(&username) })
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::PasswordTooShort);

    let loaded = chronicle::db::account::load_by_username(test.ctx.db(), &username).await.unwrap();
    assert!(loaded.is_none());
}

#[tokio::test]
async fn test_plain_text_stored_password_is_a_generic_failure() {
    let test = match start_chronicle(TestConfig::default()).await {
        Some(test) => test,
        None => return,
    };
    let ctx = &test.ctx;
    let username = unique_name("legacy");

    // A row written before credentials were hashed.
    let legacy = Account::new(new_account(&username), GOOD_PWD.to_string(), chrono::Utc::now());
    chronicle::db::account::insert(ctx.db(), &legacy).await.unwrap();

    let err = authenticate(ctx, &username, GOOD_PWD).await.unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::AuthenticationFailed);

    let state = ctx.throttle().state(&username).await.unwrap();
    assert_eq!(state.failed_attempts(), 1);
    assert_eq!(state.in_progress(), false);
}
