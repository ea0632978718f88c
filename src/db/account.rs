use mongodb::{Database, bson::doc};
use crate::db::{mongo, prelude::*};
use crate::model::account::Account;
use crate::utils::errors::{ErrorCode, ChronicleError};

///
/// Persist a new account. A clashing username is reported as UsernameTaken.
///
pub async fn insert(db: &Database, account: &Account) -> Result<(), ChronicleError> {
    match db.collection::<Account>(USERS).insert_one(account, None).await {
        Ok(_) => Ok(()),
        Err(err) => match mongo::is_duplicate_err(&err) {
            true  => Err(ErrorCode::UsernameTaken.with_msg(&format!("The username '{}' is already in use", account.username))),
            false => Err(ChronicleError::from(err)),
        },
    }
}

///
/// Load the account with the given username if it exists.
///
pub async fn load_by_username(db: &Database, username: &str) -> Result<Option<Account>, ChronicleError> {
    Ok(db.collection::<Account>(USERS)
        .find_one(doc!{ USERNAME: username }, None)
        .await?)
}

///
/// Load the requested account from the database.
///
pub async fn load(db: &Database, account_id: &str) -> Result<Account, ChronicleError> {
    let result = db.collection::<Account>(USERS)
        .find_one(doc!{ ACCOUNT_ID: account_id }, None)
        .await?;

    match result {
        Some(account) => Ok(account),
        None => Err(ErrorCode::AccountNotFound.with_msg(&format!("The account {} does not exist", account_id))),
    }
}
