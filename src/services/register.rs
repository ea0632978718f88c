use tracing::instrument;
use crate::db;
use crate::model::account::{Account, NewAccount};
use crate::utils::{context::ServiceContext, errors::ChronicleError};

///
/// Validate the registration details, hash the password and store the new account.
///
#[instrument(skip(ctx, details), fields(username = %details.username))]
pub async fn register(ctx: &ServiceContext, details: NewAccount) -> Result<Account, ChronicleError> {
    details.validate()?;

    // Hashing is a highly CPU-bound activity so perform it in the blocking thread pool not on the
    // main event loop.
    let algorithm = ctx.algorithm();
    let plain_text_password = details.password.clone();
    let phc = tokio::task::spawn_blocking(move || algorithm.hash_into_phc(&plain_text_password))
        .await
        .map_err(ChronicleError::from)?
        ?;

    let account = Account::new(details, phc, ctx.now());
    db::account::insert(ctx.db(), &account).await?;

    tracing::info!("Registered account {}", account.account_id);
    Ok(account)
}
