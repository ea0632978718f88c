use std::fs;
use tracing::{debug, info};
use crate::db::prelude::*;
use mongodb::error::ErrorKind;
use crate::utils::config::Configuration;
use crate::utils::errors::{ErrorCode, ChronicleError};
use mongodb::{Client, Database, bson::{Document, doc}, options::{ClientOptions, FindOneAndUpdateOptions, ReturnDocument}};

///
/// Run any schema-like updates against MongoDB that haven't been run yet.
///
pub async fn update_mongo(db: &Database) -> Result<(), ChronicleError> {
    create_init_indexes(db).await?;
    Ok(())
}

async fn create_init_indexes(db: &Database) -> Result<(), ChronicleError> {
    // createIndexes is a no-op for indexes which already exist with the same definition.
    // https://docs.mongodb.com/manual/reference/command/createIndexes/#createindexes

    db.run_command(doc! { "createIndexes": USERS, "indexes": [
        { "key": { USERNAME: 1 }, "name": "idx_username", "unique": true },
        { "key": { ACCOUNT_ID: 1 }, "name": "idx_account_id", "unique": true }] }, None).await?;
    db.run_command(doc! { "createIndexes": LOGINS, "indexes": [
        { "key": { IDENTITY_KEY: 1 }, "name": "idx_identity_key", "unique": true }] }, None).await?;
    db.run_command(doc! { "createIndexes": TIMELINE_ITEMS, "indexes": [
        { "key": { GROUP: 1, START: 1 }, "name": "idx_group_start", "unique": false }] }, None).await?;
    db.run_command(doc! { "createIndexes": EVENT_VOTES, "indexes": [
        { "key": { VOTE_TYPE: 1, VOTER: 1 }, "name": "idx_vote_type_voter", "unique": false },
        { "key": { EVENT_ID: 1 }, "name": "idx_event_id", "unique": false }] }, None).await?;

    info!("MongoDB indexes in sync");
    Ok(())
}

///
/// Indicates if the MongoDB error is from a duplicate key violation.
///
pub fn is_duplicate_err(err: &mongodb::error::Error) -> bool {
    match &*err.kind {
        ErrorKind::Write(mongodb::error::WriteFailure::WriteError(we)) => we.code == 11000 /* Duplicate insert */,
        ErrorKind::Command(ce) => ce.code == 11000,
        _ => false,
    }
}

pub async fn get_mongo_db(app_name: &str, config: &Configuration) -> Result<Database, ChronicleError> {

    let uri = match &config.mongo_credentials {
        Some(filename) if !filename.is_empty() => {
            debug!("Loading MongoDB credentials from secrets file {}", filename);

            // Read username and password from a secrets file.
            let credentials = fs::read_to_string(filename)
                .map_err(|err| ErrorCode::UnableToReadCredentials
                    .with_msg(&format!("Unable to read credentials from {}: {}", filename, err)))?;
            let mut credentials = credentials.lines();
            let uri = config.mongo_uri.replace("$USERNAME", credentials.next().unwrap_or_default());
            uri.replace("$PASSWORD", credentials.next().unwrap_or_default())
        },
        _ => config.mongo_uri.clone(),
    };

    // Parse the uri now.
    let mut client_options = ClientOptions::parse(&uri).await?;

    // Manually set an option.
    client_options.app_name = Some(app_name.to_string());

    // Get a handle to the deployment.
    let client = Client::with_options(client_options)?;

    info!("Connecting to MongoDB...");

    let db = client.database(&config.db_name);
    ping(&db).await?;

    info!("Connected to MongoDB");
    Ok(db)
}

pub async fn ping(db: &Database) -> Result<Document, ChronicleError> {
    Ok(db.run_command(doc! { "ping": 1 }, None).await?)
}

///
/// Upsert and hand back the document as it was before the update (None if it was inserted).
///
pub fn upsert_returning_before() -> FindOneAndUpdateOptions {
    FindOneAndUpdateOptions::builder().upsert(true).return_document(ReturnDocument::Before).build()
}

///
/// Upsert and hand back the document as it is after the update.
///
pub fn upsert_returning_after() -> FindOneAndUpdateOptions {
    FindOneAndUpdateOptions::builder().upsert(true).return_document(ReturnDocument::After).build()
}
