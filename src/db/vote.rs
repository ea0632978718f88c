use futures::TryStreamExt;
use crate::db::prelude::*;
use crate::model::vote::EventVote;
use crate::utils::errors::ChronicleError;
use mongodb::{Database, bson::doc};

pub async fn insert(db: &Database, vote: &EventVote) -> Result<(), ChronicleError> {
    db.collection::<EventVote>(EVENT_VOTES).insert_one(vote, None).await?;
    Ok(())
}

pub async fn for_event(db: &Database, event_id: i64) -> Result<Vec<EventVote>, ChronicleError> {
    let cursor = db.collection::<EventVote>(EVENT_VOTES)
        .find(doc!{ EVENT_ID: event_id }, None)
        .await?;

    Ok(cursor.try_collect().await?)
}

///
/// The votes of one type cast by a voter - served by the (voteType, voter) index.
///
pub async fn by_voter(db: &Database, vote_type: &str, voter: &str) -> Result<Vec<EventVote>, ChronicleError> {
    let cursor = db.collection::<EventVote>(EVENT_VOTES)
        .find(doc!{ VOTE_TYPE: vote_type, VOTER: voter }, None)
        .await?;

    Ok(cursor.try_collect().await?)
}

pub async fn count(db: &Database, event_id: i64, vote_type: &str) -> Result<u64, ChronicleError> {
    Ok(db.collection::<EventVote>(EVENT_VOTES)
        .count_documents(doc!{ EVENT_ID: event_id, VOTE_TYPE: vote_type }, None)
        .await?)
}
