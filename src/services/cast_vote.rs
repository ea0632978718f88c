use tracing::instrument;
use crate::db;
use crate::model::vote::EventVote;
use crate::utils::{context::ServiceContext, errors::ChronicleError};

///
/// Record a vote against a timeline item. The item and voter are soft references and are not
/// checked for existence, nor are repeat votes prevented.
///
#[instrument(skip(ctx))]
pub async fn cast_vote(ctx: &ServiceContext, vote: EventVote) -> Result<EventVote, ChronicleError> {
    vote.validate()?;
    db::vote::insert(ctx.db(), &vote).await?;
    Ok(vote)
}
