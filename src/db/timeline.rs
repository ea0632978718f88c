use futures::TryStreamExt;
use crate::db::prelude::*;
use crate::model::timeline::TimelineItem;
use crate::utils::errors::{ErrorCode, ChronicleError};
use mongodb::{Database, bson::doc, options::{FindOptions, ReplaceOptions}};

///
/// Create or replace the timeline item with the item's id.
///
pub async fn upsert(db: &Database, item: &TimelineItem) -> Result<(), ChronicleError> {
    db.collection::<TimelineItem>(TIMELINE_ITEMS)
        .replace_one(doc!{ ID: item.id }, item, ReplaceOptions::builder().upsert(true).build())
        .await?;

    Ok(())
}

pub async fn load(db: &Database, id: i64) -> Result<TimelineItem, ChronicleError> {
    let result = db.collection::<TimelineItem>(TIMELINE_ITEMS)
        .find_one(doc!{ ID: id }, None)
        .await?;

    match result {
        Some(item) => Ok(item),
        None => Err(ErrorCode::TimelineItemNotFound.with_msg(&format!("The timeline item {} does not exist", id))),
    }
}

///
/// All the items in a group, earliest first.
///
pub async fn in_group(db: &Database, group: &str) -> Result<Vec<TimelineItem>, ChronicleError> {
    let options = FindOptions::builder().sort(doc!{ START: 1, ID: 1 }).build();

    let cursor = db.collection::<TimelineItem>(TIMELINE_ITEMS)
        .find(doc!{ GROUP: group }, options)
        .await?;

    Ok(cursor.try_collect().await?)
}

pub async fn delete(db: &Database, id: i64) -> Result<bool, ChronicleError> {
    let result = db.collection::<TimelineItem>(TIMELINE_ITEMS)
        .delete_one(doc!{ ID: id }, None)
        .await?;

    Ok(result.deleted_count > 0)
}
