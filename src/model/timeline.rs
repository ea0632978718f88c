use bson::Bson;
use serde::{Deserialize, Serialize};

///
/// An item on the breach timeline. The id is assigned by whoever curates the timeline.
///
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineItem {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: Option<String>,
    pub short: Option<String>,
    pub group: Option<String>,
    pub content: Option<String>,
    pub start: Option<bson::DateTime>,
    pub end: Option<bson::DateTime>,
    #[serde(default)]
    pub timeline_events: Vec<Bson>,
    #[serde(default)]
    pub details: Vec<Bson>,
    #[serde(default)]
    pub records: i64,
    pub breach_type: Option<String>,
    #[serde(default)]
    pub sources: Vec<Bson>,
    pub targets: Option<String>,
    pub affiliations: Option<String>,
}
