use serde::{Deserialize, Serialize};
use crate::utils::errors::{ErrorCode, ChronicleError};

///
/// A vote by an account on a timeline item.
///
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventVote {
    pub event_id: i64,
    pub vote_type: String,
    pub voter: String,     // The voting account's account_id.
}

impl EventVote {
    pub fn validate(&self) -> Result<(), ChronicleError> {
        if self.event_id < 1 {
            return Err(ErrorCode::InvalidEventId.with_msg(&format!("event id {} is invalid, ids start at 1", self.event_id)))
        }

        if self.vote_type.trim().is_empty() {
            return Err(ErrorCode::VoteTypeMandatory.with_msg("a vote type is required"))
        }

        if self.voter.trim().is_empty() {
            return Err(ErrorCode::VoterMandatory.with_msg("a voter is required"))
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(event_id: i64, vote_type: &str, voter: &str) -> EventVote {
        EventVote { event_id, vote_type: vote_type.to_string(), voter: voter.to_string() }
    }

    #[test]
    fn test_vote_rules() {
        assert!(vote(1, "up", "a1").validate().is_ok());
        assert_eq!(vote(0, "up", "a1").validate().unwrap_err().error_code(), ErrorCode::InvalidEventId);
        assert_eq!(vote(-4, "up", "a1").validate().unwrap_err().error_code(), ErrorCode::InvalidEventId);
        assert_eq!(vote(1, "", "a1").validate().unwrap_err().error_code(), ErrorCode::VoteTypeMandatory);
        assert_eq!(vote(1, "up", " ").validate().unwrap_err().error_code(), ErrorCode::VoterMandatory);
    }
}
