pub mod account;
pub mod login;
pub mod memory;
pub mod mongo;
pub mod timeline;
pub mod vote;

pub mod prelude {
    // Collection names.
    pub const USERS:          &str = "Users";
    pub const LOGINS:         &str = "Logins";
    pub const TIMELINE_ITEMS: &str = "TimelineItems";
    pub const EVENT_VOTES:    &str = "EventVotes";

    // Field names.
    pub const ACCOUNT_ID:      &str = "accountId";
    pub const USERNAME:        &str = "username";
    pub const IDENTITY_KEY:    &str = "identityKey";
    pub const FAILED_ATTEMPTS: &str = "failedAttempts";
    pub const TIMEOUT:         &str = "timeout";
    pub const IN_PROGRESS:     &str = "inProgress";
    pub const ID:              &str = "_id";
    pub const GROUP:           &str = "group";
    pub const START:           &str = "start";
    pub const EVENT_ID:        &str = "eventId";
    pub const VOTE_TYPE:       &str = "voteType";
    pub const VOTER:           &str = "voter";
}
