use std::fmt;
use bcrypt::BcryptError;
use mongodb::bson;
use config::ConfigError;
use tokio::task::JoinError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ErrorCode {
    RuntimeStartError               = 0400,
    HashThreadingIssue              = 0401,
    UnableToReadCredentials         = 0500,
    MongoDBError                    = 0501,
    InvalidBSON                     = 0502,
    InvalidJSON                     = 0503,
    InvalidConfig                   = 0504,
    HashingError                    = 0505,
    InvalidAlgorithmConfig          = 0506,
    InvalidPHCFormat                = 0507,
    UsernameMandatory               = 1000,
    UsernameTaken                   = 1001,
    PasswordTooShort                = 1002,
    PasswordMissingLetter           = 1003,
    PasswordMissingNumber           = 1004,
    InvalidEmail                    = 1005,
    AccountNotFound                 = 1100,
    AuthenticationFailed            = 2000,
    InvalidEventId                  = 3000,
    VoteTypeMandatory               = 3001,
    VoterMandatory                  = 3002,
    TimelineItemNotFound            = 3100,
}

impl ErrorCode {
    pub fn with_msg(&self, message: &str) -> ChronicleError {
        ChronicleError::new(*self, message)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChronicleError {
    error_code: ErrorCode,
    message: String,
}

impl ChronicleError {
    pub fn new(error_code: ErrorCode, message: &str) -> Self {
        ChronicleError { error_code, message: message.to_string() }
    }

    pub fn error_code(&self) -> ErrorCode {
        self.error_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ChronicleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04} {}", self.error_code as u32, self.message)
    }
}

impl std::error::Error for ChronicleError {}

impl From<argon2::Error> for ChronicleError {
    fn from(error: argon2::Error) -> Self {
        ErrorCode::InvalidAlgorithmConfig.with_msg(&format!("Invalid configuration for algorithm: {}", error))
    }
}

impl From<password_hash::Error> for ChronicleError {
    fn from(error: password_hash::Error) -> Self {
        ErrorCode::HashingError.with_msg(&format!("Unable to hash password: {}", error))
    }
}

impl From<BcryptError> for ChronicleError {
    fn from(error: BcryptError) -> Self {
        ErrorCode::InvalidAlgorithmConfig.with_msg(&format!("Unable to verify: {}", error))
    }
}

impl From<serde_json::Error> for ChronicleError {
    fn from(error: serde_json::Error) -> Self {
        ErrorCode::InvalidJSON.with_msg(&format!("Unable to convert to json: {}", error))
    }
}

impl From<ConfigError> for ChronicleError {
    fn from(error: ConfigError) -> Self {
        ErrorCode::InvalidConfig.with_msg(&format!("The service configuration is not correct: {}", error))
    }
}

impl From<mongodb::error::Error> for ChronicleError {
    fn from(error: mongodb::error::Error) -> Self {
        ErrorCode::MongoDBError.with_msg( &format!("MongoDB error: {}", error))
    }
}

impl From<bson::ser::Error> for ChronicleError {
    fn from(error: bson::ser::Error) -> Self {
        ErrorCode::InvalidBSON.with_msg(&format!("Unable to serialise BSON: {}", error))
    }
}

impl From<bson::de::Error> for ChronicleError {
    fn from(error: bson::de::Error) -> Self {
        ErrorCode::InvalidBSON.with_msg(&format!("Unable to deserialise BSON: {}", error))
    }
}

impl From<JoinError> for ChronicleError {
    fn from(error: JoinError) -> Self {
        ErrorCode::HashThreadingIssue.with_msg(&format!("Unable to hash: {}", error))
    }
}

impl ChronicleError {
    ///
    /// True if the error was caused by the caller's input rather than the service or its dependencies.
    ///
    pub fn is_caller_error(&self) -> bool {
        use ErrorCode::*;

        match self.error_code {
            RuntimeStartError       |
            HashThreadingIssue      |
            UnableToReadCredentials |
            MongoDBError            |
            InvalidBSON             |
            InvalidJSON             |
            InvalidConfig           |
            HashingError            |
            InvalidAlgorithmConfig  |
            InvalidPHCFormat        => false,

            UsernameMandatory       |
            UsernameTaken           |
            PasswordTooShort        |
            PasswordMissingLetter   |
            PasswordMissingNumber   |
            InvalidEmail            |
            AccountNotFound         |
            AuthenticationFailed    |
            InvalidEventId          |
            VoteTypeMandatory       |
            VoterMandatory          |
            TimelineItemNotFound    => true,
        }
    }
}
