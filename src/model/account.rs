use regex::Regex;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use super::algorithm;
use crate::utils::{self, errors::{ErrorCode, ChronicleError}};

pub const MIN_PASSWORD_LENGTH: usize = 12;

lazy_static! {
    // local@domain.tld where the tld is 2-4 letters.
    static ref EMAIL: Regex = Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,4}$")
        .expect("The email pattern is invalid");
}

///
/// A user account. The password is only ever held as a PHC string.
///
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: String,
    pub password: String,
    pub email: String,
    pub created: bson::DateTime,
}

///
/// The details supplied to register a new account.
///
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: String,
    pub password: String,
    pub email: String,
}

impl Account {
    ///
    /// Build the account to persist from validated registration details and a hashed password.
    ///
    pub fn new(details: NewAccount, phc: String, created: DateTime<Utc>) -> Self {
        Account {
            account_id: utils::generate_id(),
            first_name: details.first_name,
            last_name: details.last_name,
            username: details.username,
            password: phc,
            email: details.email,
            created: bson::DateTime::from_chrono(created),
        }
    }

    ///
    /// Check a candidate credential against the stored hash. Empty values never match.
    ///
    /// This is CPU-bound, call it from the blocking thread pool.
    ///
    pub fn password_is_valid(&self, candidate: &str) -> Result<bool, ChronicleError> {
        if self.password.is_empty() || candidate.is_empty() {
            return Ok(false)
        }

        algorithm::validate(candidate, &self.password)
    }
}

impl NewAccount {
    ///
    /// Check the registration details against the account constraints.
    ///
    pub fn validate(&self) -> Result<(), ChronicleError> {
        if self.username.trim().is_empty() {
            return Err(ErrorCode::UsernameMandatory.with_msg("a username is required"))
        }

        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ErrorCode::PasswordTooShort
                .with_msg(&format!("passwords must be at least {} characters", MIN_PASSWORD_LENGTH)))
        }

        if !self.password.chars().any(|c| c.is_ascii_alphabetic()) {
            return Err(ErrorCode::PasswordMissingLetter.with_msg("a password must contain at least one letter"))
        }

        if !self.password.chars().any(|c| c.is_ascii_digit()) {
            return Err(ErrorCode::PasswordMissingNumber.with_msg("a password must contain at least one number"))
        }

        if !EMAIL.is_match(&self.email) {
            return Err(ErrorCode::InvalidEmail.with_msg(&format!("'{}' is not a valid email address", self.email)))
        }

        Ok(())
    }
}
