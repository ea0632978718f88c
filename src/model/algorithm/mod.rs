pub mod argon;
pub mod bcrypt;
pub mod pbkdf2;

use std::str::FromStr;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use crate::utils::errors::{ErrorCode, ChronicleError};

#[derive(Clone, Copy, Debug, Deserialize, Display, Serialize, PartialEq)]
pub enum Algorithm {
    Argon,
    BCrypt,
    PBKDF2,
}

impl Algorithm {
    ///
    /// Salt and hash the plain text credential with the default parameters for this algorithm.
    ///
    pub fn hash_into_phc(&self, plain_text_password: &str) -> Result<String, ChronicleError> {
        match self {
            Algorithm::Argon  => argon::ArgonPolicy::default().hash_into_phc(plain_text_password),
            Algorithm::BCrypt => bcrypt::BCryptPolicy::default().hash_into_phc(plain_text_password),
            Algorithm::PBKDF2 => pbkdf2::PBKDF2Policy::default().hash_into_phc(plain_text_password),
        }
    }
}

///
/// Validate if the plain_text_password matches the hashed password provided.
///
/// The algorithm is constructed and used from the PHC string provided.
///
pub fn validate(plain_text_password: &str, phc: &str) -> Result<bool, ChronicleError> {
    match select(phc)? {
        Algorithm::Argon  => argon::validate(phc, plain_text_password),
        Algorithm::BCrypt => bcrypt::validate(phc, plain_text_password),
        Algorithm::PBKDF2 => pbkdf2::validate(phc, plain_text_password),
    }
}

///
/// Parse the first part of the phc string and return the algorithm.
///
fn select(phc: &str) -> Result<Algorithm, ChronicleError> {
    let mut split = phc.split('$');

    // A PHC string starts with its separator so the first part must be blank.
    match (split.next(), split.next()) {
        (Some(""), Some(algorithm)) => Algorithm::from_str(algorithm),
        _ => Err(ErrorCode::InvalidPHCFormat.with_msg("The PHC is invalid, there's no algorithm")),
    }
}

impl FromStr for Algorithm {
    type Err = ChronicleError;

    fn from_str(input: &str) -> Result<Algorithm, Self::Err> {
        match input {
            "Argon"    |
            "argon2i"  |
            "argon2d"  |
            "argon2id" => Ok(Algorithm::Argon),

            "BCrypt" |
            "2a" |
            "2b" |
            "2x" |
            "2y" => Ok(Algorithm::BCrypt),

            "PBKDF2" |
            "pbkdf2-sha256" => Ok(Algorithm::PBKDF2),

            _ => Err(ErrorCode::InvalidPHCFormat.with_msg(&format!("algorithm {} is un-handled", input))),
        }
    }
}
