use rand_core::OsRng;
use std::convert::TryFrom;
use serde::{Deserialize, Serialize};
use argon2::{Argon2, Params, Version};
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use crate::utils::errors::ChronicleError;

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub enum ArgonHashType {
    ARGON2D,
    ARGON2I,
    ARGON2ID
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ArgonPolicy {
    pub parallelism: u32,
    pub tag_length: u32,
    pub memory_size_kb: u32,
    pub iterations: u32,
    pub version: u32,
    pub hash_type: ArgonHashType
}

///
/// Verify against an argon2 PHC. The variant and parameters are read from the PHC itself.
///
pub fn validate(phc: &str, plain_text_password: &str) -> Result<bool, ChronicleError> {
    let parsed_hash = PasswordHash::new(phc)?;
    Ok(Argon2::default().verify_password(plain_text_password.as_bytes(), &parsed_hash).is_ok())
}

impl Default for ArgonPolicy {
    fn default() -> Self {
        ArgonPolicy {
            parallelism: 1,
            tag_length: 32,
            memory_size_kb: 1024 * 16,
            iterations: 2,
            version: 19,
            hash_type: ArgonHashType::ARGON2ID
        }
    }
}

impl ArgonPolicy {
    pub fn hash_into_phc(&self, plain_text_password: &str) -> Result<String, ChronicleError> {
        let salt = SaltString::generate(&mut OsRng);

        let params = Params::new(
            self.memory_size_kb,
            self.iterations,
            self.parallelism,
            Some(self.tag_length as usize))?;

        let argon2 = Argon2::new(
            self.hash_type.into(),
            Version::try_from(self.version)?,
            params);

        // Hash password to PHC string ($argon2id$v=19$...)
        Ok(argon2.hash_password(plain_text_password.as_bytes(), &salt)?.to_string())
    }
}

impl From<ArgonHashType> for argon2::Algorithm {
    fn from(hash_type: ArgonHashType) -> Self {
        match hash_type {
            ArgonHashType::ARGON2D  => argon2::Algorithm::Argon2d,
            ArgonHashType::ARGON2I  => argon2::Algorithm::Argon2i,
            ArgonHashType::ARGON2ID => argon2::Algorithm::Argon2id,
        }
    }
}
