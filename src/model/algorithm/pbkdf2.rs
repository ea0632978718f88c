use rand_core::OsRng;
use pbkdf2::{Params, Pbkdf2};
use serde::{Deserialize, Serialize};
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, Salt, SaltString};
use crate::utils::errors::ChronicleError;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PBKDF2Policy {
    pub cost: u32,
    pub dk_len: u32, // Derived key length in bytes.
}

impl Default for PBKDF2Policy {
    fn default() -> Self {
        Self {
            cost: 10_000,
            dk_len: 32,
        }
    }
}

impl PBKDF2Policy {
    pub fn hash_into_phc(&self, plain_text_password: &str) -> Result<String, ChronicleError> {
        let salt = SaltString::generate(&mut OsRng);
        let salt = Salt::new(salt.as_str())?;
        let params = Params {
            rounds: self.cost,
            output_length: self.dk_len as usize,
        };

        // Hash password to PHC string ($pbkdf2-sha256$...)
        Ok(Pbkdf2.hash_password_customized(
            plain_text_password.as_bytes(),
            None,
            None,
            params,
            salt)?.to_string())
    }
}

pub fn validate(phc: &str, plain_text_password: &str) -> Result<bool, ChronicleError> {
    let parsed_hash = PasswordHash::new(phc)?;
    Ok(Pbkdf2.verify_password(plain_text_password.as_bytes(), &parsed_hash).is_ok())
}
