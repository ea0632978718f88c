use rand_core::OsRng;
use password_hash::SaltString;
use serde::{Deserialize, Serialize};
use crate::utils::errors::ChronicleError;

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub enum BCryptVersion {
    TwoA,
    TwoB,
    TwoX,
    TwoY
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BCryptPolicy {
    pub version: BCryptVersion,
    pub cost: u32
}

pub fn validate(phc: &str, plain_text_password: &str) -> Result<bool, ChronicleError> {
    Ok(bcrypt::verify(plain_text_password, phc)?)
}

impl Default for BCryptPolicy {
    fn default() -> Self {
        Self {
            version: BCryptVersion::TwoB,
            cost: bcrypt::DEFAULT_COST
        }
    }
}

impl BCryptPolicy {
    pub fn hash_into_phc(&self, plain_text_password: &str) -> Result<String, ChronicleError> {
        // Bcrypt takes exactly 16 salt bytes.
        let salt = SaltString::generate(&mut OsRng);
        let salt: String = salt.as_str().chars().take(16).collect();
        let hashed = bcrypt::hash_with_salt(plain_text_password, self.cost, salt.as_bytes())?;

        Ok(hashed.format_for_version(self.version.into()))
    }
}

impl From<BCryptVersion> for bcrypt::Version {
    fn from(version: BCryptVersion) -> Self {
        match version {
            BCryptVersion::TwoA => bcrypt::Version::TwoA,
            BCryptVersion::TwoB => bcrypt::Version::TwoB,
            BCryptVersion::TwoX => bcrypt::Version::TwoX,
            BCryptVersion::TwoY => bcrypt::Version::TwoY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_hash_and_verify() -> Result<(), ChronicleError> {
        let bcrypt = BCryptPolicy { cost: 4, ..BCryptPolicy::default() };
        let phc = bcrypt.hash_into_phc("wibble")?;

        assert!(phc.starts_with("$2b$04$"));
        assert_eq!(validate(&phc, "wibble")?, true);
        assert_eq!(validate(&phc, "wobble")?, false);
        Ok(())
    }

    #[test]
    fn test_legacy_version_prefix_verifies() -> Result<(), ChronicleError> {
        let bcrypt = BCryptPolicy { version: BCryptVersion::TwoA, cost: 4 };
        let phc = bcrypt.hash_into_phc("wibble")?;

        assert!(phc.starts_with("$2a$"));
        assert!(super::super::validate("wibble", &phc)?);
        Ok(())
    }
}
