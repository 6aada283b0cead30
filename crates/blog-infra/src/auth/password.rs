//! Argon2 password hashing implementation.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use blog_core::ports::{AuthError, PasswordService};

/// Argon2id password service producing PHC-format hash strings.
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    /// Service with the crate's recommended default cost.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Service with explicit memory (KiB), iteration and parallelism costs.
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, AuthError> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| AuthError::HashingError(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }

    // Parameters are read from the stored hash, so hashes made with other
    // costs still verify.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Argon2PasswordService {
        Argon2PasswordService::with_params(1024, 1, 1).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let service = cheap();
        let hash = service.hash("correct horse").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(service.verify("correct horse", &hash).unwrap());
        assert!(!service.verify("wrong horse", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let service = cheap();

        assert_ne!(service.hash("same").unwrap(), service.hash("same").unwrap());
    }

    #[test]
    fn test_verifies_hash_made_with_other_cost() {
        let hash = Argon2PasswordService::new().hash("pw").unwrap();

        assert!(cheap().verify("pw", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(matches!(
            cheap().verify("pw", "not-a-phc-string"),
            Err(AuthError::HashingError(_))
        ));
    }

    #[test]
    fn test_invalid_params() {
        assert!(Argon2PasswordService::with_params(1, 0, 1).is_err());
    }
}
