//! Password Service
//!
//! Salted Argon2id hashing. Hashes are stored as PHC strings, which carry
//! their own salt and parameters, so verification works across parameter
//! changes.

use argon2::password_hash::{
    rand_core::OsRng, Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier,
    SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::error::{PlatformError, Result};

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Config {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PasswordService {
    config: Argon2Config,
}

impl PasswordService {
    pub fn new(config: Argon2Config) -> Self {
        Self { config }
    }

    fn hasher(&self) -> Result<Argon2<'static>> {
        let params = Params::new(
            self.config.memory_kib,
            self.config.iterations,
            self.config.parallelism,
            None,
        )
        .map_err(|e| PlatformError::internal(format!("Invalid Argon2 parameters: {}", e)))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PlatformError::internal(format!("Password hashing failed: {}", e)))?;
        Ok(hash.to_string())
    }

    /// `Ok(false)` on mismatch; `Err` only if the stored hash is unusable.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| PlatformError::internal(format!("Stored password hash is invalid: {}", e)))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(e) => Err(PlatformError::internal(format!("Password verification failed: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> PasswordService {
        PasswordService::new(Argon2Config {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
    }

    #[test]
    fn test_hash_and_verify() {
        let svc = service();
        let hash = svc.hash_password("pw1").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(svc.verify_password("pw1", &hash).unwrap());
        assert!(!svc.verify_password("pw2", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let svc = service();
        let a = svc.hash_password("same").unwrap();
        let b = svc.hash_password("same").unwrap();
        assert_ne!(a, b);
        assert!(svc.verify_password("same", &a).unwrap());
        assert!(svc.verify_password("same", &b).unwrap());
    }

    #[test]
    fn test_verify_with_default_params_reads_hash_params() {
        let hash = service().hash_password("pw").unwrap();
        assert!(PasswordService::default().verify_password("pw", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_error() {
        assert!(service().verify_password("pw", "plaintext").is_err());
    }
}
