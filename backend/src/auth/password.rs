//! Password hashing and verification
//!
//! New hashes are bcrypt in modular crypt format (`$2b$<cost>$<salt+digest>`),
//! so the cost and salt travel with the hash and verification needs nothing
//! else. Argon2 PHC strings (`$argon2id$...`) are also accepted on verify.
//!
//! # Performance Considerations
//!
//! Both algorithms are intentionally CPU-intensive. From async handlers use
//! [`PasswordService::hash_async`] / [`PasswordService::verify_async`], which
//! run on the blocking thread pool.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use hr_payroll_shared::validation::MAX_PASSWORD_BYTES;
use hr_payroll_shared::AuthError;

/// Work factor used when none is configured
pub const DEFAULT_COST: u32 = 10;
/// Lowest cost bcrypt accepts; handy in tests
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// Hash families recognised by [`PasswordService::verify`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashScheme {
    Bcrypt,
    Argon2,
}

impl HashScheme {
    /// Identify the scheme from the hash prefix
    pub fn detect(stored_hash: &str) -> Result<Self, AuthError> {
        if ["$2a$", "$2b$", "$2x$", "$2y$"]
            .iter()
            .any(|prefix| stored_hash.starts_with(prefix))
        {
            Ok(HashScheme::Bcrypt)
        } else if stored_hash.starts_with("$argon2") {
            Ok(HashScheme::Argon2)
        } else {
            Err(AuthError::MalformedHash)
        }
    }
}

/// Password hashing service
pub struct PasswordService;

impl PasswordService {
    /// Hash a password with bcrypt at the given cost (blocking operation)
    ///
    /// A fresh random salt is drawn on every call, so hashing the same
    /// password twice yields different strings. Passwords longer than
    /// [`MAX_PASSWORD_BYTES`] are refused rather than truncated.
    pub fn hash(password: &str, cost: u32) -> Result<String, AuthError> {
        if password.is_empty() {
            return Err(AuthError::EmptyPassword);
        }
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::PasswordTooLong {
                max: MAX_PASSWORD_BYTES,
            });
        }
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(AuthError::InvalidCost(cost));
        }
        bcrypt::hash(password, cost).map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Hash with [`DEFAULT_COST`]
    #[inline]
    pub fn hash_default(password: &str) -> Result<String, AuthError> {
        Self::hash(password, DEFAULT_COST)
    }

    /// Hash a password with Argon2id default parameters (blocking operation)
    pub fn hash_argon2(password: &str) -> Result<String, AuthError> {
        if password.is_empty() {
            return Err(AuthError::EmptyPassword);
        }
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// Returns `Ok(false)` on mismatch and `Err(MalformedHash)` when the
    /// stored hash cannot be parsed. An empty password never matches, and
    /// neither does one too long for bcrypt to have hashed in full.
    pub fn verify(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
        let scheme = HashScheme::detect(stored_hash)?;
        if password.is_empty() {
            return Ok(false);
        }

        match scheme {
            HashScheme::Bcrypt if password.len() > MAX_PASSWORD_BYTES => {
                // still reject a corrupt hash before answering
                bcrypt::verify("", stored_hash).map_err(|_| AuthError::MalformedHash)?;
                Ok(false)
            }
            HashScheme::Bcrypt => {
                // prefix, cost, salt and digest failures all surface here
                bcrypt::verify(password, stored_hash).map_err(|_| AuthError::MalformedHash)
            }
            HashScheme::Argon2 => {
                let parsed = PasswordHash::new(stored_hash).map_err(|_| AuthError::MalformedHash)?;
                match Argon2::default().verify_password(password.as_bytes(), &parsed) {
                    Ok(()) => Ok(true),
                    Err(argon2::password_hash::Error::Password) => Ok(false),
                    Err(_) => Err(AuthError::MalformedHash),
                }
            }
        }
    }

    /// Like [`verify`](Self::verify), but a mismatch is `InvalidCredentials`
    pub fn verify_credentials(password: &str, stored_hash: &str) -> Result<(), AuthError> {
        if Self::verify(password, stored_hash)? {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    /// Hash a password on the blocking thread pool
    pub async fn hash_async(password: String, cost: u32) -> Result<String, AuthError> {
        tokio::task::spawn_blocking(move || Self::hash(&password, cost))
            .await
            .map_err(|e| AuthError::Hashing(format!("Task join error: {}", e)))?
    }

    /// Verify a password on the blocking thread pool
    pub async fn verify_async(password: String, stored_hash: String) -> Result<bool, AuthError> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &stored_hash))
            .await
            .map_err(|e| AuthError::Hashing(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_hash_and_verify_default_cost() {
        let hash = PasswordService::hash_default("password123").unwrap();

        assert!(hash.starts_with("$2b$10$"));
        assert!(PasswordService::verify("password123", &hash).unwrap());
        assert!(!PasswordService::verify("wrongpass", &hash).unwrap());
    }

    #[test]
    fn test_hash_embeds_cost_and_salt() {
        let hash = PasswordService::hash("secure_password", MIN_COST).unwrap();

        assert_eq!(hash.len(), 60);
        assert!(hash.starts_with("$2b$04$"));
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let hash1 = PasswordService::hash("test_password", MIN_COST).unwrap();
        let hash2 = PasswordService::hash("test_password", MIN_COST).unwrap();

        // Random salt per call
        assert_ne!(hash1, hash2);
        assert!(PasswordService::verify("test_password", &hash1).unwrap());
        assert!(PasswordService::verify("test_password", &hash2).unwrap());
    }

    #[rstest]
    #[case(0)]
    #[case(3)]
    #[case(32)]
    fn test_cost_out_of_range_rejected(#[case] cost: u32) {
        assert_eq!(
            PasswordService::hash("password123", cost),
            Err(AuthError::InvalidCost(cost))
        );
    }

    #[test]
    fn test_empty_password() {
        assert_eq!(
            PasswordService::hash("", MIN_COST),
            Err(AuthError::EmptyPassword)
        );

        let hash = PasswordService::hash("password123", MIN_COST).unwrap();
        assert_eq!(PasswordService::verify("", &hash), Ok(false));
    }

    #[test]
    fn test_long_passwords_refused_not_truncated() {
        let prefix = "a".repeat(MAX_PASSWORD_BYTES);

        assert_eq!(
            PasswordService::hash(&format!("{}one", prefix), MIN_COST),
            Err(AuthError::PasswordTooLong { max: 72 })
        );

        let hash = PasswordService::hash(&prefix, MIN_COST).unwrap();
        assert!(PasswordService::verify(&prefix, &hash).unwrap());
        assert!(!PasswordService::verify(&format!("{}two", prefix), &hash).unwrap());
    }

    #[test]
    fn test_long_password_against_corrupt_hash_is_malformed() {
        let long = "b".repeat(MAX_PASSWORD_BYTES + 1);
        assert_eq!(
            PasswordService::verify(&long, "$2b$10$tooshort"),
            Err(AuthError::MalformedHash)
        );
    }

    #[rstest]
    #[case("")]
    #[case("not-a-hash")]
    #[case("password123")]
    #[case("$1$md5crypt$abcdefghijklmnopqrstuv")]
    #[case("$2b$10$tooshort")]
    #[case("$2b$99$abcdefghijklmnopqrstuuabcdefghijklmnopqrstuvwxyz01234")]
    #[case("$2b$10$!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!")]
    #[case("$argon2id$garbage")]
    fn test_malformed_hash_rejected(#[case] stored_hash: &str) {
        assert_eq!(
            PasswordService::verify("password123", stored_hash),
            Err(AuthError::MalformedHash)
        );
    }

    #[test]
    fn test_argon2_hashes_still_verify() {
        let hash = PasswordService::hash_argon2("legacy_password").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert_eq!(HashScheme::detect(&hash), Ok(HashScheme::Argon2));
        assert!(PasswordService::verify("legacy_password", &hash).unwrap());
        assert!(!PasswordService::verify("other_password", &hash).unwrap());
    }

    #[test]
    fn test_verify_credentials_maps_mismatch() {
        let hash = PasswordService::hash("password123", MIN_COST).unwrap();

        assert_eq!(PasswordService::verify_credentials("password123", &hash), Ok(()));
        assert_eq!(
            PasswordService::verify_credentials("wrongpass", &hash),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn test_async_hash_and_verify() {
        let password = "async_test_password".to_string();
        let hash = PasswordService::hash_async(password.clone(), MIN_COST)
            .await
            .unwrap();

        assert!(PasswordService::verify_async(password, hash.clone()).await.unwrap());
        assert!(!PasswordService::verify_async("wrong".to_string(), hash).await.unwrap());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_hash_then_verify_succeeds(password in "[ -~]{1,72}") {
            let hash = PasswordService::hash(&password, MIN_COST).unwrap();
            prop_assert!(PasswordService::verify(&password, &hash).unwrap());
        }

        #[test]
        fn prop_other_password_does_not_verify(
            password in "[a-z0-9]{8,32}",
            other in "[a-z0-9]{8,32}",
        ) {
            prop_assume!(password != other);
            let hash = PasswordService::hash(&password, MIN_COST).unwrap();
            prop_assert!(!PasswordService::verify(&other, &hash).unwrap());
        }

        #[test]
        fn prop_shared_long_prefix_does_not_cross_verify(
            prefix in "[a-z]{60,72}",
            tail in "[a-z0-9]{1,16}",
        ) {
            let stored = PasswordService::hash(&prefix, MIN_COST).unwrap();
            let longer = format!("{}{}", prefix, tail);

            prop_assert!(PasswordService::verify(&prefix, &stored).unwrap());
            prop_assert_eq!(PasswordService::verify(&longer, &stored), Ok(false));
        }
    }
}
