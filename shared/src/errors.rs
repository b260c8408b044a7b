//! Error types for the HR Payroll Portal

use thiserror::Error;

/// Authentication error types
///
/// Covers both halves of the auth core: password hashing/verification and
/// token issuance/verification. None of these are fatal; the HTTP layer
/// decides the status code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Password did not match the stored hash
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Stored hash could not be parsed (unknown prefix, bad cost, bad encoding)
    #[error("Malformed password hash")]
    MalformedHash,

    /// Token signature does not match (tampered or signed with another key)
    #[error("Token signature is invalid")]
    SignatureInvalid,

    #[error("Token expired")]
    Expired,

    /// Signing secret is empty or was never configured
    #[error("Signing secret is missing")]
    MissingSecret,

    /// Token is not a well-formed JWT
    #[error("Malformed token")]
    MalformedToken,

    /// Access token presented where a refresh token is required, or vice versa
    #[error("Wrong token type: expected {expected}")]
    WrongTokenType { expected: String },

    #[error("Invalid hash cost: {0}")]
    InvalidCost(u32),

    #[error("Token time-to-live is out of range")]
    InvalidTtl,

    #[error("Password must not be empty")]
    EmptyPassword,

    /// bcrypt only reads the first 72 bytes, so longer input is refused
    #[error("Password must be at most {max} bytes")]
    PasswordTooLong { max: usize },

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token signing failed: {0}")]
    Signing(String),
}

impl AuthError {
    /// Whether the error comes from the caller's input (401) rather than
    /// from server configuration, stored data or a library failure (500).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials
                | AuthError::SignatureInvalid
                | AuthError::Expired
                | AuthError::MalformedToken
                | AuthError::WrongTokenType { .. }
                | AuthError::EmptyPassword
                | AuthError::PasswordTooLong { .. }
        )
    }
}
