//! JWT token generation and validation
//!
//! Tokens are HS256-signed JWTs in the usual compact form
//! (`header.payload.signature`, each base64url). Issuance and verification
//! are pure functions of their inputs plus the clock; the signing secret is
//! always passed in, never read from the environment.

use chrono::{DateTime, Duration, TimeZone, Utc};
use hr_payroll_shared::{AuthError, Role, User};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Token purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// Who a token speaks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub name: String,
    pub role: Role,
    pub token_type: TokenType,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.sub.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        timestamp_to_datetime(self.iat)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        timestamp_to_datetime(self.exp)
    }

    /// A token is live strictly before its expiry second
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

fn timestamp_to_datetime(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap_or_default()
}

/// Pre-computed JWT keys
///
/// Building the keys is where a missing secret is caught, so every signing
/// or verifying path goes through [`JwtKeys::new`].
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Result<Self, AuthError> {
        if secret.trim().is_empty() {
            return Err(AuthError::MissingSecret);
        }
        Ok(Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        })
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JwtKeys(..)")
    }
}

/// Issue an access token for `identity`, valid for `ttl` from now
pub fn issue(identity: &Identity, secret: &str, ttl: Duration) -> Result<String, AuthError> {
    let keys = JwtKeys::new(secret)?;
    issue_at(identity, TokenType::Access, &keys, ttl, Utc::now())
}

/// Verify a token against `secret` and return its claims
pub fn verify(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let keys = JwtKeys::new(secret)?;
    verify_at(token, &keys, Utc::now())
}

/// Issue a token as if the clock read `now`
pub fn issue_at(
    identity: &Identity,
    token_type: TokenType,
    keys: &JwtKeys,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    if ttl < Duration::zero() {
        return Err(AuthError::InvalidTtl);
    }
    let exp = now
        .checked_add_signed(ttl)
        .ok_or(AuthError::InvalidTtl)?;

    let claims = Claims {
        sub: identity.id.clone(),
        name: identity.name.clone(),
        role: identity.role,
        token_type,
        iat: now.timestamp(),
        exp: exp.timestamp(),
    };

    sign_claims(&claims, keys)
}

/// Sign an already-built set of claims
pub fn sign_claims(claims: &Claims, keys: &JwtKeys) -> Result<String, AuthError> {
    encode(&Header::new(Algorithm::HS256), claims, keys.encoding())
        .map_err(|e| AuthError::Signing(e.to_string()))
}

/// Verify a token as if the clock read `now`
///
/// The signature is checked before the payload is trusted; expiry is exact,
/// with no leeway.
pub fn verify_at(token: &str, keys: &JwtKeys, now: DateTime<Utc>) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(token, keys.decoding(), &validation())
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                AuthError::SignatureInvalid
            }
            ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::MalformedToken,
        })?;

    let claims = token_data.claims;
    if claims.is_expired_at(now) {
        return Err(AuthError::Expired);
    }
    Ok(claims)
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    // expiry is checked against the caller's clock in verify_at
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);
    validation
}

/// Longest lifetime a configured token may have (ten years)
pub const MAX_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Convert a configured lifetime in seconds into a [`Duration`]
///
/// Negative values and values above [`MAX_TTL_SECS`] are `InvalidTtl`.
pub fn ttl_from_secs(secs: i64) -> Result<Duration, AuthError> {
    if !(0..=MAX_TTL_SECS).contains(&secs) {
        return Err(AuthError::InvalidTtl);
    }
    Duration::try_seconds(secs).ok_or(AuthError::InvalidTtl)
}

/// Access and refresh token lifetimes
#[derive(Debug, Clone, Copy)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

impl TokenLifetimes {
    pub fn from_secs(access_secs: i64, refresh_secs: i64) -> Result<Self, AuthError> {
        Ok(Self {
            access: ttl_from_secs(access_secs)?,
            refresh: ttl_from_secs(refresh_secs)?,
        })
    }
}

/// JWT service for token operations
///
/// Holds pre-computed keys (behind `Arc`, cheap to clone) so handlers never
/// rebuild them per request.
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    lifetimes: TokenLifetimes,
}

impl JwtService {
    /// Create a new JWT service with pre-computed keys
    ///
    /// Fails with `MissingSecret` on an empty secret and `InvalidTtl` on a
    /// lifetime outside `0..=MAX_TTL_SECS`.
    pub fn new(
        secret: &str,
        access_token_expiry_secs: i64,
        refresh_token_expiry_secs: i64,
    ) -> Result<Self, AuthError> {
        let lifetimes =
            TokenLifetimes::from_secs(access_token_expiry_secs, refresh_token_expiry_secs)?;
        Ok(Self {
            keys: JwtKeys::new(secret)?,
            lifetimes,
        })
    }

    #[inline]
    pub fn generate_access_token(&self, identity: &Identity) -> Result<String, AuthError> {
        self.generate_token(identity, TokenType::Access, self.lifetimes.access)
    }

    #[inline]
    pub fn generate_refresh_token(&self, identity: &Identity) -> Result<String, AuthError> {
        self.generate_token(identity, TokenType::Refresh, self.lifetimes.refresh)
    }

    fn generate_token(
        &self,
        identity: &Identity,
        token_type: TokenType,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        issue_at(identity, token_type, &self.keys, ttl, Utc::now())
    }

    /// Validate a token of either type and return claims
    #[inline]
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        verify_at(token, &self.keys, Utc::now())
    }

    #[inline]
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_typed(token, TokenType::Access)
    }

    #[inline]
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_typed(token, TokenType::Refresh)
    }

    fn validate_typed(&self, token: &str, expected: TokenType) -> Result<Claims, AuthError> {
        let claims = self.validate_token(token)?;
        if claims.token_type != expected {
            return Err(AuthError::WrongTokenType {
                expected: expected.as_str().to_string(),
            });
        }
        Ok(claims)
    }

    #[inline]
    pub fn access_token_expiry_secs(&self) -> i64 {
        self.lifetimes.access.num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn admin() -> Identity {
        Identity {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            role: Role::Admin,
        }
    }

    fn create_test_service() -> JwtService {
        JwtService::new("test-secret", 3600, 604800).unwrap()
    }

    #[test]
    fn test_issue_then_verify_returns_claims() {
        let token = issue(&admin(), "secret", Duration::seconds(60)).unwrap();
        let claims = verify(&token, "secret").unwrap();

        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.name, "Ada");
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.exp - claims.iat, 60);
        assert_eq!(claims.identity(), admin());
    }

    #[test]
    fn test_token_has_three_segments() {
        let token = issue(&admin(), "secret", Duration::seconds(60)).unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'));
    }

    #[test]
    fn test_wrong_secret_is_signature_invalid() {
        let token = issue(&admin(), "secret", Duration::seconds(60)).unwrap();
        assert_eq!(
            verify(&token, "othersecret"),
            Err(AuthError::SignatureInvalid)
        );
    }

    #[test]
    fn test_missing_secret_fails_fast() {
        assert_eq!(
            issue(&admin(), "", Duration::seconds(60)),
            Err(AuthError::MissingSecret)
        );
        assert_eq!(
            issue(&admin(), "   ", Duration::seconds(60)),
            Err(AuthError::MissingSecret)
        );

        let token = issue(&admin(), "secret", Duration::seconds(60)).unwrap();
        assert_eq!(verify(&token, ""), Err(AuthError::MissingSecret));
    }

    #[test]
    fn test_expiry_is_exact() {
        let keys = JwtKeys::new("secret").unwrap();
        let now = Utc::now();
        let token = issue_at(&admin(), TokenType::Access, &keys, Duration::seconds(60), now)
            .unwrap();

        assert!(verify_at(&token, &keys, now + Duration::seconds(59)).is_ok());
        assert_eq!(
            verify_at(&token, &keys, now + Duration::seconds(60)),
            Err(AuthError::Expired)
        );
        assert_eq!(
            verify_at(&token, &keys, now + Duration::hours(2)),
            Err(AuthError::Expired)
        );
    }

    #[test]
    fn test_zero_ttl_is_already_expired() {
        let token = issue(&admin(), "secret", Duration::zero()).unwrap();
        assert_eq!(verify(&token, "secret"), Err(AuthError::Expired));
    }

    #[test]
    fn test_negative_ttl_rejected() {
        assert_eq!(
            issue(&admin(), "secret", Duration::seconds(-1)),
            Err(AuthError::InvalidTtl)
        );
        assert!(matches!(
            JwtService::new("secret", -5, 60),
            Err(AuthError::InvalidTtl)
        ));
    }

    #[test]
    fn test_oversized_ttl_rejected_at_construction() {
        for secs in [MAX_TTL_SECS + 1, i64::MAX / 1000 + 1, i64::MAX] {
            assert!(
                matches!(JwtService::new("secret", 60, secs), Err(AuthError::InvalidTtl)),
                "refresh ttl {}",
                secs
            );
            assert_eq!(ttl_from_secs(secs), Err(AuthError::InvalidTtl));
        }
    }

    #[test]
    fn test_longest_ttl_still_issues() {
        let service = JwtService::new("secret", 60, MAX_TTL_SECS).unwrap();

        let token = service.generate_refresh_token(&admin()).unwrap();
        let claims = service.validate_refresh_token(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, MAX_TTL_SECS);
    }

    #[test]
    fn test_tampered_payload_is_signature_invalid() {
        let admin_token = issue(&admin(), "secret", Duration::seconds(60)).unwrap();
        let employee = Identity {
            role: Role::Employee,
            ..admin()
        };
        let employee_token = issue(&employee, "secret", Duration::seconds(60)).unwrap();

        // employee's payload under the admin token's signature
        let a: Vec<&str> = admin_token.split('.').collect();
        let e: Vec<&str> = employee_token.split('.').collect();
        let forged = format!("{}.{}.{}", e[0], e[1], a[2]);

        assert_eq!(verify(&forged, "secret"), Err(AuthError::SignatureInvalid));
    }

    #[test]
    fn test_garbage_tokens_are_malformed() {
        for token in ["", "garbage", "invalid.token.here", "a.b", "a.b.c.d"] {
            assert_eq!(
                verify(token, "secret"),
                Err(AuthError::MalformedToken),
                "token {:?}",
                token
            );
        }
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let claims = Claims {
            sub: "u1".to_string(),
            name: "Ada".to_string(),
            role: Role::Admin,
            token_type: TokenType::Access,
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 60,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert_eq!(verify(&token, "secret"), Err(AuthError::SignatureInvalid));
    }

    #[test]
    fn test_missing_claim_is_malformed() {
        #[derive(Serialize)]
        struct Partial {
            sub: String,
            exp: i64,
        }
        let token = encode(
            &Header::default(),
            &Partial {
                sub: "u1".to_string(),
                exp: Utc::now().timestamp() + 60,
            },
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert_eq!(verify(&token, "secret"), Err(AuthError::MalformedToken));
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let service = create_test_service();

        let token = service.generate_access_token(&admin()).unwrap();
        let claims = service.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_generate_and_validate_refresh_token() {
        let service = create_test_service();

        let token = service.generate_refresh_token(&admin()).unwrap();
        let claims = service.validate_refresh_token(&token).unwrap();

        assert_eq!(claims.token_type, TokenType::Refresh);
        assert_eq!(claims.exp - claims.iat, 604800);
    }

    #[test]
    fn test_token_types_are_not_interchangeable() {
        let service = create_test_service();

        let access = service.generate_access_token(&admin()).unwrap();
        let refresh = service.generate_refresh_token(&admin()).unwrap();

        assert_eq!(
            service.validate_refresh_token(&access),
            Err(AuthError::WrongTokenType {
                expected: "refresh".to_string()
            })
        );
        assert_eq!(
            service.validate_access_token(&refresh),
            Err(AuthError::WrongTokenType {
                expected: "access".to_string()
            })
        );
    }

    #[test]
    fn test_service_rejects_missing_secret() {
        assert!(matches!(
            JwtService::new("", 3600, 604800),
            Err(AuthError::MissingSecret)
        ));
    }

    #[test]
    fn test_service_and_free_functions_agree() {
        let service = create_test_service();
        let token = service.generate_access_token(&admin()).unwrap();

        let claims = verify(&token, "test-secret").unwrap();
        assert_eq!(claims.identity(), admin());
    }

    #[test]
    fn test_claims_timestamps() {
        let keys = JwtKeys::new("secret").unwrap();
        let now = Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap();
        let token =
            issue_at(&admin(), TokenType::Access, &keys, Duration::minutes(15), now).unwrap();
        let claims = verify_at(&token, &keys, now).unwrap();

        assert_eq!(claims.issued_at(), now);
        assert_eq!(claims.expires_at(), now + Duration::minutes(15));
    }

    fn role_strategy() -> impl Strategy<Value = Role> {
        prop_oneof![Just(Role::Admin), Just(Role::Hr), Just(Role::Employee)]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_issue_then_verify_round_trips(
            id in "[a-zA-Z0-9-]{1,36}",
            name in "[a-zA-Z ]{1,40}",
            role in role_strategy(),
            ttl_secs in 1i64..86_400,
            secret in "[a-zA-Z0-9]{8,64}",
        ) {
            let keys = JwtKeys::new(&secret).unwrap();
            let now = Utc::now();
            let identity = Identity { id, name, role };
            let token = issue_at(&identity, TokenType::Access, &keys, Duration::seconds(ttl_secs), now).unwrap();

            let claims = verify_at(&token, &keys, now).unwrap();
            prop_assert_eq!(claims.identity(), identity);
            prop_assert_eq!(claims.exp - claims.iat, ttl_secs);
        }

        #[test]
        fn prop_other_secret_never_verifies(
            secret in "[a-z]{8,32}",
            other in "[a-z]{8,32}",
        ) {
            prop_assume!(secret != other);
            let token = issue(&admin(), &secret, Duration::seconds(60)).unwrap();
            prop_assert_eq!(verify(&token, &other), Err(AuthError::SignatureInvalid));
        }
    }
}
