//! User service for authentication and user management
//!
//! Password hashing/verification runs on the blocking thread pool; the JWT
//! service is passed by reference so its pre-computed keys are reused.

use crate::auth::{Identity, JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::{CreateUser, UserRepository};
use hr_payroll_shared::validation::{normalize_email, validate_name, validate_password};
use hr_payroll_shared::{AuthError, AuthTokens, RegisterRequest, Role, User, UserProfile};
use sqlx::PgPool;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::ValidateEmail;

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Check a registration request before touching the database
    ///
    /// Self-registration only ever creates employees; admin and HR roles are
    /// granted afterwards by an admin.
    pub fn validate_registration(req: &RegisterRequest) -> Result<String, ApiError> {
        if req.role.map_or(false, |role| role != Role::Employee) {
            return Err(ApiError::Forbidden(
                "Self-registration is limited to the employee role".to_string(),
            ));
        }
        let email = normalize_email(&req.email);
        if !email.validate_email() {
            return Err(ApiError::Validation("Invalid email format".to_string()));
        }
        validate_password(&req.password).map_err(ApiError::Validation)?;
        validate_name(&req.name).map_err(ApiError::Validation)?;
        Ok(email)
    }

    /// Register a new user
    pub async fn register(
        pool: &PgPool,
        jwt_service: &JwtService,
        bcrypt_cost: u32,
        req: &RegisterRequest,
    ) -> Result<AuthTokens, ApiError> {
        let email = Self::validate_registration(req)?;

        if UserRepository::email_exists(pool, &email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let password_hash = PasswordService::hash_async(req.password.clone(), bcrypt_cost).await?;

        let user = UserRepository::create(
            pool,
            CreateUser {
                email: &email,
                name: req.name.trim(),
                password_hash: &password_hash,
                role: Role::Employee,
            },
        )
        .await
        .map_err(|e| {
            // a concurrent registration won the race past email_exists
            if is_unique_violation(&e) {
                ApiError::Conflict("Email already registered".to_string())
            } else {
                ApiError::Internal(e)
            }
        })?;

        info!(user_id = %user.id, role = %user.role, "User registered");
        Self::issue_tokens(jwt_service, &user)
    }

    /// Login with email and password
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(
        pool: &PgPool,
        jwt_service: &JwtService,
        email: &str,
        password: &str,
    ) -> Result<AuthTokens, ApiError> {
        let email = normalize_email(email);
        let user = match UserRepository::find_by_email(pool, &email)
            .await
            .map_err(ApiError::Internal)?
        {
            Some(user) => user,
            None => {
                warn!("Login attempt for unknown email");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        let valid = PasswordService::verify_async(password.to_string(), user.password_hash.clone())
            .await
            .map_err(|e| {
                if e == AuthError::MalformedHash {
                    error!(user_id = %user.id, "Stored password hash is malformed");
                }
                ApiError::from(e)
            })?;

        if !valid {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        info!(user_id = %user.id, "User logged in");
        Self::issue_tokens(jwt_service, &user)
    }

    /// Exchange a refresh token for a new token pair
    ///
    /// Name and role come from the database, so changes made since the
    /// refresh token was issued are picked up.
    pub async fn refresh_token(
        pool: &PgPool,
        jwt_service: &JwtService,
        refresh_token: &str,
    ) -> Result<AuthTokens, ApiError> {
        let claims = jwt_service.validate_refresh_token(refresh_token)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::Unauthorized("Invalid user ID in token".to_string()))?;

        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

        Self::issue_tokens(jwt_service, &user)
    }

    pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<UserProfile, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(UserProfile::from(&user))
    }

    pub async fn list_profiles(pool: &PgPool) -> Result<Vec<UserProfile>, ApiError> {
        let users = UserRepository::list(pool)
            .await
            .map_err(ApiError::Internal)?;

        Ok(users.iter().map(UserProfile::from).collect())
    }

    /// Grant `role` to another user (admin only at the route level)
    pub async fn change_role(
        pool: &PgPool,
        admin_id: Uuid,
        user_id: Uuid,
        role: Role,
    ) -> Result<UserProfile, ApiError> {
        if admin_id == user_id && role != Role::Admin {
            return Err(ApiError::Validation(
                "Admins cannot demote themselves".to_string(),
            ));
        }

        let user = UserRepository::update_role(pool, user_id, role)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        info!(admin_id = %admin_id, user_id = %user.id, role = %role, "User role changed");
        Ok(UserProfile::from(&user))
    }

    /// Build an access/refresh pair for `user`
    pub fn issue_tokens(jwt_service: &JwtService, user: &User) -> Result<AuthTokens, ApiError> {
        let identity = Identity::from(user);
        Ok(AuthTokens {
            access_token: jwt_service.generate_access_token(&identity)?,
            refresh_token: jwt_service.generate_refresh_token(&identity)?,
            token_type: "Bearer".to_string(),
            expires_in: jwt_service.access_token_expiry_secs(),
        })
    }
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map_or(false, |db| db.is_unique_violation())
}
