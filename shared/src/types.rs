//! API request and response types

use crate::models::{Company, PayFrequency, Role, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Authentication tokens response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    /// Only `employee` is accepted; omitted means `employee`
    #[serde(default)]
    pub role: Option<Role>,
}

/// Admin request to change a user's role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

/// Refresh token request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// User profile response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Decoded claims of a verified bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyTokenResponse {
    pub valid: bool,
    pub user_id: String,
    pub name: String,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

// ============================================================================
// Company Types
// ============================================================================

/// Create or update the caller's company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveCompanyRequest {
    pub name: String,
    pub registration_number: String,
    pub address: String,
    #[serde(default)]
    pub industry: Option<String>,
    pub employee_count: i32,
    #[serde(default)]
    pub pay_frequency: Option<PayFrequency>,
}

/// Company information response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyResponse {
    pub id: String,
    pub name: String,
    pub registration_number: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    pub employee_count: i32,
    pub pay_frequency: PayFrequency,
    pub pay_periods_per_year: u32,
    pub updated_at: DateTime<Utc>,
}

impl From<Company> for CompanyResponse {
    fn from(company: Company) -> Self {
        Self {
            id: company.id.to_string(),
            name: company.name,
            registration_number: company.registration_number,
            address: company.address,
            industry: company.industry,
            employee_count: company.employee_count,
            pay_periods_per_year: company.pay_frequency.periods_per_year(),
            pay_frequency: company.pay_frequency,
            updated_at: company.updated_at,
        }
    }
}

// ============================================================================
// Dashboard Types
// ============================================================================

/// Number of registered users per role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headcount {
    pub total: i64,
    pub admins: i64,
    pub hr: i64,
    pub employees: i64,
}

impl Headcount {
    /// Build from `(role, count)` rows
    pub fn from_counts<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (Role, i64)>,
    {
        rows.into_iter().fold(Self::default(), |mut acc, (role, count)| {
            acc.total += count;
            match role {
                Role::Admin => acc.admins += count,
                Role::Hr => acc.hr += count,
                Role::Employee => acc.employees += count,
            }
            acc
        })
    }
}

/// Dashboard payload for the signed-in user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub user: UserProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyResponse>,
    pub headcount: Headcount,
}
