//! Dashboard aggregation

use crate::error::ApiError;
use crate::repositories::UserRepository;
use crate::services::{CompanyService, UserService};
use hr_payroll_shared::{DashboardResponse, Headcount};
use sqlx::PgPool;
use uuid::Uuid;

pub struct DashboardService;

impl DashboardService {
    /// Profile, company and headcount for the signed-in user
    pub async fn summary(pool: &PgPool, user_id: Uuid) -> Result<DashboardResponse, ApiError> {
        let user = UserService::get_profile(pool, user_id).await?;
        let company = CompanyService::find(pool, user_id).await?;
        let counts = UserRepository::count_by_role(pool)
            .await
            .map_err(ApiError::Internal)?;

        Ok(DashboardResponse {
            user,
            company,
            headcount: Headcount::from_counts(counts),
        })
    }
}
