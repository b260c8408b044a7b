//! Company information service

use crate::error::ApiError;
use crate::repositories::{CompanyRepository, UpsertCompany};
use hr_payroll_shared::validation::{
    validate_address, validate_company_name, validate_employee_count,
    validate_registration_number,
};
use hr_payroll_shared::{CompanyResponse, SaveCompanyRequest};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

pub struct CompanyService;

impl CompanyService {
    /// Validate and normalize a save request
    pub fn prepare(req: &SaveCompanyRequest) -> Result<UpsertCompany, ApiError> {
        validate_company_name(&req.name).map_err(ApiError::Validation)?;
        validate_registration_number(&req.registration_number).map_err(ApiError::Validation)?;
        validate_address(&req.address).map_err(ApiError::Validation)?;
        validate_employee_count(req.employee_count).map_err(ApiError::Validation)?;

        let industry = req
            .industry
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        if industry.as_deref().map_or(false, |s| s.chars().count() > 100) {
            return Err(ApiError::Validation("Industry too long".to_string()));
        }

        Ok(UpsertCompany {
            name: req.name.trim().to_string(),
            registration_number: req.registration_number.trim().to_uppercase(),
            address: req.address.trim().to_string(),
            industry,
            employee_count: req.employee_count,
            pay_frequency: req.pay_frequency.unwrap_or_default(),
        })
    }

    pub async fn save(
        pool: &PgPool,
        owner_id: Uuid,
        req: &SaveCompanyRequest,
    ) -> Result<CompanyResponse, ApiError> {
        let input = Self::prepare(req)?;
        let company = CompanyRepository::upsert(pool, owner_id, input)
            .await
            .map_err(ApiError::Internal)?;

        info!(company_id = %company.id, owner_id = %owner_id, "Company information saved");
        Ok(company.into())
    }

    pub async fn get(pool: &PgPool, owner_id: Uuid) -> Result<CompanyResponse, ApiError> {
        Self::find(pool, owner_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("No company registered".to_string()))
    }

    pub async fn find(pool: &PgPool, owner_id: Uuid) -> Result<Option<CompanyResponse>, ApiError> {
        let company = CompanyRepository::find_by_owner(pool, owner_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(company.map(CompanyResponse::from))
    }
}
