//! Company repository for database operations

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use hr_payroll_shared::{Company, PayFrequency};
use sqlx::PgPool;
use uuid::Uuid;

/// Company record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CompanyRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub registration_number: String,
    pub address: String,
    pub industry: Option<String>,
    pub employee_count: i32,
    pub pay_frequency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<CompanyRecord> for Company {
    type Error = anyhow::Error;

    fn try_from(record: CompanyRecord) -> Result<Self> {
        let pay_frequency: PayFrequency = record
            .pay_frequency
            .parse()
            .map_err(|e| anyhow!("Corrupt pay frequency for company {}: {}", record.id, e))?;

        Ok(Company {
            id: record.id,
            owner_id: record.owner_id,
            name: record.name,
            registration_number: record.registration_number,
            address: record.address,
            industry: record.industry,
            employee_count: record.employee_count,
            pay_frequency,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// Input for creating or replacing a company
#[derive(Debug, Clone)]
pub struct UpsertCompany {
    pub name: String,
    pub registration_number: String,
    pub address: String,
    pub industry: Option<String>,
    pub employee_count: i32,
    pub pay_frequency: PayFrequency,
}

/// Company repository for database operations
pub struct CompanyRepository;

impl CompanyRepository {
    pub async fn find_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Option<Company>> {
        let record = sqlx::query_as::<_, CompanyRecord>(
            r#"
            SELECT id, owner_id, name, registration_number, address, industry,
                   employee_count, pay_frequency, created_at, updated_at
            FROM companies
            WHERE owner_id = $1
            "#,
        )
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        record.map(Company::try_from).transpose()
    }

    /// Insert the owner's company, or overwrite it if one exists
    pub async fn upsert(pool: &PgPool, owner_id: Uuid, input: UpsertCompany) -> Result<Company> {
        let record = sqlx::query_as::<_, CompanyRecord>(
            r#"
            INSERT INTO companies
                (owner_id, name, registration_number, address, industry, employee_count, pay_frequency)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (owner_id) DO UPDATE SET
                name = EXCLUDED.name,
                registration_number = EXCLUDED.registration_number,
                address = EXCLUDED.address,
                industry = EXCLUDED.industry,
                employee_count = EXCLUDED.employee_count,
                pay_frequency = EXCLUDED.pay_frequency,
                updated_at = NOW()
            RETURNING id, owner_id, name, registration_number, address, industry,
                      employee_count, pay_frequency, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(input.name)
        .bind(input.registration_number)
        .bind(input.address)
        .bind(input.industry)
        .bind(input.employee_count)
        .bind(input.pay_frequency.as_str())
        .fetch_one(pool)
        .await?;

        record.try_into()
    }
}
