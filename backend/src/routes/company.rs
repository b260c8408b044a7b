//! Company information routes
//!
//! Any authenticated user may read their company record; only admin and
//! HR users may create or change it.

use crate::auth::{AuthUser, RequireCompanyManager};
use crate::error::ApiResult;
use crate::services::CompanyService;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use hr_payroll_shared::types::{CompanyResponse, SaveCompanyRequest};

pub fn company_routes() -> Router<AppState> {
    Router::new().route("/", get(get_company).put(save_company))
}

/// GET /api/v1/company
async fn get_company(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<Json<CompanyResponse>> {
    let company = CompanyService::get(&state.db, auth_user.user_id).await?;
    Ok(Json(company))
}

/// PUT /api/v1/company
async fn save_company(
    State(state): State<AppState>,
    RequireCompanyManager(auth_user): RequireCompanyManager,
    Json(req): Json<SaveCompanyRequest>,
) -> ApiResult<Json<CompanyResponse>> {
    let company = CompanyService::save(&state.db, auth_user.user_id, &req).await?;
    Ok(Json(company))
}
