//! Dashboard route

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::DashboardService;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use hr_payroll_shared::types::DashboardResponse;

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/", get(get_dashboard))
}

/// GET /api/v1/dashboard
async fn get_dashboard(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<Json<DashboardResponse>> {
    let summary = DashboardService::summary(&state.db, auth_user.user_id).await?;
    Ok(Json(summary))
}
