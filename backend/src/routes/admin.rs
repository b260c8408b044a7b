//! Administrative routes (admin role only)

use crate::auth::RequireAdmin;
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use hr_payroll_shared::types::{UpdateRoleRequest, UserProfile};
use tracing::info;
use uuid::Uuid;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id/role", put(update_role))
}

/// GET /api/v1/admin/users
async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> ApiResult<Json<Vec<UserProfile>>> {
    let users = UserService::list_profiles(&state.db).await?;
    info!(admin_id = %admin.user_id, count = users.len(), "Listed users");
    Ok(Json(users))
}

/// PUT /api/v1/admin/users/:id/role
///
/// Takes effect on the user's next login or refresh; tokens already issued
/// keep their old role until they expire.
async fn update_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpdateRoleRequest>,
) -> ApiResult<Json<UserProfile>> {
    let profile = UserService::change_role(&state.db, admin.user_id, user_id, req.role).await?;
    Ok(Json(profile))
}
