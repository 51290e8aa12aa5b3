use axum::{
    extract::{Extension, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::db::models::Profile;
use crate::db::services::profile_service;
use crate::web::models::category_models::UpdateProfileRequest;
use crate::web::models::AuthenticatedUser;
use crate::web::{AppError, AppState};

async fn get_profile_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Profile>, AppError> {
    let profile = profile_service::get_profile(&app_state.db_pool, authenticated_user.id).await?;
    Ok(Json(profile.into()))
}

async fn update_profile_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    let profile =
        profile_service::update_profile(&app_state.db_pool, authenticated_user.id, payload).await?;
    Ok(Json(profile.into()))
}

pub fn create_profile_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(get_profile_handler).put(update_profile_handler))
}
