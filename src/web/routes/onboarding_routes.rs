use axum::{
    extract::{Extension, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::db::enums::Category;
use crate::db::models::OnboardingOutcome;
use crate::db::services::{onboarding_service, profile_service};
use crate::web::models::category_models::{CategorySelectionRequest, OnboardingStatus};
use crate::web::models::AuthenticatedUser;
use crate::web::{AppError, AppState};

async fn onboarding_status_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<OnboardingStatus>, AppError> {
    let profile = profile_service::get_profile(&app_state.db_pool, authenticated_user.id).await?;
    Ok(Json(OnboardingStatus {
        onboarding_completed: profile.onboarding_completed,
        profile: profile.into(),
    }))
}

async fn complete_onboarding_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CategorySelectionRequest>,
) -> Result<Json<OnboardingOutcome>, AppError> {
    let categories = Category::parse_list(&payload.categories).map_err(AppError::InvalidInput)?;
    let outcome =
        onboarding_service::complete_onboarding(&app_state.db_pool, authenticated_user.id, categories)
            .await?;
    Ok(Json(outcome))
}

pub fn create_onboarding_router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/",
        get(onboarding_status_handler).post(complete_onboarding_handler),
    )
}
