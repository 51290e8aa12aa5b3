use axum::{
    extract::{Extension, Path, Query, State},
    routing::{delete, get},
    Json, Router,
};
use std::sync::Arc;

use crate::db::enums::Category;
use crate::db::models::{CategoryInfo, CategorySummary, CategoryThoughts, CategoryUpdateOutcome};
use crate::db::services::{category_service, sample_thought_service};
use crate::web::models::category_models::{CategorySelectionRequest, ThoughtsQuery};
use crate::web::models::AuthenticatedUser;
use crate::web::{AppError, AppState};

fn parse_category(name: &str) -> Result<Category, AppError> {
    name.parse::<Category>().map_err(AppError::InvalidInput)
}

async fn catalog_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<CategoryInfo>>, AppError> {
    let catalog = category_service::catalog(&app_state.db_pool, authenticated_user.id).await?;
    Ok(Json(catalog))
}

async fn matrix_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<CategorySummary>>, AppError> {
    let matrix =
        category_service::categories_matrix(&app_state.db_pool, authenticated_user.id).await?;
    Ok(Json(matrix))
}

async fn add_categories_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CategorySelectionRequest>,
) -> Result<Json<CategoryUpdateOutcome>, AppError> {
    let categories = Category::parse_list(&payload.categories).map_err(AppError::InvalidInput)?;
    let outcome =
        category_service::add_categories(&app_state.db_pool, authenticated_user.id, categories)
            .await?;
    Ok(Json(outcome))
}

async fn replace_categories_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CategorySelectionRequest>,
) -> Result<Json<CategoryUpdateOutcome>, AppError> {
    let categories = Category::parse_list(&payload.categories).map_err(AppError::InvalidInput)?;
    let outcome = category_service::replace_categories(
        &app_state.db_pool,
        &app_state.image_storage,
        authenticated_user.id,
        categories,
    )
    .await?;
    Ok(Json(outcome))
}

async fn remove_category_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<CategoryUpdateOutcome>, AppError> {
    let category = parse_category(&name)?;
    let outcome = category_service::remove_category(
        &app_state.db_pool,
        &app_state.image_storage,
        authenticated_user.id,
        category,
    )
    .await?;
    Ok(Json(outcome))
}

async fn category_thoughts_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(query): Query<ThoughtsQuery>,
) -> Result<Json<CategoryThoughts>, AppError> {
    let category = parse_category(&name)?;
    let thoughts = category_service::category_thoughts(
        &app_state.db_pool,
        authenticated_user.id,
        category,
        query.q.as_deref(),
    )
    .await?;
    Ok(Json(thoughts))
}

async fn sample_thoughts_handler(
    State(app_state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    let category = parse_category(&name)?;
    let samples = sample_thought_service::get_sample_thoughts(&app_state.db_pool, category).await?;
    Ok(Json(samples))
}

pub fn create_category_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(catalog_handler)
                .post(add_categories_handler)
                .put(replace_categories_handler),
        )
        .route("/matrix", get(matrix_handler))
        .route("/{name}", delete(remove_category_handler))
        .route("/{name}/thoughts", get(category_thoughts_handler))
        .route("/{name}/samples", get(sample_thoughts_handler))
}
