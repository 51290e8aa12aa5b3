use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::models::Flashcard;
use crate::db::services::flashcard_service;
use crate::web::models::flashcard_models::{CreateFlashcardRequest, UpdateFlashcardRequest};
use crate::web::models::AuthenticatedUser;
use crate::web::{AppError, AppState};

async fn list_flashcards_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<Flashcard>>, AppError> {
    let cards = flashcard_service::list_flashcards(&app_state.db_pool, authenticated_user.id).await?;
    Ok(Json(cards.into_iter().map(Flashcard::from).collect()))
}

async fn create_flashcard_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateFlashcardRequest>,
) -> Result<(StatusCode, Json<Flashcard>), AppError> {
    let card = flashcard_service::create_flashcard(
        &app_state.db_pool,
        &app_state.image_storage,
        authenticated_user.id,
        payload,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(card.into())))
}

async fn get_flashcard_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Flashcard>, AppError> {
    let card = flashcard_service::get_flashcard(&app_state.db_pool, authenticated_user.id, id).await?;
    Ok(Json(card.into()))
}

async fn update_flashcard_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateFlashcardRequest>,
) -> Result<Json<Flashcard>, AppError> {
    let card = flashcard_service::update_flashcard(
        &app_state.db_pool,
        &app_state.image_storage,
        authenticated_user.id,
        id,
        payload,
    )
    .await?;
    Ok(Json(card.into()))
}

async fn delete_flashcard_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    flashcard_service::delete_flashcard(
        &app_state.db_pool,
        &app_state.image_storage,
        authenticated_user.id,
        id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn create_flashcard_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_flashcards_handler).post(create_flashcard_handler))
        .route(
            "/{id}",
            get(get_flashcard_handler)
                .put(update_flashcard_handler)
                .delete(delete_flashcard_handler),
        )
}
