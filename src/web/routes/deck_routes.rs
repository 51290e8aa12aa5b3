use axum::{
    extract::{Extension, Query, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::db::models::Flashcard;
use crate::db::services::flashcard_service;
use crate::deck::DeckCursor;
use crate::web::models::flashcard_models::{DeckQuery, DeckView};
use crate::web::models::AuthenticatedUser;
use crate::web::{AppError, AppState};

fn deck_view(mut cards: Vec<Flashcard>, cursor: DeckCursor) -> DeckView {
    let card = if cursor.is_empty() {
        None
    } else {
        Some(cards.swap_remove(cursor.index()))
    };
    DeckView {
        card,
        index: cursor.index(),
        total: cursor.len(),
        next_index: cursor.next().index(),
        previous_index: cursor.previous().index(),
        progress: cursor.progress(),
    }
}

async fn view_deck_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<DeckQuery>,
) -> Result<Json<DeckView>, AppError> {
    let cards: Vec<Flashcard> =
        flashcard_service::list_flashcards(&app_state.db_pool, authenticated_user.id)
            .await?
            .into_iter()
            .map(Flashcard::from)
            .collect();
    let cursor = DeckCursor::at(query.index, cards.len());
    Ok(Json(deck_view(cards, cursor)))
}

/// Deletes the card under the cursor and returns the view at the adjusted position.
async fn remove_current_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<DeckQuery>,
) -> Result<Json<DeckView>, AppError> {
    let mut cards: Vec<Flashcard> =
        flashcard_service::list_flashcards(&app_state.db_pool, authenticated_user.id)
            .await?
            .into_iter()
            .map(Flashcard::from)
            .collect();
    let cursor = DeckCursor::at(query.index, cards.len());
    if cursor.is_empty() {
        return Err(AppError::NotFound("There are no flashcards to remove".to_string()));
    }

    let removed = cards.remove(cursor.index());
    flashcard_service::delete_flashcard(
        &app_state.db_pool,
        &app_state.image_storage,
        authenticated_user.id,
        removed.id,
    )
    .await?;

    Ok(Json(deck_view(cards, cursor.after_removal())))
}

pub fn create_deck_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(view_deck_handler).delete(remove_current_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn card(content: &str) -> Flashcard {
        Flashcard {
            id: Uuid::new_v4(),
            content: content.to_string(),
            image: None,
            category: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_deck_view_picks_card_under_cursor() {
        let cards = vec![card("a"), card("b"), card("c")];
        let view = deck_view(cards, DeckCursor::at(2, 3));

        assert_eq!(view.card.map(|c| c.content).as_deref(), Some("c"));
        assert_eq!(view.next_index, 0);
        assert_eq!(view.previous_index, 1);
        assert_eq!(view.total, 3);
        assert_eq!(view.progress, 100.0);
    }

    #[test]
    fn test_empty_deck_view() {
        let view = deck_view(Vec::new(), DeckCursor::at(4, 0));
        assert!(view.card.is_none());
        assert_eq!((view.index, view.total, view.progress), (0, 0, 0.0));
    }
}
