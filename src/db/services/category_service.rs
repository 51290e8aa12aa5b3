use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use tracing::info;

use crate::db::entities::flashcard;
use crate::db::enums::Category;
use crate::db::models::{CategoryInfo, CategorySummary, CategoryThoughts, CategoryUpdateOutcome, Flashcard};
use crate::db::services::sample_thought_service::{self, SampleBatch};
use crate::db::services::{flashcard_service, profile_service};
use crate::services::image_storage::ImageStorage;
use crate::web::error::AppError;

/// The full catalog, flagged with the caller's selection.
pub async fn catalog(db: &DatabaseConnection, user_id: i32) -> Result<Vec<CategoryInfo>, AppError> {
    let profile = profile_service::get_profile(db, user_id).await?;
    Ok(Category::ALL
        .into_iter()
        .map(|category| CategoryInfo {
            name: category,
            emoji: category.emoji().to_string(),
            description: category.description().to_string(),
            selected: profile.selected_categories.contains(category),
        })
        .collect())
}

/// One summary per selected category, in selection order.
pub async fn build_matrix<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    selection: &[Category],
) -> Result<Vec<CategorySummary>, AppError> {
    let mut summaries = Vec::with_capacity(selection.len());
    for &category in selection {
        let (thought_count, last_updated) =
            flashcard_service::category_stats(conn, user_id, category).await?;
        summaries.push(CategorySummary {
            name: category,
            emoji: category.emoji().to_string(),
            description: category.description().to_string(),
            thought_count,
            last_updated,
        });
    }
    Ok(summaries)
}

pub async fn categories_matrix(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<CategorySummary>, AppError> {
    let profile = profile_service::get_profile(db, user_id).await?;
    build_matrix(db, user_id, &profile.selected_categories.0).await
}

/// The caller's thoughts in a category plus its sample thoughts, filtered by `query`.
pub async fn category_thoughts(
    db: &DatabaseConnection,
    user_id: i32,
    category: Category,
    query: Option<&str>,
) -> Result<CategoryThoughts, AppError> {
    let query = query.unwrap_or_default();
    let thoughts = flashcard_service::list_in_category(db, user_id, category)
        .await?
        .into_iter()
        .filter(|card| matches_query(&card.content, query))
        .map(Flashcard::from)
        .collect();
    let sample_thoughts = sample_thought_service::get_sample_thoughts(db, category)
        .await?
        .into_iter()
        .filter(|content| matches_query(content, query))
        .collect();

    Ok(CategoryThoughts {
        category,
        emoji: category.emoji().to_string(),
        thoughts,
        sample_thoughts,
    })
}

/// "Add" mode: only categories not yet selected are added and seeded.
pub async fn add_categories(
    db: &DatabaseConnection,
    user_id: i32,
    requested: Vec<Category>,
) -> Result<CategoryUpdateOutcome, AppError> {
    let samples = SampleBatch::fetch(db, &requested).await;
    let txn = db.begin().await?;
    let profile = profile_service::get_profile(&txn, user_id).await?;

    let new_categories: Vec<Category> = requested
        .into_iter()
        .filter(|category| !profile.selected_categories.contains(*category))
        .collect();
    if new_categories.is_empty() {
        return Err(AppError::InvalidInput(
            "Please select at least one new category".to_string(),
        ));
    }

    let seeded = sample_thought_service::seed_user_flashcards(&txn, user_id, &samples, &new_categories).await?;
    let mut selection = profile.selected_categories.0.clone();
    selection.extend(new_categories.iter().copied());
    let profile = profile_service::save_selection(&txn, profile, selection, None).await?;
    let categories = build_matrix(&txn, user_id, &profile.selected_categories.0).await?;
    txn.commit().await?;

    info!(user_id, added = new_categories.len(), seeded, "Added categories.");
    Ok(CategoryUpdateOutcome {
        profile: profile.into(),
        categories,
        sample_thoughts_added: seeded,
        flashcards_removed: 0,
        message: format!(
            "Added {} categories with {} sample thoughts!",
            new_categories.len(),
            seeded
        ),
    })
}

/// "Manage" mode: the request becomes the whole selection. Newly selected categories are
/// seeded, deselected ones are removed together with their flashcards.
pub async fn replace_categories(
    db: &DatabaseConnection,
    storage: &ImageStorage,
    user_id: i32,
    requested: Vec<Category>,
) -> Result<CategoryUpdateOutcome, AppError> {
    if requested.is_empty() {
        return Err(AppError::InvalidInput(
            "Please select at least one category".to_string(),
        ));
    }

    let samples = SampleBatch::fetch(db, &requested).await;
    let txn = db.begin().await?;
    let profile = profile_service::get_profile(&txn, user_id).await?;

    let added: Vec<Category> = requested
        .iter()
        .copied()
        .filter(|category| !profile.selected_categories.contains(*category))
        .collect();
    let dropped: Vec<Category> = profile
        .selected_categories
        .0
        .iter()
        .copied()
        .filter(|category| !requested.contains(category))
        .collect();

    let seeded = sample_thought_service::seed_user_flashcards(&txn, user_id, &samples, &added).await?;
    let mut removed_cards = Vec::new();
    for &category in &dropped {
        removed_cards.extend(flashcard_service::delete_in_category(&txn, user_id, category).await?);
    }
    let profile = profile_service::save_selection(&txn, profile, requested, None).await?;
    let categories = build_matrix(&txn, user_id, &profile.selected_categories.0).await?;
    txn.commit().await?;

    remove_images(storage, &removed_cards).await;
    info!(
        user_id,
        added = added.len(),
        dropped = dropped.len(),
        seeded,
        removed = removed_cards.len(),
        "Replaced category selection."
    );
    Ok(CategoryUpdateOutcome {
        message: format!(
            "Saved {} categories with {} new sample thoughts!",
            profile.selected_categories.0.len(),
            seeded
        ),
        profile: profile.into(),
        categories,
        sample_thoughts_added: seeded,
        flashcards_removed: removed_cards.len() as u64,
    })
}

/// Removes a selected category and every flashcard filed under it.
pub async fn remove_category(
    db: &DatabaseConnection,
    storage: &ImageStorage,
    user_id: i32,
    category: Category,
) -> Result<CategoryUpdateOutcome, AppError> {
    let txn = db.begin().await?;
    let profile = profile_service::get_profile(&txn, user_id).await?;
    if !profile.selected_categories.contains(category) {
        return Err(AppError::NotFound(format!("Category {category} is not selected")));
    }

    let removed_cards = flashcard_service::delete_in_category(&txn, user_id, category).await?;
    let selection: Vec<Category> = profile
        .selected_categories
        .0
        .iter()
        .copied()
        .filter(|selected| *selected != category)
        .collect();
    let profile = profile_service::save_selection(&txn, profile, selection, None).await?;
    let categories = build_matrix(&txn, user_id, &profile.selected_categories.0).await?;
    txn.commit().await?;

    remove_images(storage, &removed_cards).await;
    info!(user_id, category = %category, removed = removed_cards.len(), "Removed category.");
    Ok(CategoryUpdateOutcome {
        profile: profile.into(),
        categories,
        sample_thoughts_added: 0,
        flashcards_removed: removed_cards.len() as u64,
        message: format!("Removed {} and {} thoughts", category, removed_cards.len()),
    })
}

/// Case-insensitive substring match; a blank query matches everything.
pub fn matches_query(text: &str, query: &str) -> bool {
    let query = query.trim();
    query.is_empty() || text.to_lowercase().contains(&query.to_lowercase())
}

async fn remove_images(storage: &ImageStorage, cards: &[flashcard::Model]) {
    for card in cards {
        if let Some(url) = card.image_url.as_deref() {
            storage.remove_by_url(card.user_id, url).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_query() {
        assert!(matches_query("Amor Fati", ""));
        assert!(matches_query("Amor Fati", "   "));
        assert!(matches_query("Amor Fati", "fati"));
        assert!(matches_query("Amor Fati", " AMOR "));
        assert!(!matches_query("Amor Fati", "memento"));
    }
}
