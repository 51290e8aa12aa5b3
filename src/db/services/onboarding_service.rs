use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::info;

use crate::db::enums::Category;
use crate::db::models::OnboardingOutcome;
use crate::db::services::sample_thought_service::{self, SampleBatch};
use crate::db::services::profile_service;
use crate::web::error::AppError;

/// Finishes the first-run flow: seeds the chosen categories, stores the selection and
/// marks onboarding as completed, all in one transaction. Sample thoughts are read
/// before the transaction so a failed lookup cannot abort it.
pub async fn complete_onboarding(
    db: &DatabaseConnection,
    user_id: i32,
    categories: Vec<Category>,
) -> Result<OnboardingOutcome, AppError> {
    let samples = SampleBatch::fetch(db, &categories).await;
    let txn = db.begin().await?;
    let profile = profile_service::get_profile(&txn, user_id).await?;
    if profile.onboarding_completed {
        return Err(AppError::Conflict("Onboarding has already been completed.".to_string()));
    }

    let seeded = sample_thought_service::seed_user_flashcards(&txn, user_id, &samples, &categories).await?;
    let category_count = categories.len();
    let profile = profile_service::save_selection(&txn, profile, categories, Some(true)).await?;
    txn.commit().await?;

    info!(user_id, categories = category_count, seeded, "Completed onboarding.");
    Ok(OnboardingOutcome {
        profile: profile.into(),
        sample_thoughts_added: seeded,
        message: onboarding_message(category_count, seeded),
    })
}

fn onboarding_message(category_count: usize, seeded: usize) -> String {
    if category_count > 0 {
        format!("Added {seeded} sample thoughts from {category_count} categories!")
    } else {
        "Welcome! You can start creating your own thoughts.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};

    use crate::db::entities::user;

    async fn user_with_profile(db: &DatabaseConnection) -> i32 {
        let now = Utc::now();
        let user = user::ActiveModel {
            username: Set("ada".to_string()),
            password_hash: Set("unused".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
        profile_service::create_profile(db, user.id, None).await.unwrap();
        user.id
    }

    #[tokio::test]
    async fn test_onboarding_completes_when_samples_are_unavailable() {
        let db = crate::db::connect_and_prepare("sqlite::memory:", 1).await.unwrap();
        let user_id = user_with_profile(&db).await;
        db.execute_unprepared("DROP TABLE sample_thoughts").await.unwrap();

        let outcome = complete_onboarding(&db, user_id, vec![Category::Stoicism, Category::Health])
            .await
            .unwrap();

        assert_eq!(outcome.sample_thoughts_added, 0);
        assert!(outcome.profile.onboarding_completed);
        assert_eq!(
            outcome.profile.selected_categories,
            vec![Category::Stoicism, Category::Health]
        );
    }

    #[test]
    fn test_onboarding_message() {
        assert_eq!(onboarding_message(2, 6), "Added 6 sample thoughts from 2 categories!");
        assert_eq!(
            onboarding_message(0, 0),
            "Welcome! You can start creating your own thoughts."
        );
    }
}
