use chrono::Utc;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::db::entities::{flashcard, sample_thought};
use crate::db::enums::Category;

/// Sample thoughts for one category, in catalog order.
pub async fn get_sample_thoughts<C: ConnectionTrait>(
    conn: &C,
    category: Category,
) -> Result<Vec<String>, DbErr> {
    let rows = sample_thought::Entity::find()
        .filter(sample_thought::Column::Category.eq(category))
        .order_by_asc(sample_thought::Column::Position)
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(|row| row.content).collect())
}

/// Sample thoughts fetched for a set of categories ahead of a write transaction.
/// A category whose samples could not be fetched is left out.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SampleBatch {
    samples: Vec<(Category, Vec<String>)>,
}

impl SampleBatch {
    pub async fn fetch<C: ConnectionTrait>(conn: &C, categories: &[Category]) -> Self {
        let mut samples = Vec::with_capacity(categories.len());
        for &category in categories {
            match get_sample_thoughts(conn, category).await {
                Ok(contents) => samples.push((category, contents)),
                Err(e) => {
                    warn!(category = %category, error = %e, "Failed to fetch sample thoughts, skipping category.");
                }
            }
        }
        Self { samples }
    }

    pub fn for_category(&self, category: Category) -> Option<&[String]> {
        self.samples
            .iter()
            .find(|(fetched, _)| *fetched == category)
            .map(|(_, contents)| contents.as_slice())
    }
}

/// Copies the prefetched sample thoughts of `categories` into the user's flashcards,
/// tagged with their category. Categories missing from `batch` are skipped.
/// Returns the number of flashcards inserted.
pub async fn seed_user_flashcards<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    batch: &SampleBatch,
    categories: &[Category],
) -> Result<usize, DbErr> {
    let now = Utc::now();
    let mut cards = Vec::new();

    for &category in categories {
        let Some(samples) = batch.for_category(category) else {
            debug!(user_id, category = %category, "No sample thoughts available, skipping category.");
            continue;
        };
        cards.extend(samples.iter().map(|content| flashcard::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            content: Set(content.clone()),
            image_url: Set(None),
            category: Set(Some(category)),
            created_at: Set(now),
            updated_at: Set(now),
        }));
    }

    if cards.is_empty() {
        return Ok(0);
    }

    let count = cards.len();
    flashcard::Entity::insert_many(cards)
        .exec_without_returning(conn)
        .await?;
    debug!(user_id, count, "Seeded sample thoughts into user flashcards.");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ConnectionTrait;

    #[tokio::test]
    async fn test_batch_skips_categories_that_fail_to_load() {
        let db = crate::db::connect_and_prepare("sqlite::memory:", 1).await.unwrap();

        let batch = SampleBatch::fetch(&db, &[Category::Wisdom]).await;
        assert_eq!(batch.for_category(Category::Wisdom).map(<[String]>::len), Some(3));
        assert_eq!(batch.for_category(Category::Health), None);

        db.execute_unprepared("DROP TABLE sample_thoughts").await.unwrap();
        let batch = SampleBatch::fetch(&db, &[Category::Wisdom, Category::Health]).await;
        assert_eq!(batch, SampleBatch::default());
    }
}
