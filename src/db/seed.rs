use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Set, TransactionTrait};
use tracing::info;

use crate::db::entities::sample_thought;
use crate::db::enums::Category;

/// Built-in sample thoughts, inserted once into an empty `sample_thoughts` table.
pub fn sample_catalog(category: Category) -> &'static [&'static str] {
    match category {
        Category::Stoicism => &[
            "You have power over your mind, not outside events. Realize this, and you will find strength. (Marcus Aurelius)",
            "We suffer more often in imagination than in reality. (Seneca)",
            "It's not what happens to you, but how you react to it that matters. (Epictetus)",
        ],
        Category::Motivation => &[
            "The secret of getting ahead is getting started.",
            "Well begun is half done. (Aristotle)",
            "It does not matter how slowly you go as long as you do not stop. (Confucius)",
        ],
        Category::Wisdom => &[
            "The only true wisdom is in knowing you know nothing. (Socrates)",
            "Knowing yourself is the beginning of all wisdom. (Aristotle)",
            "A journey of a thousand miles begins with a single step. (Lao Tzu)",
        ],
        Category::Mindfulness => &[
            "Breathe in deeply; notice three things you can hear right now.",
            "The present moment is the only moment available to us.",
            "Wherever you are, be all there.",
        ],
        Category::Health => &[
            "Take a short walk after meals.",
            "Drink a glass of water before your morning coffee.",
            "Sleep is the foundation the rest of the day is built on.",
        ],
        Category::Spirituality => &[
            "Peace comes from within. Do not seek it without.",
            "Be still, and let the noise of the day settle.",
            "Gratitude turns what we have into enough.",
        ],
    }
}

/// Returns the number of rows inserted (0 when the table was already populated).
pub async fn seed_sample_thoughts(db: &DatabaseConnection) -> Result<usize, DbErr> {
    if sample_thought::Entity::find().count(db).await? > 0 {
        return Ok(0);
    }

    let txn = db.begin().await?;
    let mut inserted = 0;
    for category in Category::ALL {
        for (position, content) in sample_catalog(category).iter().enumerate() {
            sample_thought::ActiveModel {
                category: Set(category),
                content: Set((*content).to_string()),
                position: Set(position as i32),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            inserted += 1;
        }
    }
    txn.commit().await?;

    info!(count = inserted, "Seeded sample thoughts.");
    Ok(inserted)
}
