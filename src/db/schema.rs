use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityName, EntityTrait, Schema};
use tracing::debug;

use crate::db::entities::{flashcard, profile, sample_thought, user};

/// Creates every table (and its indexes) that does not exist yet.
/// Order matters: referenced tables first.
pub async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, user::Entity).await?;
    create_table(db, profile::Entity).await?;
    create_table(db, flashcard::Entity).await?;
    create_table(db, sample_thought::Entity).await?;
    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(backend.build(&table)).await?;

    for mut index in schema.create_index_from_entity(entity) {
        index.if_not_exists();
        db.execute(backend.build(&index)).await?;
    }

    debug!(table = entity.table_name(), "Ensured table exists.");
    Ok(())
}
