pub mod entities;
pub mod enums;
pub mod models;
pub mod schema;
pub mod seed;
pub mod services;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

/// Connects to the store, creates any missing tables and seeds the sample thoughts.
pub async fn connect_and_prepare(
    database_url: &str,
    max_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url.to_owned());
    opt.max_connections(max_connections).sqlx_logging(false);

    let db = Database::connect(opt).await?;
    schema::create_tables(&db).await?;
    let seeded = seed::seed_sample_thoughts(&db).await?;
    info!(seeded, "Database ready.");
    Ok(db)
}
