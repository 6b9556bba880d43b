use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

/// Isolated in-memory database with migrations applied, one per test.
pub async fn get_db() -> anyhow::Result<DatabaseConnection> {
    let db = models::db::connect_to("sqlite::memory:").await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
