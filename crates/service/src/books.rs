use models::book;
use sea_orm::DatabaseConnection;
use tracing::instrument;

use crate::errors::ServiceError;

/// List all books, most recently created first.
pub async fn list_books(db: &DatabaseConnection) -> Result<Vec<book::Model>, ServiceError> {
    Ok(book::list(db).await?)
}

/// Create a book from untrusted input; fields are trimmed and must be
/// non-empty after trimming.
#[instrument(skip(db))]
pub async fn create_book(
    db: &DatabaseConnection,
    title: &str,
    author: &str,
) -> Result<book::Model, ServiceError> {
    Ok(book::create(db, title, author).await?)
}

/// Replace a book's title/author wholesale.
#[instrument(skip(db))]
pub async fn update_book(
    db: &DatabaseConnection,
    id: i32,
    title: &str,
    author: &str,
) -> Result<book::Model, ServiceError> {
    Ok(book::update(db, id, title, author).await?)
}

/// Permanently remove a book.
#[instrument(skip(db))]
pub async fn delete_book(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    Ok(book::delete(db, id).await?)
}
