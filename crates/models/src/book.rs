use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::Serialize;

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "book")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub author: String,
    // Internal bookkeeping only; responses expose {id, title, author}.
    #[serde(skip_serializing)]
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("no relations defined here")
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Trim and reject empty/whitespace-only required fields.
pub fn validate_required(field: &str, value: &str) -> Result<String, errors::ModelError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(errors::ModelError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

pub async fn create(
    db: &DatabaseConnection,
    title: &str,
    author: &str,
) -> Result<Model, errors::ModelError> {
    let title = validate_required("title", title)?;
    let author = validate_required("author", author)?;
    let am = ActiveModel {
        title: Set(title),
        author: Set(author),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// All books, most recently created first.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .order_by_desc(Column::Id)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Replace title/author wholesale; `id` and `created_at` are preserved.
/// Lookup happens before validation so an unknown id is always a NotFound.
pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    title: &str,
    author: &str,
) -> Result<Model, errors::ModelError> {
    let mut found: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .ok_or_else(|| errors::ModelError::NotFound(format!("book {id} not found")))?
        .into();
    found.title = Set(validate_required("title", title)?);
    found.author = Set(validate_required("author", author)?);
    found.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), errors::ModelError> {
    let res = Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    if res.rows_affected == 0 {
        return Err(errors::ModelError::NotFound(format!("book {id} not found")));
    }
    Ok(())
}
