use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, Order, PaginatorTrait,
    QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::pagination::{Page, Pagination};
use models::{category, product};

use crate::errors::ServiceError;

/// Wire representation: id and name only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryOut {
    pub id: Uuid,
    pub name: String,
}

/// Per-category product count, in category insertion order.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    pub id: Uuid,
    pub name: String,
    pub count: u64,
}

#[derive(Debug, FromQueryResult)]
struct CountRow {
    category_id: Uuid,
    count: i64,
}

/// Paginated category listing.
pub async fn list_categories(
    db: &DatabaseConnection,
    pagination: Pagination,
) -> Result<Page<CategoryOut>, ServiceError> {
    let (page_idx, per_page) = pagination.normalize();
    let paginator = category::Entity::find()
        .order_by(category::Column::CreatedAt, Order::Asc)
        .paginate(db, per_page);

    let count = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let rows = paginator
        .fetch_page(page_idx)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let results = rows
        .into_iter()
        .map(|c| CategoryOut { id: c.id, name: c.name })
        .collect();
    Ok(Page::new(count, pagination, results))
}

/// Product count per category, including categories with no products.
/// Feeds the report histogram.
pub async fn product_counts(
    db: &DatabaseConnection,
) -> Result<Vec<CategoryCount>, ServiceError> {
    let categories = category::Entity::find()
        .order_by(category::Column::CreatedAt, Order::Asc)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    let counts: Vec<CountRow> = product::Entity::find()
        .select_only()
        .column(product::Column::CategoryId)
        .column_as(product::Column::Id.count(), "count")
        .group_by(product::Column::CategoryId)
        .into_model::<CountRow>()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    Ok(categories
        .into_iter()
        .map(|c| {
            let count = counts
                .iter()
                .find(|row| row.category_id == c.id)
                .map(|row| row.count.max(0) as u64)
                .unwrap_or(0);
            CategoryCount { id: c.id, name: c.name, count }
        })
        .collect())
}
