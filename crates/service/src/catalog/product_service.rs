use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use common::pagination::{Page, Pagination};
use models::{category, product};

use crate::errors::ServiceError;

/// Read representation: embeds the owning category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductOut {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub category: CategoryRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
}

/// Write representation: scalar fields plus the category id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
    pub category_id: Uuid,
}

/// Partial update: absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub category_id: Option<Uuid>,
}

/// Declared filter fields for the plain listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    pub category_id: Option<Uuid>,
    pub name: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

/// Combined filter/search/ordering backends for the search listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductSearch {
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub price: Option<Decimal>,
    /// free-text search over name, description and category name
    pub q: Option<String>,
    /// one of `id`, `name`, `price`, optionally prefixed with `-` for descending
    pub ordering: Option<String>,
}

fn to_output(
    row: (product::Model, Option<category::Model>),
) -> Result<ProductOut, ServiceError> {
    let (p, c) = row;
    let c = c.ok_or_else(|| ServiceError::Db(format!("product {} has no category row", p.id)))?;
    Ok(ProductOut {
        id: p.id,
        name: p.name,
        description: p.description,
        price: p.price,
        image: p.image,
        category: CategoryRef { id: c.id, name: c.name },
    })
}

fn filter_condition(filter: &ProductFilter) -> Condition {
    let mut cond = Condition::all();
    if let Some(cid) = filter.category_id {
        cond = cond.add(product::Column::CategoryId.eq(cid));
    }
    if let Some(name) = &filter.name {
        cond = cond.add(
            Expr::col((product::Entity, product::Column::Name)).ilike(format!("%{}%", name)),
        );
    }
    if let Some(min) = filter.min_price {
        cond = cond.add(product::Column::Price.gte(min));
    }
    if let Some(max) = filter.max_price {
        cond = cond.add(product::Column::Price.lte(max));
    }
    cond
}

fn search_condition(search: &ProductSearch) -> Condition {
    let mut cond = Condition::all();
    if let Some(cid) = search.category_id {
        cond = cond.add(product::Column::CategoryId.eq(cid));
    }
    if let Some(cname) = &search.category_name {
        cond = cond.add(category::Column::Name.eq(cname.clone()));
    }
    if let Some(price) = search.price {
        cond = cond.add(product::Column::Price.eq(price));
    }
    if let Some(q) = &search.q {
        let pattern = format!("%{}%", q);
        cond = cond.add(
            Condition::any()
                .add(Expr::col((product::Entity, product::Column::Name)).ilike(pattern.clone()))
                .add(
                    Expr::col((product::Entity, product::Column::Description))
                        .ilike(pattern.clone()),
                )
                .add(Expr::col((category::Entity, category::Column::Name)).ilike(pattern)),
        );
    }
    cond
}

fn ordering_key(ordering: &str) -> Result<(product::Column, Order), ServiceError> {
    let (key, order) = match ordering.strip_prefix('-') {
        Some(rest) => (rest, Order::Desc),
        None => (ordering, Order::Asc),
    };
    let col = match key {
        "id" => product::Column::Id,
        "name" => product::Column::Name,
        "price" => product::Column::Price,
        _ => {
            return Err(ServiceError::Validation(format!(
                "unsupported ordering key: {}",
                ordering
            )))
        }
    };
    Ok((col, order))
}

/// Paginated listing with the declared filter fields.
pub async fn list_products(
    db: &DatabaseConnection,
    filter: &ProductFilter,
    pagination: Pagination,
) -> Result<Page<ProductOut>, ServiceError> {
    let (page_idx, per_page) = pagination.normalize();
    let paginator = product::Entity::find()
        .find_also_related(category::Entity)
        .filter(filter_condition(filter))
        .order_by(product::Column::CreatedAt, Order::Asc)
        .paginate(db, per_page);

    let count = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let rows = paginator
        .fetch_page(page_idx)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let results = rows.into_iter().map(to_output).collect::<Result<Vec<_>, _>>()?;
    Ok(Page::new(count, pagination, results))
}

/// Paginated listing with combined filter, free-text search, and ordering.
pub async fn search_products(
    db: &DatabaseConnection,
    search: &ProductSearch,
    pagination: Pagination,
) -> Result<Page<ProductOut>, ServiceError> {
    let mut select = product::Entity::find()
        .find_also_related(category::Entity)
        .filter(search_condition(search));

    match &search.ordering {
        Some(ordering) => {
            let (col, order) = ordering_key(ordering)?;
            select = select.order_by(col, order);
        }
        None => select = select.order_by(product::Column::CreatedAt, Order::Asc),
    }

    let (page_idx, per_page) = pagination.normalize();
    let paginator = select.paginate(db, per_page);
    let count = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let rows = paginator
        .fetch_page(page_idx)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let results = rows.into_iter().map(to_output).collect::<Result<Vec<_>, _>>()?;
    Ok(Page::new(count, pagination, results))
}

/// Create a product after checking the category exists.
pub async fn create_product(
    db: &DatabaseConnection,
    input: &ProductInput,
) -> Result<ProductOut, ServiceError> {
    let cat = category::Entity::find_by_id(input.category_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::Validation("category does not exist".into()))?;

    let created = models::product::create(
        db,
        &input.name,
        &input.description,
        input.price,
        input.image.clone(),
        input.category_id,
    )
    .await?;

    info!(id = %created.id, category_id = %cat.id, "created product");
    Ok(ProductOut {
        id: created.id,
        name: created.name,
        description: created.description,
        price: created.price,
        image: created.image,
        category: CategoryRef { id: cat.id, name: cat.name },
    })
}

/// Fetch a single product with its category embedded.
pub async fn get_product(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<ProductOut>, ServiceError> {
    let row = product::Entity::find_by_id(id)
        .find_also_related(category::Entity)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    row.map(to_output).transpose()
}

/// Full or partial update; absent fields keep their current value.
pub async fn update_product(
    db: &DatabaseConnection,
    id: Uuid,
    changes: &ProductUpdate,
) -> Result<ProductOut, ServiceError> {
    let existing = product::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("product"))?;

    if let Some(name) = &changes.name {
        models::product::validate_name(name)?;
    }
    if let Some(price) = changes.price {
        models::product::validate_price(price)?;
    }
    if let Some(cid) = changes.category_id {
        let exists = category::Entity::find_by_id(cid)
            .one(db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        if exists.is_none() {
            return Err(ServiceError::Validation("category does not exist".into()));
        }
    }

    let mut am: product::ActiveModel = existing.into();
    if let Some(name) = &changes.name {
        am.name = Set(name.clone());
    }
    if let Some(description) = &changes.description {
        am.description = Set(description.clone());
    }
    if let Some(price) = changes.price {
        am.price = Set(price);
    }
    if let Some(image) = &changes.image {
        am.image = Set(Some(image.clone()));
    }
    if let Some(cid) = changes.category_id {
        am.category_id = Set(cid);
    }
    am.updated_at = Set(Utc::now().into());

    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id = %updated.id, "updated product");

    get_product(db, updated.id)
        .await?
        .ok_or_else(|| ServiceError::Db("updated product vanished".into()))
}

/// Delete by id; `Ok(false)` when nothing matched.
pub async fn delete_product(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = product::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

/// The `limit` highest- or lowest-priced products, for the report.
pub async fn products_by_price(
    db: &DatabaseConnection,
    order: Order,
    limit: u64,
) -> Result<Vec<product::Model>, ServiceError> {
    product::Entity::find()
        .order_by(product::Column::Price, order)
        .paginate(db, limit)
        .fetch_page(0)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Products with their category rows in insertion order, for the report tables.
pub async fn products_with_categories(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<(product::Model, category::Model)>, ServiceError> {
    let rows = product::Entity::find()
        .find_also_related(category::Entity)
        .order_by(product::Column::CreatedAt, Order::Asc)
        .paginate(db, limit)
        .fetch_page(0)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    rows.into_iter()
        .map(|(p, c)| {
            let c = c.ok_or_else(|| {
                ServiceError::Db(format!("product {} has no category row", p.id))
            })?;
            Ok((p, c))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn product_crud_service() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;

        let cat = models::category::create(&db, &format!("svc_cat_{}", Uuid::new_v4())).await?;

        let marker = Uuid::new_v4().simple().to_string();
        let created = create_product(
            &db,
            &ProductInput {
                name: format!("Kettle {}", marker),
                description: "stovetop kettle, 2l".into(),
                price: Decimal::new(2499, 2),
                image: None,
                category_id: cat.id,
            },
        )
        .await?;
        assert_eq!(created.category.id, cat.id);

        // create-then-retrieve returns the same field values
        let got = get_product(&db, created.id).await?.expect("product exists");
        assert_eq!(got.name, created.name);
        assert_eq!(got.price, created.price);
        assert_eq!(got.category.name, cat.name);

        // declared filter: category id
        let page = list_products(
            &db,
            &ProductFilter { category_id: Some(cat.id), ..Default::default() },
            Pagination::default(),
        )
        .await?;
        assert!(page.results.iter().all(|p| p.category.id == cat.id));
        assert!(page.results.iter().any(|p| p.id == created.id));

        // search backend hits name and honors descending price ordering
        let page = search_products(
            &db,
            &ProductSearch {
                q: Some(marker.clone()),
                ordering: Some("-price".into()),
                ..Default::default()
            },
            Pagination::default(),
        )
        .await?;
        assert!(page.results.iter().any(|p| p.id == created.id));

        // partial update leaves unset fields untouched
        let updated = update_product(
            &db,
            created.id,
            &ProductUpdate { price: Some(Decimal::new(1999, 2)), ..Default::default() },
        )
        .await?;
        assert_eq!(updated.price, Decimal::new(1999, 2));
        assert_eq!(updated.name, created.name);

        assert!(delete_product(&db, created.id).await?);
        assert!(get_product(&db, created.id).await?.is_none());
        assert!(!delete_product(&db, created.id).await?);

        models::category::Entity::delete_by_id(cat.id).exec(&db).await?;
        Ok(())
    }

    #[test]
    fn ordering_keys_parse() {
        let (col, order) = ordering_key("price").unwrap();
        assert!(matches!(col, product::Column::Price));
        assert!(matches!(order, Order::Asc));

        let (col, order) = ordering_key("-name").unwrap();
        assert!(matches!(col, product::Column::Name));
        assert!(matches!(order, Order::Desc));
    }

    #[test]
    fn ordering_rejects_unknown_keys() {
        assert!(ordering_key("category").is_err());
        assert!(ordering_key("-created_at").is_err());
    }
}
