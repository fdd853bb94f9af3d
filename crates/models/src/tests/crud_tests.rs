use crate::db::connect;
use crate::{category, product};
use anyhow::Result;
use migration::MigratorTrait;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

/// Setup test database with migrations
async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = connect().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Test category CRUD operations
#[tokio::test]
async fn test_category_crud() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    let category_name = format!("test_category_{}", Uuid::new_v4());
    let created = category::create(&db, &category_name).await?;
    assert_eq!(created.name, category_name);

    let found = category::Entity::find_by_id(created.id).one(&db).await?;
    assert!(found.is_some());
    assert_eq!(found.unwrap().name, category_name);

    let found_by_name = category::Entity::find()
        .filter(category::Column::Name.eq(category_name.clone()))
        .one(&db)
        .await?;
    assert!(found_by_name.is_some());
    assert_eq!(found_by_name.unwrap().id, created.id);

    category::Entity::delete_by_id(created.id).exec(&db).await?;
    Ok(())
}

/// Test product CRUD operations and the category relation
#[tokio::test]
async fn test_product_crud() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    let cat = category::create(&db, &format!("gadgets_{}", Uuid::new_v4())).await?;

    let created = product::create(
        &db,
        "USB microscope",
        "1000x digital magnifier",
        Decimal::new(4950, 2),
        Some("media/usb-microscope.png".into()),
        cat.id,
    )
    .await?;

    assert_eq!(created.name, "USB microscope");
    assert_eq!(created.price, Decimal::new(4950, 2));
    assert_eq!(created.category_id, cat.id);

    let found = product::Entity::find_by_id(created.id).one(&db).await?;
    assert!(found.is_some());
    let found = found.unwrap();
    assert_eq!(found.description, "1000x digital magnifier");
    assert_eq!(found.image.as_deref(), Some("media/usb-microscope.png"));

    // Filter by category returns only matching rows
    let in_cat = product::Entity::find()
        .filter(product::Column::CategoryId.eq(cat.id))
        .all(&db)
        .await?;
    assert!(in_cat.iter().all(|p| p.category_id == cat.id));
    assert!(in_cat.iter().any(|p| p.id == created.id));

    product::Entity::delete_by_id(created.id).exec(&db).await?;
    category::Entity::delete_by_id(cat.id).exec(&db).await?;
    Ok(())
}

/// Deleting a category cascades to its products
#[tokio::test]
async fn test_category_delete_cascades() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    let cat = category::create(&db, &format!("ephemeral_{}", Uuid::new_v4())).await?;
    let p = product::create(&db, "Doomed item", "gone with its category", Decimal::new(100, 2), None, cat.id).await?;

    category::Entity::delete_by_id(cat.id).exec(&db).await?;

    let after = product::Entity::find_by_id(p.id).one(&db).await?;
    assert!(after.is_none());
    Ok(())
}

/// Invalid payloads are rejected before touching the database
#[tokio::test]
async fn test_product_create_validation() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    let cat = category::create(&db, &format!("strict_{}", Uuid::new_v4())).await?;

    let blank_name =
        product::create(&db, " ", "desc", Decimal::new(100, 2), None, cat.id).await;
    assert!(blank_name.is_err());

    let negative_price =
        product::create(&db, "Name", "desc", Decimal::new(-100, 2), None, cat.id).await;
    assert!(negative_price.is_err());

    category::Entity::delete_by_id(cat.id).exec(&db).await?;
    Ok(())
}
