//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_category;
mod m20240301_000002_create_product;
mod m20240301_000003_create_user;
mod m20240301_000004_create_user_credentials;
mod m20240301_000010_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_category::Migration),
            Box::new(m20240301_000002_create_product::Migration),
            Box::new(m20240301_000003_create_user::Migration),
            Box::new(m20240301_000004_create_user_credentials::Migration),
            // Indexes should always be applied last
            Box::new(m20240301_000010_add_indexes::Migration),
        ]
    }
}
