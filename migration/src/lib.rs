pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_catalog;
mod m20240301_000002_create_postcards;
mod m20240301_000003_create_bar;
mod m20240301_000004_create_api_cache;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_catalog::Migration),
            Box::new(m20240301_000002_create_postcards::Migration),
            Box::new(m20240301_000003_create_bar::Migration),
            Box::new(m20240301_000004_create_api_cache::Migration),
        ]
    }
}
