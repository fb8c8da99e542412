pub use sea_orm_migration::prelude::*;

mod m20240315_000001_create_catalog;
mod m20240315_000002_create_box_office;

/// Schema of the catalog database served by the REST API.
pub struct CatalogMigrator;

#[async_trait::async_trait]
impl MigratorTrait for CatalogMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240315_000001_create_catalog::Migration)]
    }
}

/// Schema of the box office database used by the console tool.
pub struct BoxOfficeMigrator;

#[async_trait::async_trait]
impl MigratorTrait for BoxOfficeMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240315_000002_create_box_office::Migration)]
    }
}
