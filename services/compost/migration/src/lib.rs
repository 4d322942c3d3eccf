use sea_orm_migration::prelude::*;

mod m20250601_000001_create_profiles;
mod m20250601_000002_create_bins;
mod m20250601_000003_create_bin_logs;
mod m20250601_000004_create_tasks;
mod m20250601_000005_create_forum;
mod m20250601_000006_create_tips;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_profiles::Migration),
            Box::new(m20250601_000002_create_bins::Migration),
            Box::new(m20250601_000003_create_bin_logs::Migration),
            Box::new(m20250601_000004_create_tasks::Migration),
            Box::new(m20250601_000005_create_forum::Migration),
            Box::new(m20250601_000006_create_tips::Migration),
        ]
    }
}
