pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_table_users;
mod m20260301_000002_create_table_courses;
mod m20260301_000003_create_table_certificates;
mod m20260301_000004_create_table_jobs;
mod m20260301_000005_create_table_student_profiles;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_table_users::Migration),
            Box::new(m20260301_000002_create_table_courses::Migration),
            Box::new(m20260301_000003_create_table_certificates::Migration),
            Box::new(m20260301_000004_create_table_jobs::Migration),
            Box::new(m20260301_000005_create_table_student_profiles::Migration),
        ]
    }
}
