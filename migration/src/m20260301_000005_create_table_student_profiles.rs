use sea_orm_migration::prelude::*;

use crate::m20260301_000001_create_table_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StudentProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentProfiles::StudentId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StudentProfiles::Bio).text().null())
                    .col(ColumnDef::new(StudentProfiles::Skills).text().null())
                    .col(ColumnDef::new(StudentProfiles::Education).text().null())
                    .col(ColumnDef::new(StudentProfiles::LinkedinUrl).string_len(512).null())
                    .col(ColumnDef::new(StudentProfiles::GithubUrl).string_len(512).null())
                    .col(ColumnDef::new(StudentProfiles::ResumeUrl).string_len(512).null())
                    .col(
                        ColumnDef::new(StudentProfiles::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_profiles_user")
                            .from_tbl(StudentProfiles::Table)
                            .from_col(StudentProfiles::StudentId)
                            .to_tbl(Users::Table)
                            .to_col(Users::UserId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StudentProfiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum StudentProfiles {
    Table,
    StudentId,
    Bio,
    Skills,
    Education,
    LinkedinUrl,
    GithubUrl,
    ResumeUrl,
    UpdatedAt,
}
