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
                    .table(JobPostings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(JobPostings::JobId).uuid().not_null().primary_key())
                    .col(ColumnDef::new(JobPostings::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(JobPostings::Title).string_len(255).not_null())
                    .col(ColumnDef::new(JobPostings::Description).text().not_null())
                    .col(ColumnDef::new(JobPostings::Location).string_len(255).null())
                    .col(ColumnDef::new(JobPostings::EmploymentType).string_len(50).null())
                    .col(ColumnDef::new(JobPostings::SalaryRange).string_len(100).null())
                    .col(ColumnDef::new(JobPostings::RequiredSkills).text().null())
                    .col(
                        ColumnDef::new(JobPostings::Status)
                            .string_len(20)
                            .not_null()
                            .default("open"),
                    )
                    .col(
                        ColumnDef::new(JobPostings::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(JobPostings::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_postings_company")
                            .from_tbl(JobPostings::Table)
                            .from_col(JobPostings::CompanyId)
                            .to_tbl(Users::Table)
                            .to_col(Users::UserId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JobApplications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JobApplications::ApplicationId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JobApplications::JobId).uuid().not_null())
                    .col(ColumnDef::new(JobApplications::StudentId).uuid().not_null())
                    .col(ColumnDef::new(JobApplications::CoverLetter).text().null())
                    .col(ColumnDef::new(JobApplications::CertificateIds).json().not_null())
                    .col(
                        ColumnDef::new(JobApplications::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(JobApplications::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(JobApplications::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_applications_job")
                            .from_tbl(JobApplications::Table)
                            .from_col(JobApplications::JobId)
                            .to_tbl(JobPostings::Table)
                            .to_col(JobPostings::JobId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_applications_student")
                            .from_tbl(JobApplications::Table)
                            .from_col(JobApplications::StudentId)
                            .to_tbl(Users::Table)
                            .to_col(Users::UserId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_job_applications_job_student")
                    .table(JobApplications::Table)
                    .col(JobApplications::JobId)
                    .col(JobApplications::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JobOffers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(JobOffers::OfferId).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(JobOffers::ApplicationId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(JobOffers::JobId).uuid().not_null())
                    .col(ColumnDef::new(JobOffers::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(JobOffers::StudentId).uuid().not_null())
                    .col(ColumnDef::new(JobOffers::Salary).string_len(100).not_null())
                    .col(ColumnDef::new(JobOffers::StartDate).date().null())
                    .col(ColumnDef::new(JobOffers::Message).text().null())
                    .col(
                        ColumnDef::new(JobOffers::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(JobOffers::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(JobOffers::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_offers_application")
                            .from_tbl(JobOffers::Table)
                            .from_col(JobOffers::ApplicationId)
                            .to_tbl(JobApplications::Table)
                            .to_col(JobApplications::ApplicationId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_job_offers_student_id")
                    .table(JobOffers::Table)
                    .col(JobOffers::StudentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JobOffers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(JobApplications::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(JobPostings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum JobPostings {
    Table,
    JobId,
    CompanyId,
    Title,
    Description,
    Location,
    EmploymentType,
    SalaryRange,
    RequiredSkills,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum JobApplications {
    Table,
    ApplicationId,
    JobId,
    StudentId,
    CoverLetter,
    CertificateIds,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum JobOffers {
    Table,
    OfferId,
    ApplicationId,
    JobId,
    CompanyId,
    StudentId,
    Salary,
    StartDate,
    Message,
    Status,
    CreatedAt,
    UpdatedAt,
}
