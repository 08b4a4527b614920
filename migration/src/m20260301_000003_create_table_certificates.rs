use sea_orm_migration::prelude::*;

use crate::m20260301_000001_create_table_users::Users;
use crate::m20260301_000002_create_table_courses::Courses;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Certificates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Certificates::CertificateId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Certificates::LearnerName).string_len(255).not_null())
                    .col(ColumnDef::new(Certificates::LearnerEmail).string_len(255).not_null())
                    .col(ColumnDef::new(Certificates::StudentId).uuid().null())
                    .col(ColumnDef::new(Certificates::CourseName).string_len(255).not_null())
                    .col(ColumnDef::new(Certificates::CourseId).uuid().null())
                    .col(ColumnDef::new(Certificates::InstituteName).string_len(255).not_null())
                    .col(ColumnDef::new(Certificates::InstituteId).uuid().null())
                    .col(ColumnDef::new(Certificates::IssueDate).date().not_null())
                    .col(
                        ColumnDef::new(Certificates::CertificateHash)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Certificates::BlockchainTxHash).string_len(80).null())
                    .col(
                        ColumnDef::new(Certificates::ChainStatus)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Certificates::ChainError).text().null())
                    .col(ColumnDef::new(Certificates::NotarizedAt).timestamp().null())
                    .col(ColumnDef::new(Certificates::QrPayload).text().not_null())
                    .col(ColumnDef::new(Certificates::PdfPath).string_len(512).null())
                    .col(ColumnDef::new(Certificates::IpfsHash).string_len(128).null())
                    .col(ColumnDef::new(Certificates::IpfsUrl).string_len(512).null())
                    .col(
                        ColumnDef::new(Certificates::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_certificates_student")
                            .from_tbl(Certificates::Table)
                            .from_col(Certificates::StudentId)
                            .to_tbl(Users::Table)
                            .to_col(Users::UserId)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_certificates_institute")
                            .from_tbl(Certificates::Table)
                            .from_col(Certificates::InstituteId)
                            .to_tbl(Users::Table)
                            .to_col(Users::UserId)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_certificates_course")
                            .from_tbl(Certificates::Table)
                            .from_col(Certificates::CourseId)
                            .to_tbl(Courses::Table)
                            .to_col(Courses::CourseId)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_certificates_institute_id", Certificates::InstituteId),
            ("idx_certificates_student_id", Certificates::StudentId),
            ("idx_certificates_learner_email", Certificates::LearnerEmail),
            ("idx_certificates_hash", Certificates::CertificateHash),
            ("idx_certificates_chain_status", Certificates::ChainStatus),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Certificates::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_certificates_chain_status",
            "idx_certificates_hash",
            "idx_certificates_learner_email",
            "idx_certificates_student_id",
            "idx_certificates_institute_id",
        ] {
            manager
                .drop_index(Index::drop().name(name).table(Certificates::Table).to_owned())
                .await?;
        }

        manager
            .drop_table(Table::drop().table(Certificates::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Certificates {
    Table,
    CertificateId,
    LearnerName,
    LearnerEmail,
    StudentId,
    CourseName,
    CourseId,
    InstituteName,
    InstituteId,
    IssueDate,
    CertificateHash,
    BlockchainTxHash,
    ChainStatus,
    ChainError,
    NotarizedAt,
    QrPayload,
    PdfPath,
    IpfsHash,
    IpfsUrl,
    CreatedAt,
}
