//! `SeaORM` Entity for certificates table

use sea_orm::{entity::prelude::*, sea_query::StringLen};
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ChainStatus;

#[derive(Copy, Clone, Default, Debug, DeriveEntity)]
pub struct Entity;

impl EntityName for Entity {
    fn table_name(&self) -> &str {
        "certificates"
    }
}

#[derive(Clone, Debug, PartialEq, DeriveModel, DeriveActiveModel, Eq, Serialize, Deserialize)]
pub struct Model {
    #[serde(skip_deserializing)]
    pub certificate_id: Uuid,
    pub learner_name: String,
    pub learner_email: String,
    pub student_id: Option<Uuid>,
    pub course_name: String,
    pub course_id: Option<Uuid>,
    pub institute_name: String,
    pub institute_id: Option<Uuid>,
    pub issue_date: Date,
    pub certificate_hash: String,
    pub blockchain_tx_hash: Option<String>,
    pub chain_status: ChainStatus,
    pub chain_error: Option<String>,
    pub notarized_at: Option<DateTime>,
    pub qr_payload: String,
    pub pdf_path: Option<String>,
    pub ipfs_hash: Option<String>,
    pub ipfs_url: Option<String>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveColumn)]
pub enum Column {
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

#[derive(Copy, Clone, Debug, EnumIter, DerivePrimaryKey)]
pub enum PrimaryKey {
    CertificateId,
}

impl PrimaryKeyTrait for PrimaryKey {
    type ValueType = Uuid;
    fn auto_increment() -> bool {
        false
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Student,
    Institute,
    Course,
}

impl ColumnTrait for Column {
    type EntityName = Entity;
    fn def(&self) -> ColumnDef {
        match self {
            Self::CertificateId => ColumnType::Uuid.def(),
            Self::LearnerName => ColumnType::String(StringLen::N(255)).def(),
            Self::LearnerEmail => ColumnType::String(StringLen::N(255)).def(),
            Self::StudentId => ColumnType::Uuid.def().null(),
            Self::CourseName => ColumnType::String(StringLen::N(255)).def(),
            Self::CourseId => ColumnType::Uuid.def().null(),
            Self::InstituteName => ColumnType::String(StringLen::N(255)).def(),
            Self::InstituteId => ColumnType::Uuid.def().null(),
            Self::IssueDate => ColumnType::Date.def(),
            Self::CertificateHash => ColumnType::String(StringLen::N(64)).def(),
            Self::BlockchainTxHash => ColumnType::String(StringLen::N(80)).def().null(),
            Self::ChainStatus => ChainStatus::db_type(),
            Self::ChainError => ColumnType::Text.def().null(),
            Self::NotarizedAt => ColumnType::DateTime.def().null(),
            Self::QrPayload => ColumnType::Text.def(),
            Self::PdfPath => ColumnType::String(StringLen::N(512)).def().null(),
            Self::IpfsHash => ColumnType::String(StringLen::N(128)).def().null(),
            Self::IpfsUrl => ColumnType::String(StringLen::N(512)).def().null(),
            Self::CreatedAt => ColumnType::DateTime.def(),
        }
    }
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Student => Entity::belongs_to(super::user::Entity)
                .from(Column::StudentId)
                .to(super::user::Column::UserId)
                .into(),
            Self::Institute => Entity::belongs_to(super::user::Entity)
                .from(Column::InstituteId)
                .to(super::user::Column::UserId)
                .into(),
            Self::Course => Entity::belongs_to(super::course::Entity)
                .from(Column::CourseId)
                .to(super::course::Column::CourseId)
                .into(),
        }
    }
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
