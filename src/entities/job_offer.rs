//! `SeaORM` Entity for job_offers table

use sea_orm::{entity::prelude::*, sea_query::StringLen};
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::OfferStatus;

#[derive(Copy, Clone, Default, Debug, DeriveEntity)]
pub struct Entity;

impl EntityName for Entity {
    fn table_name(&self) -> &str {
        "job_offers"
    }
}

#[derive(Clone, Debug, PartialEq, DeriveModel, DeriveActiveModel, Eq, Serialize, Deserialize)]
pub struct Model {
    #[serde(skip_deserializing)]
    pub offer_id: Uuid,
    pub application_id: Uuid,
    pub job_id: Uuid,
    pub company_id: Uuid,
    pub student_id: Uuid,
    pub salary: String,
    pub start_date: Option<Date>,
    pub message: Option<String>,
    pub status: OfferStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveColumn)]
pub enum Column {
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

#[derive(Copy, Clone, Debug, EnumIter, DerivePrimaryKey)]
pub enum PrimaryKey {
    OfferId,
}

impl PrimaryKeyTrait for PrimaryKey {
    type ValueType = Uuid;
    fn auto_increment() -> bool {
        false
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    JobApplication,
}

impl ColumnTrait for Column {
    type EntityName = Entity;
    fn def(&self) -> ColumnDef {
        match self {
            Self::OfferId => ColumnType::Uuid.def(),
            Self::ApplicationId => ColumnType::Uuid.def().unique(),
            Self::JobId => ColumnType::Uuid.def(),
            Self::CompanyId => ColumnType::Uuid.def(),
            Self::StudentId => ColumnType::Uuid.def(),
            Self::Salary => ColumnType::String(StringLen::N(100)).def(),
            Self::StartDate => ColumnType::Date.def().null(),
            Self::Message => ColumnType::Text.def().null(),
            Self::Status => OfferStatus::db_type(),
            Self::CreatedAt => ColumnType::DateTime.def(),
            Self::UpdatedAt => ColumnType::DateTime.def(),
        }
    }
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::JobApplication => Entity::belongs_to(super::job_application::Entity)
                .from(Column::ApplicationId)
                .to(super::job_application::Column::ApplicationId)
                .into(),
        }
    }
}

impl Related<super::job_application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobApplication.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
