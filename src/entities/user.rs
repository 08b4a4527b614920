//! `SeaORM` Entity for users table

use sea_orm::{entity::prelude::*, sea_query::StringLen};
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::RoleEnum;

#[derive(Copy, Clone, Default, Debug, DeriveEntity)]
pub struct Entity;

impl EntityName for Entity {
    fn table_name(&self) -> &str {
        "users"
    }
}

#[derive(Clone, Debug, PartialEq, DeriveModel, DeriveActiveModel, Eq, Serialize, Deserialize)]
pub struct Model {
    #[serde(skip_deserializing)]
    pub user_id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: RoleEnum,
    pub full_name: String,
    pub organization: Option<String>,
    pub phone: Option<String>,
    pub verified: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Model {
    /// Name printed on certificates issued by this account.
    pub fn display_organization(&self) -> &str {
        self.organization
            .as_deref()
            .filter(|o| !o.trim().is_empty())
            .unwrap_or(&self.full_name)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveColumn)]
pub enum Column {
    UserId,
    Email,
    Password,
    Role,
    FullName,
    Organization,
    Phone,
    Verified,
    CreatedAt,
    UpdatedAt,
}

#[derive(Copy, Clone, Debug, EnumIter, DerivePrimaryKey)]
pub enum PrimaryKey {
    UserId,
}

impl PrimaryKeyTrait for PrimaryKey {
    type ValueType = Uuid;
    fn auto_increment() -> bool {
        false
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Course,
    JobPosting,
    JobApplication,
    StudentProfile,
}

impl ColumnTrait for Column {
    type EntityName = Entity;
    fn def(&self) -> ColumnDef {
        match self {
            Self::UserId => ColumnType::Uuid.def(),
            Self::Email => ColumnType::String(StringLen::N(255)).def().unique(),
            Self::Password => ColumnType::String(StringLen::N(255)).def(),
            Self::Role => RoleEnum::db_type(),
            Self::FullName => ColumnType::String(StringLen::N(255)).def(),
            Self::Organization => ColumnType::String(StringLen::N(255)).def().null(),
            Self::Phone => ColumnType::String(StringLen::N(50)).def().null(),
            Self::Verified => ColumnType::Boolean.def(),
            Self::CreatedAt => ColumnType::DateTime.def(),
            Self::UpdatedAt => ColumnType::DateTime.def(),
        }
    }
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Course => Entity::has_many(super::course::Entity).into(),
            Self::JobPosting => Entity::has_many(super::job_posting::Entity).into(),
            Self::JobApplication => Entity::has_many(super::job_application::Entity).into(),
            Self::StudentProfile => Entity::has_one(super::student_profile::Entity).into(),
        }
    }
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::job_posting::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobPosting.def()
    }
}

impl Related<super::student_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
