use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::course;

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct CourseListQuery {
    pub institute_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    #[schema(example = "Systems Programming in Rust")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[schema(example = "12 weeks")]
    pub duration: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseResponse {
    pub course_id: Uuid,
    pub institute_id: Uuid,
    pub name: String,
    pub description: String,
    pub duration: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<course::Model> for CourseResponse {
    fn from(model: course::Model) -> Self {
        Self {
            course_id: model.course_id,
            institute_id: model.institute_id,
            name: model.name,
            description: model.description,
            duration: model.duration,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
