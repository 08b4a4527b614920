use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::student_profile;
use crate::routes::auth::dto::UserResponse;
use crate::routes::certificates::dto::CertificateResponse;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub bio: Option<String>,
    #[schema(example = "rust, postgres, distributed systems")]
    pub skills: Option<String>,
    pub education: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub resume_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub student_id: Uuid,
    pub bio: Option<String>,
    pub skills: Option<String>,
    pub education: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub resume_url: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
}

impl ProfileResponse {
    /// An empty profile for students who have not filled one in yet.
    pub fn empty(student_id: Uuid) -> Self {
        Self {
            student_id,
            ..Default::default()
        }
    }
}

impl From<student_profile::Model> for ProfileResponse {
    fn from(model: student_profile::Model) -> Self {
        Self {
            student_id: model.student_id,
            bio: model.bio,
            skills: model.skills,
            education: model.education,
            linkedin_url: model.linkedin_url,
            github_url: model.github_url,
            resume_url: model.resume_url,
            updated_at: Some(model.updated_at),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct StudentSearchQuery {
    /// Matches name or email.
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentSummary {
    pub user: UserResponse,
    pub profile: ProfileResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentDetail {
    pub user: UserResponse,
    pub profile: ProfileResponse,
    pub certificates: Vec<CertificateResponse>,
}
