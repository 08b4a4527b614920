use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::{ApplicationStatus, JobStatus, OfferStatus};
use crate::entities::{job_application, job_offer, job_posting};
use crate::routes::auth::dto::UserResponse;
use crate::routes::certificates::dto::CertificateResponse;

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct JobListQuery {
    /// Defaults to `open`.
    pub status: Option<JobStatus>,
    /// Matches title, description, skills or location.
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    #[schema(example = "Junior Rust Engineer")]
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    #[schema(example = "full-time")]
    pub employment_type: Option<String>,
    pub salary_range: Option<String>,
    #[schema(example = "rust, tokio, sql")]
    pub required_skills: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary_range: Option<String>,
    pub required_skills: Option<String>,
    pub status: Option<JobStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JobResponse {
    pub job_id: Uuid,
    pub company_id: Uuid,
    pub company_name: Option<String>,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary_range: Option<String>,
    pub required_skills: Option<String>,
    pub status: JobStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl JobResponse {
    pub fn new(model: job_posting::Model, company_name: Option<String>) -> Self {
        Self {
            job_id: model.job_id,
            company_id: model.company_id,
            company_name,
            title: model.title,
            description: model.description,
            location: model.location,
            employment_type: model.employment_type,
            salary_range: model.salary_range,
            required_skills: model.required_skills,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub cover_letter: Option<String>,
    /// Certificates to show the company. Must be the applicant's own.
    #[serde(default)]
    pub certificate_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationStatusRequest {
    pub status: ApplicationStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApplicationResponse {
    pub application_id: Uuid,
    pub job_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    pub student_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<UserResponse>,
    pub cover_letter: Option<String>,
    pub certificate_ids: Vec<Uuid>,
    /// Attached certificates, included for the reviewing company.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub certificates: Vec<CertificateResponse>,
    pub status: ApplicationStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<job_application::Model> for ApplicationResponse {
    fn from(model: job_application::Model) -> Self {
        let certificate_ids = model.attached_certificates();
        Self {
            application_id: model.application_id,
            job_id: model.job_id,
            job_title: None,
            student_id: model.student_id,
            student: None,
            cover_letter: model.cover_letter,
            certificate_ids,
            certificates: Vec::new(),
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOfferRequest {
    #[schema(example = "60000 EUR")]
    pub salary: String,
    #[schema(value_type = Option<String>, example = "2024-09-01")]
    pub start_date: Option<NaiveDate>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RespondOfferRequest {
    pub accept: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OfferResponse {
    pub offer_id: Uuid,
    pub application_id: Uuid,
    pub job_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    pub company_id: Uuid,
    pub student_id: Uuid,
    pub salary: String,
    #[schema(value_type = Option<String>)]
    pub start_date: Option<NaiveDate>,
    pub message: Option<String>,
    pub status: OfferStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<job_offer::Model> for OfferResponse {
    fn from(model: job_offer::Model) -> Self {
        Self {
            offer_id: model.offer_id,
            application_id: model.application_id,
            job_id: model.job_id,
            job_title: None,
            company_id: model.company_id,
            student_id: model.student_id,
            salary: model.salary,
            start_date: model.start_date,
            message: model.message,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
