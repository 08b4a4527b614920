use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::certificate;
use crate::entities::sea_orm_active_enums::ChainStatus;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueCertificateRequest {
    #[schema(example = "Ada Lovelace")]
    pub learner_name: String,

    #[schema(example = "ada@example.com")]
    pub learner_email: String,

    /// Required unless `courseId` is given.
    #[schema(example = "Systems Programming in Rust")]
    pub course_name: Option<String>,

    /// One of the caller's courses. Supplies the course name.
    pub course_id: Option<Uuid>,

    /// Defaults to today (UTC).
    #[schema(value_type = Option<String>, example = "2024-05-01")]
    pub issue_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArtifactsRequest {
    pub pdf_path: Option<String>,
    pub ipfs_hash: Option<String>,
    pub ipfs_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CertificateResponse {
    pub certificate_id: Uuid,
    pub learner_name: String,
    pub learner_email: String,
    pub student_id: Option<Uuid>,
    pub course_name: String,
    pub course_id: Option<Uuid>,
    pub institute_name: String,
    pub institute_id: Option<Uuid>,
    #[schema(value_type = String, example = "2024-05-01")]
    pub issue_date: NaiveDate,
    pub certificate_hash: String,
    pub blockchain_tx_hash: Option<String>,
    pub chain_status: ChainStatus,
    pub chain_error: Option<String>,
    pub notarized_at: Option<NaiveDateTime>,
    /// Verification URL encoded in the certificate's QR code.
    pub qr_payload: String,
    pub pdf_path: Option<String>,
    pub ipfs_hash: Option<String>,
    pub ipfs_url: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<certificate::Model> for CertificateResponse {
    fn from(model: certificate::Model) -> Self {
        Self {
            certificate_id: model.certificate_id,
            learner_name: model.learner_name,
            learner_email: model.learner_email,
            student_id: model.student_id,
            course_name: model.course_name,
            course_id: model.course_id,
            institute_name: model.institute_name,
            institute_id: model.institute_id,
            issue_date: model.issue_date,
            certificate_hash: model.certificate_hash,
            blockchain_tx_hash: model.blockchain_tx_hash,
            chain_status: model.chain_status,
            chain_error: model.chain_error,
            notarized_at: model.notarized_at,
            qr_payload: model.qr_payload,
            pdf_path: model.pdf_path,
            ipfs_hash: model.ipfs_hash,
            ipfs_url: model.ipfs_url,
            created_at: model.created_at,
        }
    }
}
