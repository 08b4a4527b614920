use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use chrono::Utc;
use uuid::Uuid;

use super::dto::{CertificateResponse, IssueCertificateRequest, UpdateArtifactsRequest};
use crate::blockchain::NotarizationJob;
use crate::entities::certificate;
use crate::entities::sea_orm_active_enums::{ChainStatus, RoleEnum};
use crate::error::{ApiError, ApiResult};
use crate::extractor::AuthClaims;
use crate::middleware::permission;
use crate::repositories::{
    ArtifactUpdate, CertificateRepository, CourseRepository, NewCertificate, UserRepository,
};
use crate::routes::{is_valid_email, non_empty, normalize_email, parse_id};
use crate::state::AppState;
use crate::utils::certificate_hash::CertificateFingerprint;
use crate::utils::jwt::TokenClaims;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route(
            "/api/certificates",
            get(list_certificates).post(issue_certificate),
        )
        .route("/api/certificates/{id}", get(get_certificate))
        .route("/api/certificates/{id}/artifacts", put(update_artifacts))
}

/// Whether `claims` may read `certificate`: the issuing institute, the
/// learner it was issued to, or an admin.
pub(crate) fn can_view(claims: &TokenClaims, certificate: &certificate::Model) -> bool {
    let Ok(caller) = claims.user_id() else {
        return false;
    };
    match claims.role {
        RoleEnum::Admin => true,
        RoleEnum::Institute => certificate.institute_id == Some(caller),
        RoleEnum::Student => {
            certificate.student_id == Some(caller)
                || certificate.learner_email.eq_ignore_ascii_case(&claims.email)
        }
        RoleEnum::Company => false,
    }
}

/// Issue a certificate
///
/// Stores the certificate with its content hash and queues it for
/// notarization. The response does not wait for the chain.
#[utoipa::path(
    post,
    path = "/api/certificates",
    request_body = IssueCertificateRequest,
    responses(
        (status = 201, description = "Certificate issued", body = CertificateResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 403, description = "Caller is not an approved institute"),
        (status = 404, description = "Course not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Certificates"
)]
pub async fn issue_certificate(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(payload): Json<IssueCertificateRequest>,
) -> ApiResult<(StatusCode, Json<CertificateResponse>)> {
    let institute = permission::verified_user(&state, &claims, &[RoleEnum::Institute]).await?;

    let learner_name = payload.learner_name.trim().to_string();
    if learner_name.is_empty() {
        return Err(ApiError::BadRequest("Learner name is required".to_string()));
    }
    let learner_email = normalize_email(&payload.learner_email);
    if !is_valid_email(&learner_email) {
        return Err(ApiError::BadRequest("Invalid learner email".to_string()));
    }

    let (course_id, course_name) = match payload.course_id {
        Some(course_id) => {
            let course = CourseRepository::new(&state.db)
                .find_by_id(course_id)
                .await?
                .filter(|c| c.institute_id == institute.user_id)
                .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;
            (Some(course.course_id), course.name)
        }
        None => {
            let name = non_empty(payload.course_name)
                .ok_or_else(|| ApiError::BadRequest("Course name is required".to_string()))?;
            (None, name)
        }
    };

    let issue_date = payload
        .issue_date
        .unwrap_or_else(|| Utc::now().date_naive());
    let institute_name = institute.display_organization().to_string();

    let certificate_hash = CertificateFingerprint {
        learner_name: &learner_name,
        course_name: &course_name,
        institute_name: &institute_name,
        issue_date,
    }
    .digest();

    let student_id = UserRepository::new(&state.db)
        .find_by_email(&learner_email)
        .await?
        .filter(|u| u.role == RoleEnum::Student)
        .map(|u| u.user_id);

    let certificate_id = Uuid::new_v4();
    let chain_status = if state.notarizer.is_some() {
        ChainStatus::Pending
    } else {
        ChainStatus::Disabled
    };

    let certificate = CertificateRepository::new(&state.db)
        .create(NewCertificate {
            certificate_id,
            learner_name,
            learner_email,
            student_id,
            course_name,
            course_id,
            institute_name,
            institute_id: Some(institute.user_id),
            issue_date,
            certificate_hash,
            chain_status,
            qr_payload: state.config.verification_url(&certificate_id),
        })
        .await?;

    tracing::info!(
        certificate_id = %certificate.certificate_id,
        institute_id = %institute.user_id,
        hash = %certificate.certificate_hash,
        "Certificate issued"
    );

    if let Some(notarizer) = &state.notarizer {
        // The row stays `pending` and is picked up by the next reconcile.
        if let Err(e) = notarizer.submit(NotarizationJob::from(&certificate)) {
            tracing::error!(certificate_id = %certificate.certificate_id, error = %e, "Failed to queue notarization");
        }
    }

    Ok((StatusCode::CREATED, Json(certificate.into())))
}

/// List certificates visible to the caller
#[utoipa::path(
    get,
    path = "/api/certificates",
    responses(
        (status = 200, description = "Certificates", body = Vec<CertificateResponse>),
        (status = 403, description = "Companies cannot list certificates")
    ),
    security(("bearer_auth" = [])),
    tag = "Certificates"
)]
pub async fn list_certificates(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
) -> ApiResult<Json<Vec<CertificateResponse>>> {
    let caller = permission::caller_id(&claims)?;
    let repo = CertificateRepository::new(&state.db);

    let certificates = match claims.role {
        RoleEnum::Admin => repo.find_all().await?,
        RoleEnum::Institute => repo.find_by_institute(caller).await?,
        RoleEnum::Student => repo.find_for_student(caller, &claims.email).await?,
        RoleEnum::Company => return Err(ApiError::forbidden()),
    };

    Ok(Json(certificates.into_iter().map(Into::into).collect()))
}

/// Get one certificate
#[utoipa::path(
    get,
    path = "/api/certificates/{id}",
    params(("id" = String, Path, description = "Certificate id")),
    responses(
        (status = 200, description = "Certificate", body = CertificateResponse),
        (status = 403, description = "Not the issuer, learner or an admin"),
        (status = 404, description = "Certificate not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Certificates"
)]
pub async fn get_certificate(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
) -> ApiResult<Json<CertificateResponse>> {
    let certificate_id = parse_id(&id, "Certificate")?;
    let certificate = CertificateRepository::new(&state.db)
        .find_by_id(certificate_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Certificate not found".to_string()))?;

    if !can_view(&claims, &certificate) {
        return Err(ApiError::forbidden());
    }

    Ok(Json(certificate.into()))
}

/// Record rendered PDF and IPFS locations
///
/// Called by the PDF renderer and IPFS pinning collaborators after they
/// have produced their artifacts. Hashed fields are never changed.
#[utoipa::path(
    put,
    path = "/api/certificates/{id}/artifacts",
    params(("id" = String, Path, description = "Certificate id")),
    request_body = UpdateArtifactsRequest,
    responses(
        (status = 200, description = "Updated certificate", body = CertificateResponse),
        (status = 403, description = "Not the issuing institute"),
        (status = 404, description = "Certificate not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Certificates"
)]
pub async fn update_artifacts(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
    Json(payload): Json<UpdateArtifactsRequest>,
) -> ApiResult<Json<CertificateResponse>> {
    let institute = permission::verified_user(&state, &claims, &[RoleEnum::Institute]).await?;
    let certificate_id = parse_id(&id, "Certificate")?;

    let repo = CertificateRepository::new(&state.db);
    let certificate = repo
        .find_by_id(certificate_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Certificate not found".to_string()))?;

    if certificate.institute_id != Some(institute.user_id) {
        return Err(ApiError::forbidden());
    }

    let update = ArtifactUpdate {
        pdf_path: non_empty(payload.pdf_path),
        ipfs_hash: non_empty(payload.ipfs_hash),
        ipfs_url: non_empty(payload.ipfs_url),
    };
    if update.pdf_path.is_none() && update.ipfs_hash.is_none() && update.ipfs_url.is_none() {
        return Err(ApiError::BadRequest(
            "Provide at least one of pdfPath, ipfsHash or ipfsUrl".to_string(),
        ));
    }

    let certificate = repo.update_artifacts(certificate, update).await?;
    Ok(Json(certificate.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn certificate(institute_id: Uuid, student_id: Option<Uuid>) -> certificate::Model {
        let now = Utc::now().naive_utc();
        certificate::Model {
            certificate_id: Uuid::new_v4(),
            learner_name: "Ada".to_string(),
            learner_email: "ada@example.com".to_string(),
            student_id,
            course_name: "Rust".to_string(),
            course_id: None,
            institute_name: "Ferris Academy".to_string(),
            institute_id: Some(institute_id),
            issue_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            certificate_hash: String::new(),
            blockchain_tx_hash: None,
            chain_status: ChainStatus::Pending,
            chain_error: None,
            notarized_at: None,
            qr_payload: String::new(),
            pdf_path: None,
            ipfs_hash: None,
            ipfs_url: None,
            created_at: now,
        }
    }

    fn claims(user_id: Uuid, role: RoleEnum, email: &str) -> TokenClaims {
        TokenClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            name: String::new(),
            iat: 0,
            exp: 0,
        }
    }

    #[test]
    fn visibility_by_role() {
        let institute = Uuid::new_v4();
        let cert = certificate(institute, None);

        assert!(can_view(&claims(institute, RoleEnum::Institute, "i@x.io"), &cert));
        assert!(!can_view(&claims(Uuid::new_v4(), RoleEnum::Institute, "j@x.io"), &cert));
        assert!(can_view(&claims(Uuid::new_v4(), RoleEnum::Admin, "a@x.io"), &cert));
        assert!(!can_view(&claims(Uuid::new_v4(), RoleEnum::Company, "c@x.io"), &cert));
        // Not linked yet, matched by email.
        assert!(can_view(&claims(Uuid::new_v4(), RoleEnum::Student, "ADA@example.com"), &cert));
        assert!(!can_view(&claims(Uuid::new_v4(), RoleEnum::Student, "bob@example.com"), &cert));
    }
}
