use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use uuid::Uuid;

use super::dto::{VerificationFailure, VerificationResponse};
use crate::entities::certificate;
use crate::error::ApiResult;
use crate::repositories::CertificateRepository;
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/verify/{id}", get(verify_by_id))
        .route("/api/verify/hash/{hash}", get(verify_by_hash))
}

fn respond(found: Option<certificate::Model>) -> Response {
    match found {
        Some(certificate) => Json(VerificationResponse::from(certificate)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(VerificationFailure {
                valid: false,
                error: "Certificate not found".to_string(),
            }),
        )
            .into_response(),
    }
}

/// Verify a certificate by id
///
/// Public. Used by the QR code link printed on every certificate.
#[utoipa::path(
    get,
    path = "/api/verify/{id}",
    params(("id" = String, Path, description = "Certificate id")),
    responses(
        (status = 200, description = "Certificate found", body = VerificationResponse),
        (status = 404, description = "Unknown certificate", body = VerificationFailure)
    ),
    tag = "Verification"
)]
pub async fn verify_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let Ok(certificate_id) = Uuid::parse_str(id.trim()) else {
        return Ok(respond(None));
    };

    let found = CertificateRepository::new(&state.db)
        .find_by_id(certificate_id)
        .await?;
    Ok(respond(found))
}

/// Verify a certificate by its content hash
#[utoipa::path(
    get,
    path = "/api/verify/hash/{hash}",
    params(("hash" = String, Path, description = "SHA-256 hex of the certificate fields")),
    responses(
        (status = 200, description = "Certificate found", body = VerificationResponse),
        (status = 404, description = "Unknown hash", body = VerificationFailure)
    ),
    tag = "Verification"
)]
pub async fn verify_by_hash(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> ApiResult<Response> {
    let hash = hash.trim().trim_start_matches("0x");
    if hash.len() != 64 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return Ok(respond(None));
    }

    let found = CertificateRepository::new(&state.db)
        .find_by_hash(hash)
        .await?;
    Ok(respond(found))
}
