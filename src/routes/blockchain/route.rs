use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use super::dto::{ChainStatusResponse, OnChainVerificationResponse, ReconcileResponse};
use crate::entities::sea_orm_active_enums::ChainStatus;
use crate::error::{ApiError, ApiResult};
use crate::extractor::AuthClaims;
use crate::middleware::permission;
use crate::repositories::CertificateRepository;
use crate::routes::parse_id;
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/blockchain/status", get(chain_status))
        .route("/api/blockchain/verify/{id}", get(verify_on_chain))
        .route("/api/blockchain/reconcile", post(reconcile))
}

fn chain_disabled() -> ApiError {
    ApiError::ServiceUnavailable("Blockchain notarization is not configured".to_string())
}

/// Notarization configuration and queue counters
#[utoipa::path(
    get,
    path = "/api/blockchain/status",
    responses((status = 200, description = "Chain status", body = ChainStatusResponse)),
    tag = "Blockchain"
)]
pub async fn chain_status(State(state): State<AppState>) -> ApiResult<Json<ChainStatusResponse>> {
    let repo = CertificateRepository::new(&state.db);

    Ok(Json(ChainStatusResponse {
        enabled: state.notary.is_some(),
        chain_id: state.notary.as_ref().map(|n| n.chain_id()),
        contract_address: state.notary.as_ref().map(|n| n.contract_address()),
        pending: repo.count(None, Some(ChainStatus::Pending)).await?,
        confirmed: repo.count(None, Some(ChainStatus::Confirmed)).await?,
        failed: repo.count(None, Some(ChainStatus::Failed)).await?,
    }))
}

/// Compare the stored hash with the one recorded on chain
#[utoipa::path(
    get,
    path = "/api/blockchain/verify/{id}",
    params(("id" = String, Path, description = "Certificate id")),
    responses(
        (status = 200, description = "On-chain record", body = OnChainVerificationResponse),
        (status = 404, description = "Certificate not found"),
        (status = 503, description = "Blockchain not configured or unreachable")
    ),
    tag = "Blockchain"
)]
pub async fn verify_on_chain(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<OnChainVerificationResponse>> {
    let notary = state.notary.clone().ok_or_else(chain_disabled)?;
    let certificate_id = parse_id(&id, "Certificate")?;

    let certificate = CertificateRepository::new(&state.db)
        .find_by_id(certificate_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Certificate not found".to_string()))?;

    let record = notary
        .verify_certificate(&certificate_id.to_string())
        .await
        .map_err(|e| {
            tracing::warn!(%certificate_id, error = %e, "On-chain lookup failed");
            ApiError::ServiceUnavailable("Blockchain node unreachable".to_string())
        })?;

    let matches = record.exists() && record.certificate_hash == certificate.certificate_hash;

    Ok(Json(OnChainVerificationResponse {
        certificate_id,
        on_chain_hash: record.certificate_hash,
        stored_hash: certificate.certificate_hash,
        matches,
        timestamp: record.timestamp,
        issuer: record.issuer,
    }))
}

/// Re-queue pending and failed notarizations
#[utoipa::path(
    post,
    path = "/api/blockchain/reconcile",
    responses(
        (status = 200, description = "Certificates re-queued", body = ReconcileResponse),
        (status = 403, description = "Admin only"),
        (status = 503, description = "Blockchain not configured")
    ),
    security(("bearer_auth" = [])),
    tag = "Blockchain"
)]
pub async fn reconcile(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
) -> ApiResult<Json<ReconcileResponse>> {
    permission::is_admin(&claims)?;
    let notarizer = state.notarizer.as_ref().ok_or_else(chain_disabled)?;
    let requeued = notarizer.reconcile(&state.db).await?;
    Ok(Json(ReconcileResponse { requeued }))
}
