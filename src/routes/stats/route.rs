use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::NaiveDateTime;

use super::dto::{
    CertificateCounts, CertificateStatsResponse, DateRangeQuery, InstituteStatsResponse,
    PlatformStatsResponse, TimeSeriesPoint, UserCounts,
};
use crate::entities::sea_orm_active_enums::{ChainStatus, JobStatus, RoleEnum};
use crate::error::{ApiError, ApiResult};
use crate::extractor::AuthClaims;
use crate::middleware::permission;
use crate::repositories::{
    ApplicationRepository, CertificateRepository, CourseRepository, JobRepository, UserRepository,
};
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/stats", get(platform_stats))
        .route("/api/stats/institute", get(institute_stats))
        .route("/api/stats/certificates", get(certificate_stats))
}

fn to_date(dt: NaiveDateTime) -> String {
    dt.date().format("%Y-%m-%d").to_string()
}

/// Platform totals
#[utoipa::path(
    get,
    path = "/api/stats",
    responses((status = 200, description = "Platform statistics", body = PlatformStatsResponse)),
    tag = "Statistics"
)]
pub async fn platform_stats(State(state): State<AppState>) -> ApiResult<Json<PlatformStatsResponse>> {
    let users = UserRepository::new(&state.db);
    let certificates = CertificateRepository::new(&state.db);

    Ok(Json(PlatformStatsResponse {
        users: UserCounts {
            total: users.count_by_role(None).await?,
            admins: users.count_by_role(Some(RoleEnum::Admin)).await?,
            institutes: users.count_by_role(Some(RoleEnum::Institute)).await?,
            students: users.count_by_role(Some(RoleEnum::Student)).await?,
            companies: users.count_by_role(Some(RoleEnum::Company)).await?,
        },
        certificates: CertificateCounts {
            total: certificates.count(None, None).await?,
            notarized: certificates.count(None, Some(ChainStatus::Confirmed)).await?,
        },
        courses: CourseRepository::new(&state.db).count(None).await?,
        open_jobs: JobRepository::new(&state.db)
            .count(Some(JobStatus::Open))
            .await?,
        applications: ApplicationRepository::new(&state.db).count(None).await?,
    }))
}

/// Totals for the calling institute
#[utoipa::path(
    get,
    path = "/api/stats/institute",
    responses(
        (status = 200, description = "Institute statistics", body = InstituteStatsResponse),
        (status = 403, description = "Institutes only")
    ),
    security(("bearer_auth" = [])),
    tag = "Statistics"
)]
pub async fn institute_stats(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
) -> ApiResult<Json<InstituteStatsResponse>> {
    permission::require_role(&claims, &[RoleEnum::Institute])?;
    let institute_id = permission::caller_id(&claims)?;
    let certificates = CertificateRepository::new(&state.db);

    Ok(Json(InstituteStatsResponse {
        certificates_issued: certificates.count(Some(institute_id), None).await?,
        certificates_notarized: certificates
            .count(Some(institute_id), Some(ChainStatus::Confirmed))
            .await?,
        courses: CourseRepository::new(&state.db)
            .count(Some(institute_id))
            .await?,
    }))
}

/// Certificates issued per day
#[utoipa::path(
    get,
    path = "/api/stats/certificates",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Certificate statistics", body = CertificateStatsResponse),
        (status = 400, description = "Invalid date range"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Statistics"
)]
pub async fn certificate_stats(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Query(query): Query<DateRangeQuery>,
) -> ApiResult<Json<CertificateStatsResponse>> {
    permission::is_admin(&claims)?;

    let (start, end) = query.to_range().map_err(ApiError::BadRequest)?;

    let rows = CertificateRepository::new(&state.db)
        .find_created_between(start, end)
        .await?;

    let mut map = BTreeMap::<String, i64>::new();
    for certificate in &rows {
        *map.entry(to_date(certificate.created_at)).or_insert(0) += 1;
    }

    let certificates_per_day = map
        .into_iter()
        .map(|(date, count)| TimeSeriesPoint { date, count })
        .collect();

    Ok(Json(CertificateStatsResponse {
        total: rows.len() as i64,
        certificates_per_day,
    }))
}
