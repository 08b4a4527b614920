use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use super::dto::{
    ProfileResponse, StudentDetail, StudentSearchQuery, StudentSummary, UpdateProfileRequest,
};
use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::error::{ApiError, ApiResult};
use crate::extractor::AuthClaims;
use crate::middleware::permission;
use crate::repositories::{
    CertificateRepository, ProfileUpdate, StudentProfileRepository, UserRepository,
};
use crate::routes::certificates::dto::CertificateResponse;
use crate::routes::{non_empty, parse_id};
use crate::state::AppState;

const VIEWER_ROLES: [RoleEnum; 3] = [RoleEnum::Company, RoleEnum::Institute, RoleEnum::Admin];

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/students", get(list_students))
        .route("/api/students/profile", get(get_profile).put(update_profile))
        .route("/api/students/certificates", get(my_certificates))
        .route("/api/students/{id}", get(get_student))
}

/// The calling student's profile
#[utoipa::path(
    get,
    path = "/api/students/profile",
    responses(
        (status = 200, description = "Profile, empty when never saved", body = ProfileResponse),
        (status = 403, description = "Students only")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
) -> ApiResult<Json<ProfileResponse>> {
    permission::require_role(&claims, &[RoleEnum::Student])?;
    let student_id = permission::caller_id(&claims)?;

    let profile = StudentProfileRepository::new(&state.db)
        .find_by_student(student_id)
        .await?
        .map(Into::into)
        .unwrap_or_else(|| ProfileResponse::empty(student_id));
    Ok(Json(profile))
}

/// Create or update the calling student's profile
#[utoipa::path(
    put,
    path = "/api/students/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Saved profile", body = ProfileResponse),
        (status = 403, description = "Students only")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    let student = permission::verified_user(&state, &claims, &[RoleEnum::Student]).await?;

    let profile = StudentProfileRepository::new(&state.db)
        .upsert(
            student.user_id,
            ProfileUpdate {
                bio: non_empty(payload.bio),
                skills: non_empty(payload.skills),
                education: non_empty(payload.education),
                linkedin_url: non_empty(payload.linkedin_url),
                github_url: non_empty(payload.github_url),
                resume_url: non_empty(payload.resume_url),
            },
        )
        .await?;
    Ok(Json(profile.into()))
}

/// Certificates issued to the calling student
#[utoipa::path(
    get,
    path = "/api/students/certificates",
    responses(
        (status = 200, description = "Own certificates", body = Vec<CertificateResponse>),
        (status = 403, description = "Students only")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn my_certificates(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
) -> ApiResult<Json<Vec<CertificateResponse>>> {
    permission::require_role(&claims, &[RoleEnum::Student])?;
    let student_id = permission::caller_id(&claims)?;

    let certificates = CertificateRepository::new(&state.db)
        .find_for_student(student_id, &claims.email)
        .await?;
    Ok(Json(certificates.into_iter().map(Into::into).collect()))
}

/// Browse students
#[utoipa::path(
    get,
    path = "/api/students",
    params(StudentSearchQuery),
    responses(
        (status = 200, description = "Students with profiles", body = Vec<StudentSummary>),
        (status = 403, description = "Companies, institutes and admins only")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn list_students(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Query(query): Query<StudentSearchQuery>,
) -> ApiResult<Json<Vec<StudentSummary>>> {
    permission::require_role(&claims, &VIEWER_ROLES)?;

    let students = UserRepository::new(&state.db)
        .find_students(query.search.as_deref())
        .await?;

    let profile_repo = StudentProfileRepository::new(&state.db);
    let mut summaries = Vec::with_capacity(students.len());
    for student in students {
        let profile = profile_repo
            .find_by_student(student.user_id)
            .await?
            .map(Into::into)
            .unwrap_or_else(|| ProfileResponse::empty(student.user_id));
        summaries.push(StudentSummary {
            user: student.into(),
            profile,
        });
    }

    Ok(Json(summaries))
}

/// One student's account, profile and certificates
#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(("id" = String, Path, description = "Student user id")),
    responses(
        (status = 200, description = "Student detail", body = StudentDetail),
        (status = 403, description = "Not allowed to view this student"),
        (status = 404, description = "Student not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn get_student(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
) -> ApiResult<Json<StudentDetail>> {
    let student_id = parse_id(&id, "Student")?;
    let is_self = permission::caller_id(&claims)? == student_id;
    if !is_self {
        permission::require_role(&claims, &VIEWER_ROLES)?;
    }

    let student = UserRepository::new(&state.db)
        .find_by_id(student_id)
        .await?
        .filter(|u| u.role == RoleEnum::Student)
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;

    let profile = StudentProfileRepository::new(&state.db)
        .find_by_student(student_id)
        .await?
        .map(Into::into)
        .unwrap_or_else(|| ProfileResponse::empty(student_id));

    let certificates = CertificateRepository::new(&state.db)
        .find_for_student(student_id, &student.email)
        .await?;

    Ok(Json(StudentDetail {
        user: student.into(),
        profile,
        certificates: certificates.into_iter().map(Into::into).collect(),
    }))
}
