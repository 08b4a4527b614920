use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};

use super::dto::{CourseListQuery, CourseResponse, CreateCourseRequest, UpdateCourseRequest};
use crate::entities::course;
use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::error::{ApiError, ApiResult};
use crate::extractor::AuthClaims;
use crate::middleware::permission;
use crate::repositories::{CourseRepository, CourseUpdate};
use crate::routes::auth::dto::MessageResponse;
use crate::routes::{non_empty, parse_id};
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/courses", get(list_courses).post(create_course))
        .route(
            "/api/courses/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
}

async fn find_course(state: &AppState, id: &str) -> ApiResult<course::Model> {
    let course_id = parse_id(id, "Course")?;
    CourseRepository::new(&state.db)
        .find_by_id(course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))
}

/// List courses, optionally for one institute
#[utoipa::path(
    get,
    path = "/api/courses",
    params(CourseListQuery),
    responses((status = 200, description = "Courses", body = Vec<CourseResponse>)),
    tag = "Courses"
)]
pub async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<CourseListQuery>,
) -> ApiResult<Json<Vec<CourseResponse>>> {
    let courses = CourseRepository::new(&state.db)
        .find_all(query.institute_id)
        .await?;
    Ok(Json(courses.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(("id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course", body = CourseResponse),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses"
)]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CourseResponse>> {
    Ok(Json(find_course(&state, &id).await?.into()))
}

#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseResponse),
        (status = 400, description = "Name missing"),
        (status = 403, description = "Caller is not an approved institute")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn create_course(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(payload): Json<CreateCourseRequest>,
) -> ApiResult<(StatusCode, Json<CourseResponse>)> {
    let institute = permission::verified_user(&state, &claims, &[RoleEnum::Institute]).await?;

    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Course name is required".to_string()));
    }

    let course = CourseRepository::new(&state.db)
        .create(
            institute.user_id,
            name,
            payload.description.trim().to_string(),
            non_empty(payload.duration),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(course.into())))
}

#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    params(("id" = String, Path, description = "Course id")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Course updated", body = CourseResponse),
        (status = 403, description = "Not the owning institute"),
        (status = 404, description = "Course not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn update_course(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCourseRequest>,
) -> ApiResult<Json<CourseResponse>> {
    let institute = permission::verified_user(&state, &claims, &[RoleEnum::Institute]).await?;
    let course = find_course(&state, &id).await?;
    if course.institute_id != institute.user_id {
        return Err(ApiError::forbidden());
    }

    let name = non_empty(payload.name);
    let updated = CourseRepository::new(&state.db)
        .update(
            course,
            CourseUpdate {
                name,
                description: payload.description.map(|d| d.trim().to_string()),
                duration: non_empty(payload.duration),
            },
        )
        .await?;

    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    params(("id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course deleted", body = MessageResponse),
        (status = 403, description = "Not the owning institute or an admin"),
        (status = 404, description = "Course not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn delete_course(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    permission::require_role(&claims, &[RoleEnum::Institute, RoleEnum::Admin])?;
    let course = find_course(&state, &id).await?;

    if claims.role != RoleEnum::Admin && course.institute_id != permission::caller_id(&claims)? {
        return Err(ApiError::forbidden());
    }

    CourseRepository::new(&state.db)
        .delete(course.course_id)
        .await?;
    Ok(Json(MessageResponse::new("Course deleted successfully")))
}
