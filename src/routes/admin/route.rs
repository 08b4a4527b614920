use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, put},
};

use super::dto::{UserListQuery, UserListResponse};
use crate::config::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::error::{ApiError, ApiResult};
use crate::extractor::AuthClaims;
use crate::middleware::permission;
use crate::repositories::{CertificateRepository, UserFilter, UserRepository};
use crate::routes::auth::dto::{MessageResponse, UserResponse};
use crate::routes::certificates::dto::CertificateResponse;
use crate::routes::parse_id;
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/pending", get(list_pending))
        .route("/api/admin/users/{id}/approve", put(approve_user))
        .route("/api/admin/users/{id}/reject", put(reject_user))
        .route("/api/admin/users/{id}", delete(delete_user))
        .route("/api/admin/certificates", get(list_all_certificates))
}

/// List users with filters and pagination
#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(UserListQuery),
    responses(
        (status = 200, description = "Page of users", body = UserListResponse),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Json<UserListResponse>> {
    permission::is_admin(&claims)?;

    let page = query.page.unwrap_or(1).max(1);
    let page_size = query
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let (users, total) = UserRepository::new(&state.db)
        .find_all_with_pagination(
            page,
            page_size,
            UserFilter {
                role: query.role,
                verified: query.verified,
                search: query.search,
            },
        )
        .await?;

    Ok(Json(UserListResponse {
        users: users.into_iter().map(Into::into).collect(),
        total,
        page,
        page_size,
        total_pages: total.div_ceil(page_size),
    }))
}

/// Institutes and companies awaiting approval
#[utoipa::path(
    get,
    path = "/api/admin/pending",
    responses(
        (status = 200, description = "Pending accounts", body = Vec<UserResponse>),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_pending(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
) -> ApiResult<Json<Vec<UserResponse>>> {
    permission::is_admin(&claims)?;
    let users = UserRepository::new(&state.db).find_pending().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

async fn set_verified(state: &AppState, id: &str, verified: bool) -> ApiResult<UserResponse> {
    let user_id = parse_id(id, "User")?;
    let repo = UserRepository::new(&state.db);
    if repo.find_by_id(user_id).await?.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let user_info = repo.set_verified(user_id, verified).await?;
    tracing::info!(user_id = %user_id, verified, "Account verification changed");
    Ok(user_info.into())
}

/// Approve an account
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/approve",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Approved user", body = UserResponse),
        (status = 403, description = "Admin only"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn approve_user(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    permission::is_admin(&claims)?;
    Ok(Json(set_verified(&state, &id, true).await?))
}

/// Reject (or revoke) an account
///
/// The account is kept but cannot sign in.
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/reject",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Rejected user", body = UserResponse),
        (status = 403, description = "Admin only"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn reject_user(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    permission::is_admin(&claims)?;
    let caller = permission::caller_id(&claims)?;
    if parse_id(&id, "User")? == caller {
        return Err(ApiError::BadRequest("You cannot reject your own account".to_string()));
    }
    Ok(Json(set_verified(&state, &id, false).await?))
}

/// Delete an account
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Cannot delete yourself"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    permission::is_admin(&claims)?;
    let user_id = parse_id(&id, "User")?;
    if user_id == permission::caller_id(&claims)? {
        return Err(ApiError::BadRequest("You cannot delete your own account".to_string()));
    }

    let result = UserRepository::new(&state.db).delete(user_id).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = %user_id, "Account deleted");
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// Every issued certificate
#[utoipa::path(
    get,
    path = "/api/admin/certificates",
    responses(
        (status = 200, description = "All certificates", body = Vec<CertificateResponse>),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_all_certificates(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
) -> ApiResult<Json<Vec<CertificateResponse>>> {
    permission::is_admin(&claims)?;
    let certificates = CertificateRepository::new(&state.db).find_all().await?;
    Ok(Json(certificates.into_iter().map(Into::into).collect()))
}
