use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use super::dto::{
    ChangePasswordRequest, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
    RegisterResponse, UserResponse,
};
use crate::config::MIN_PASSWORD_LENGTH;
use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::entities::user;
use crate::error::{ApiError, ApiResult};
use crate::extractor::AuthClaims;
use crate::middleware::permission;
use crate::repositories::{CertificateRepository, NewUser, UserRepository};
use crate::routes::{is_valid_email, non_empty, normalize_email};
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .route("/api/auth/change-password", post(change_password))
}

fn issue_token(state: &AppState, user: &user::Model) -> ApiResult<String> {
    let token = state.jwt.create_jwt(
        &user.user_id.to_string(),
        &user.email,
        &user.full_name,
        user.role,
    )?;
    Ok(token)
}

fn check_password_length(password: &str) -> ApiResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Register a new account
///
/// Institutes and companies are created unverified and receive no token
/// until an admin approves them.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid email, password or name"),
        (status = 403, description = "Admin self-registration disabled"),
        (status = 409, description = "Email already registered")
    ),
    tag = "Authentication"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let email = normalize_email(&payload.email);
    if !is_valid_email(&email) {
        return Err(ApiError::BadRequest("Invalid email address".to_string()));
    }
    check_password_length(&payload.password)?;

    let full_name = payload.full_name.trim().to_string();
    if full_name.is_empty() {
        return Err(ApiError::BadRequest("Full name is required".to_string()));
    }

    if payload.role == RoleEnum::Admin && !state.config.allow_admin_signup {
        return Err(ApiError::Forbidden(
            "Admin accounts cannot be self-registered".to_string(),
        ));
    }

    let user_repo = UserRepository::new(&state.db);
    if user_repo.email_exists(&email).await? {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let password = bcrypt::hash(&payload.password, state.config.bcrypt_cost)?;
    let pending = payload.role.requires_approval();

    let user_info = user_repo
        .create(NewUser {
            email: email.clone(),
            password,
            role: payload.role,
            full_name,
            organization: non_empty(payload.organization),
            phone: non_empty(payload.phone),
            verified: !pending,
        })
        .await?;

    tracing::info!(
        user_id = %user_info.user_id,
        role = user_info.role.as_str(),
        pending,
        "Account registered"
    );

    if pending {
        return Ok((
            StatusCode::CREATED,
            Json(RegisterResponse {
                pending: true,
                message: Some(
                    "Registration received. You can sign in once an admin approves your account."
                        .to_string(),
                ),
                token: None,
                user: user_info.into(),
            }),
        ));
    }

    if user_info.role == RoleEnum::Student {
        let linked = CertificateRepository::new(&state.db)
            .link_student_by_email(&email, user_info.user_id)
            .await?;
        if linked > 0 {
            tracing::info!(user_id = %user_info.user_id, linked, "Linked existing certificates");
        }
    }

    let token = issue_token(&state, &user_info)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            pending: false,
            message: None,
            token: Some(token),
            user: user_info.into(),
        }),
    ))
}

/// Login endpoint - returns JWT token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account awaiting approval")
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let email = normalize_email(&payload.email);
    let user_info = UserRepository::new(&state.db)
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    if !bcrypt::verify(&payload.password, &user_info.password)? {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    if !user_info.verified {
        return Err(ApiError::Forbidden(
            "Account is awaiting admin approval".to_string(),
        ));
    }

    let token = issue_token(&state, &user_info)?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt.expires_in(),
        user: user_info.into(),
    }))
}

/// Current account
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn me(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
) -> ApiResult<Json<UserResponse>> {
    let user_info = permission::current_user(&state, &claims).await?;
    Ok(Json(user_info.into()))
}

/// Change password for the authenticated user
#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "New password too short"),
        (status = 401, description = "Old password incorrect")
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn change_password(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let user_info = permission::current_user(&state, &claims).await?;

    if !bcrypt::verify(&payload.old_password, &user_info.password)? {
        return Err(ApiError::Unauthorized(
            "Old password is incorrect".to_string(),
        ));
    }
    check_password_length(&payload.new_password)?;

    let password = bcrypt::hash(&payload.new_password, state.config.bcrypt_cost)?;
    UserRepository::new(&state.db)
        .update_password(user_info.user_id, password)
        .await?;

    Ok(Json(MessageResponse::new("Password changed successfully")))
}
