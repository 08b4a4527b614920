use uuid::Uuid;

use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::entities::user;
use crate::error::{ApiError, ApiResult};
use crate::repositories::UserRepository;
use crate::state::AppState;
use crate::utils::jwt::TokenClaims;

pub fn require_role(claims: &TokenClaims, allowed: &[RoleEnum]) -> ApiResult<()> {
    if allowed.contains(&claims.role) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!(
            "This action is not available to the {} role",
            claims.role.as_str()
        )))
    }
}

pub fn is_admin(claims: &TokenClaims) -> ApiResult<()> {
    require_role(claims, &[RoleEnum::Admin])
}

pub fn caller_id(claims: &TokenClaims) -> ApiResult<Uuid> {
    claims
        .user_id()
        .map_err(|_| ApiError::Unauthorized("Invalid token subject".to_string()))
}

/// Loads the caller's account. A token outliving its user is treated as
/// unauthenticated.
pub async fn current_user(state: &AppState, claims: &TokenClaims) -> ApiResult<user::Model> {
    let user_id = caller_id(claims)?;
    UserRepository::new(&state.db)
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Account no longer exists".to_string()))
}

/// Loads the caller and requires one of `allowed` roles plus an approved
/// account. Admin approval can be revoked after a token was issued, so
/// the flag is read from the database rather than trusted from the token.
pub async fn verified_user(
    state: &AppState,
    claims: &TokenClaims,
    allowed: &[RoleEnum],
) -> ApiResult<user::Model> {
    require_role(claims, allowed)?;
    let user = current_user(state, claims).await?;
    if !user.verified {
        return Err(ApiError::Forbidden(
            "Account is awaiting admin approval".to_string(),
        ));
    }
    Ok(user)
}
