use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::routes::auth::dto::UserResponse;

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct UserListQuery {
    pub role: Option<RoleEnum>,
    pub verified: Option<bool>,
    /// Matches name, email or organization.
    pub search: Option<String>,
    /// 1-based.
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}
