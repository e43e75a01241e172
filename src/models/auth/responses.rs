use serde::Serialize;
use ts_rs::TS;

use super::entities::{Identity, SchoolAccess};

// 登录用户信息
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub primary_role: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub school_access: Vec<SchoolAccess>,
    pub is_guest: bool,
}

impl From<&Identity> for AuthUser {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.user_id,
            username: identity.username.clone(),
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            email: identity.email.clone(),
            primary_role: identity.primary_role.clone(),
            roles: identity.roles.clone(),
            permissions: identity.permissions.clone(),
            school_access: identity.school_access.clone(),
            is_guest: identity.is_guest,
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginResponse {
    pub user: AuthUser,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct SessionInfo {
    pub id: i64,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub is_guest: bool,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct SessionResponse {
    pub user: AuthUser,
    pub session: SessionInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct GuestSessionResponse {
    pub user: AuthUser,
    pub session_token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct PermissionCheckResponse {
    pub allowed: bool,
    pub reason: Option<String>,
    pub fallback_page: Option<String>,
}

impl PermissionCheckResponse {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
            fallback_page: None,
        }
    }

    pub fn deny(reason: impl Into<String>, fallback_page: Option<&str>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
            fallback_page: fallback_page.map(str::to_string),
        }
    }
}
