use serde::Deserialize;
use ts_rs::TS;

use super::entities::AccessLevel;
use crate::models::common::pagination::deserialize_optional_i64;

// 用户登录请求（字段缺失由服务层返回 400）
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginRequest {
    /// 用户名或邮箱
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

// 修改密码请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

// 权限检查类型
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub enum PermissionCheckType {
    Page,
    Resource,
    SchoolResource,
}

// 权限检查参数（GET 查询串与 POST 请求体共用）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct PermissionCheckParams {
    #[serde(rename = "type")]
    pub check_type: PermissionCheckType,
    pub path: Option<String>,
    pub resource: Option<String>,
    pub action: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub school_id: Option<i64>,
    pub access_level: Option<AccessLevel>,
}
