use serde::Deserialize;
use ts_rs::TS;

use super::entities::{ActivityStatus, Severity};
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct ActivityLogListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub user_id: Option<i64>,
    pub action: Option<String>,
    pub resource_type: Option<String>,
    pub status: Option<ActivityStatus>,
    pub severity: Option<Severity>,
}

// 客户端上报的活动
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct CreateActivityLogRequest {
    pub action: String,
    pub resource_type: Option<String>,
    pub resource_id: Option<String>,
    pub details: Option<serde_json::Value>,
}

// 安全事件上报
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct SecurityEventRequest {
    pub action: String,
    pub user_id: Option<i64>,
    pub ip: Option<String>,
    pub severity: Option<Severity>,
    pub details: Option<serde_json::Value>,
}
