use serde::Serialize;
use ts_rs::TS;

use crate::models::activity_logs::entities::ActivityLog;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/admin.ts")]
pub struct RoleCount {
    pub role: String,
    pub count: i64,
}

// 管理后台概览
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/admin.ts")]
pub struct DashboardResponse {
    pub total_users: i64,
    pub users_by_role: Vec<RoleCount>,
    pub schools: i64,
    pub courses: i64,
    pub labs: i64,
    pub simulations: i64,
    pub active_sessions: i64,
    pub logins_last_24h: i64,
    pub recent_activity: Vec<ActivityLog>,
}
