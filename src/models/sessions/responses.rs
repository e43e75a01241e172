use std::collections::HashMap;

use serde::Serialize;
use ts_rs::TS;

use super::entities::SessionWithUser;
use crate::models::common::PaginationInfo;

#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/session.ts")]
pub struct SessionStatistics {
    pub active_count: i64,
    pub expired_count: i64,
    pub unique_users: i64,
    pub by_role: HashMap<String, i64>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/session.ts")]
pub struct SessionListResponse {
    pub items: Vec<SessionWithUser>,
    pub pagination: PaginationInfo,
    pub statistics: SessionStatistics,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/session.ts")]
pub struct SessionRevokeResponse {
    pub revoked: u64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/session.ts")]
pub struct SessionCleanupResponse {
    pub cleaned: u64,
}
