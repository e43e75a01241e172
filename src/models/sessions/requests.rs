use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/session.ts")]
pub enum SessionStatusFilter {
    Active,
    Expired,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/session.ts")]
pub struct SessionListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<SessionStatusFilter>,
}

// 批量注销
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/session.ts")]
pub struct BulkRevokeRequest {
    #[serde(default)]
    pub session_ids: Vec<i64>,
}

impl BulkRevokeRequest {
    pub const MAX_BATCH: usize = 100;

    pub fn validate(&self) -> Result<(), String> {
        if self.session_ids.is_empty() {
            return Err("session_ids must not be empty".to_string());
        }
        if self.session_ids.len() > Self::MAX_BATCH {
            return Err(format!(
                "At most {} sessions can be revoked at once",
                Self::MAX_BATCH
            ));
        }
        Ok(())
    }
}

// 新建会话（内部使用）
#[derive(Debug, Clone)]
pub struct NewSession {
    pub token: String,
    pub user_id: Option<i64>,
    pub is_guest: bool,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_revoke_bounds() {
        assert!(BulkRevokeRequest { session_ids: vec![] }.validate().is_err());
        assert!(BulkRevokeRequest { session_ids: vec![1, 2] }.validate().is_ok());
        let too_many = BulkRevokeRequest {
            session_ids: (1..=101).collect(),
        };
        assert!(too_many.validate().is_err());
    }
}
