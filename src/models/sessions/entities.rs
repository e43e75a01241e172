use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 会话记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/session.ts")]
pub struct Session {
    pub id: i64,
    #[serde(skip_serializing, default)] // 令牌不回传
    #[ts(skip)]
    pub token: String,
    pub user_id: Option<i64>,
    pub is_guest: bool,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub last_accessed_at: chrono::DateTime<chrono::Utc>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.expires_at <= now
    }

    /// 有效：启用且未过期
    pub fn is_valid_at(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.is_active && !self.is_expired_at(now)
    }
}

// 管理端会话列表项
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/session.ts")]
pub struct SessionWithUser {
    #[serde(flatten)]
    #[ts(flatten)]
    pub session: Session,
    pub username: Option<String>,
    pub role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn session(expires_in: i64, is_active: bool) -> Session {
        let now = Utc::now();
        Session {
            id: 1,
            token: "t".repeat(64),
            user_id: Some(7),
            is_guest: false,
            ip_address: None,
            user_agent: None,
            expires_at: now + Duration::seconds(expires_in),
            last_accessed_at: now,
            is_active,
            created_at: now,
        }
    }

    #[test]
    fn test_validity() {
        let now = Utc::now();
        assert!(session(3600, true).is_valid_at(now));
        assert!(!session(3600, false).is_valid_at(now));
        assert!(!session(-1, true).is_valid_at(now));
    }

    #[test]
    fn test_token_is_not_serialized() {
        let json = serde_json::to_value(session(60, true)).unwrap();
        assert!(json.get("token").is_none());
    }
}
