use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 活动结果
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub enum ActivityStatus {
    Success,
    Failure,
    Error,
}

// 严重级别
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

crate::impl_str_enum!(ActivityStatus {
    Success => "success",
    Failure => "failure",
    Error => "error",
});

crate::impl_str_enum!(Severity {
    Low => "low",
    Medium => "medium",
    High => "high",
    Critical => "critical",
});

// 活动日志
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct ActivityLog {
    pub id: i64,
    pub user_id: Option<i64>,
    pub action: String,
    pub resource_type: Option<String>,
    pub resource_id: Option<String>,
    pub details: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub session_id: Option<String>,
    pub status: ActivityStatus,
    pub severity: Severity,
    pub error_message: Option<String>,
    pub duration_ms: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 待写入的活动记录
#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub user_id: Option<i64>,
    pub action: String,
    pub resource_type: Option<String>,
    pub resource_id: Option<String>,
    pub details: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub session_id: Option<String>,
    pub status: ActivityStatus,
    pub severity: Severity,
    pub error_message: Option<String>,
    pub duration_ms: Option<i64>,
}

impl ActivityEntry {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            user_id: None,
            action: action.into(),
            resource_type: None,
            resource_id: None,
            details: None,
            ip_address: None,
            user_agent: None,
            session_id: None,
            status: ActivityStatus::Success,
            severity: Severity::Low,
            error_message: None,
            duration_ms: None,
        }
    }

    pub fn user(mut self, user_id: Option<i64>) -> Self {
        self.user_id = user_id.filter(|id| *id > 0);
        self
    }

    pub fn resource(mut self, resource_type: &str, resource_id: impl ToString) -> Self {
        self.resource_type = Some(resource_type.to_string());
        self.resource_id = Some(resource_id.to_string());
        self
    }

    pub fn resource_type(mut self, resource_type: &str) -> Self {
        self.resource_type = Some(resource_type.to_string());
        self
    }

    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn client(mut self, ip: Option<String>, user_agent: Option<String>) -> Self {
        self.ip_address = ip;
        self.user_agent = user_agent;
        self
    }

    pub fn session(mut self, session_id: i64) -> Self {
        self.session_id = Some(session_id.to_string());
        self
    }

    pub fn status(mut self, status: ActivityStatus) -> Self {
        self.status = status;
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn failed(mut self, message: impl Into<String>) -> Self {
        self.status = ActivityStatus::Failure;
        self.error_message = Some(message.into());
        self
    }

    pub fn duration_ms(mut self, duration_ms: i64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_builder() {
        let entry = ActivityEntry::new("auth.login")
            .user(Some(0))
            .resource("user", 42)
            .failed("bad password")
            .severity(Severity::Medium);
        assert_eq!(entry.user_id, None);
        assert_eq!(entry.resource_id.as_deref(), Some("42"));
        assert_eq!(entry.status, ActivityStatus::Failure);
        assert_eq!(entry.severity.as_str(), "medium");
    }

    #[test]
    fn test_enum_strings() {
        assert_eq!("high".parse::<Severity>(), Ok(Severity::High));
        assert_eq!(ActivityStatus::Error.to_string(), "error");
        assert!("fatal".parse::<Severity>().is_err());
    }
}
