//! 活动日志实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "activity_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: Option<i64>,
    pub action: String,
    pub resource_type: Option<String>,
    pub resource_id: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub details: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub session_id: Option<String>,
    pub status: String,
    pub severity: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub error_message: Option<String>,
    pub duration_ms: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_activity_log(self) -> crate::models::activity_logs::entities::ActivityLog {
        use super::{parse_json, to_datetime};
        use crate::models::activity_logs::entities::{ActivityLog, ActivityStatus, Severity};

        ActivityLog {
            id: self.id,
            user_id: self.user_id,
            details: parse_json(self.details.as_deref()),
            action: self.action,
            resource_type: self.resource_type,
            resource_id: self.resource_id,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            session_id: self.session_id,
            status: self
                .status
                .parse::<ActivityStatus>()
                .unwrap_or(ActivityStatus::Success),
            severity: self.severity.parse::<Severity>().unwrap_or(Severity::Low),
            error_message: self.error_message,
            duration_ms: self.duration_ms,
            created_at: to_datetime(self.created_at),
        }
    }
}
