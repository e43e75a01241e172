//! 活动日志存储操作

use super::{SeaOrmStorage, now_ts, to_json_text};
use crate::entity::activity_logs::{ActiveModel, Column, Entity as ActivityLogs};
use crate::errors::{Result, VLabError};
use crate::models::{
    PaginationInfo,
    activity_logs::{
        entities::ActivityEntry, requests::ActivityLogListParams,
        responses::ActivityLogListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 在给定连接（或事务）上写入一条活动日志
    pub(crate) async fn write_activity<C: ConnectionTrait>(
        conn: &C,
        entry: ActivityEntry,
    ) -> Result<()> {
        let details = entry.details.as_ref().map(to_json_text).transpose()?;
        let model = ActiveModel {
            user_id: Set(entry.user_id),
            action: Set(entry.action),
            resource_type: Set(entry.resource_type),
            resource_id: Set(entry.resource_id),
            details: Set(details),
            ip_address: Set(entry.ip_address),
            user_agent: Set(entry.user_agent),
            session_id: Set(entry.session_id),
            status: Set(entry.status.to_string()),
            severity: Set(entry.severity.to_string()),
            error_message: Set(entry.error_message),
            duration_ms: Set(entry.duration_ms),
            created_at: Set(now_ts()),
            ..Default::default()
        };

        model
            .insert(conn)
            .await
            .map_err(|e| VLabError::from_db("写入活动日志失败", e))?;
        Ok(())
    }

    pub async fn insert_activity_log_impl(&self, entry: ActivityEntry) -> Result<()> {
        Self::write_activity(&self.db, entry).await
    }

    /// 分页查询活动日志
    pub async fn list_activity_logs_impl(
        &self,
        params: ActivityLogListParams,
    ) -> Result<ActivityLogListResponse> {
        let (page, size) = params.pagination.normalized();

        let mut select = ActivityLogs::find();
        if let Some(user_id) = params.user_id {
            select = select.filter(Column::UserId.eq(user_id));
        }
        if let Some(ref action) = params.action
            && !action.trim().is_empty()
        {
            select = select.filter(Column::Action.eq(action.trim()));
        }
        if let Some(ref resource_type) = params.resource_type
            && !resource_type.trim().is_empty()
        {
            select = select.filter(Column::ResourceType.eq(resource_type.trim()));
        }
        if let Some(status) = params.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(severity) = params.severity {
            select = select.filter(Column::Severity.eq(severity.to_string()));
        }
        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| VLabError::database_operation(format!("查询日志总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| VLabError::database_operation(format!("查询日志页数失败: {e}")))?;
        let logs = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询日志列表失败: {e}")))?;

        Ok(ActivityLogListResponse {
            items: logs.into_iter().map(|m| m.into_activity_log()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }
}
