//! 管理仪表盘统计

use super::{SeaOrmStorage, now_ts};
use crate::entity::activity_logs::{Column as LogColumn, Entity as ActivityLogs};
use crate::entity::courses::Entity as Courses;
use crate::entity::labs::Entity as Labs;
use crate::entity::schools::Entity as Schools;
use crate::entity::sessions::{Column as SessionColumn, Entity as Sessions};
use crate::entity::simulations::Entity as Simulations;
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{Result, VLabError};
use crate::models::{
    activity_logs::entities::ActivityStatus,
    admin::responses::{DashboardResponse, RoleCount},
};
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

/// 仪表盘展示的最近活动条数
const RECENT_ACTIVITY_LIMIT: u64 = 10;

impl SeaOrmStorage {
    pub async fn dashboard_stats_impl(&self) -> Result<DashboardResponse> {
        let now = now_ts();
        let map_err = |what: &str, e: sea_orm::DbErr| {
            VLabError::database_operation(format!("统计{what}失败: {e}"))
        };

        let users_by_role: Vec<RoleCount> = Users::find()
            .select_only()
            .column(UserColumn::Role)
            .column_as(UserColumn::Id.count(), "count")
            .group_by(UserColumn::Role)
            .order_by_asc(UserColumn::Role)
            .into_tuple::<(String, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| map_err("用户", e))?
            .into_iter()
            .map(|(role, count)| RoleCount { role, count })
            .collect();
        let total_users = users_by_role.iter().map(|r| r.count).sum();

        let schools = Schools::find()
            .count(&self.db)
            .await
            .map_err(|e| map_err("学校", e))?;
        let courses = Courses::find()
            .count(&self.db)
            .await
            .map_err(|e| map_err("课程", e))?;
        let labs = Labs::find()
            .count(&self.db)
            .await
            .map_err(|e| map_err("实验", e))?;
        let simulations = Simulations::find()
            .count(&self.db)
            .await
            .map_err(|e| map_err("仿真", e))?;
        let active_sessions = Sessions::find()
            .filter(SessionColumn::IsActive.eq(true))
            .filter(SessionColumn::ExpiresAt.gt(now))
            .count(&self.db)
            .await
            .map_err(|e| map_err("会话", e))?;
        let logins_last_24h = ActivityLogs::find()
            .filter(LogColumn::Action.eq("auth.login"))
            .filter(LogColumn::Status.eq(ActivityStatus::Success.as_str()))
            .filter(LogColumn::CreatedAt.gte(now - 24 * 3600))
            .count(&self.db)
            .await
            .map_err(|e| map_err("登录", e))?;

        let recent_activity = ActivityLogs::find()
            .order_by_desc(LogColumn::CreatedAt)
            .order_by_desc(LogColumn::Id)
            .limit(RECENT_ACTIVITY_LIMIT)
            .all(&self.db)
            .await
            .map_err(|e| map_err("最近活动", e))?
            .into_iter()
            .map(|m| m.into_activity_log())
            .collect();

        Ok(DashboardResponse {
            total_users,
            users_by_role,
            schools: schools as i64,
            courses: courses as i64,
            labs: labs as i64,
            simulations: simulations as i64,
            active_sessions: active_sessions as i64,
            logins_last_24h: logins_last_24h as i64,
            recent_activity,
        })
    }
}
