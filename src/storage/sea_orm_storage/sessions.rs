//! 会话存储操作

use std::collections::{HashMap, HashSet};

use super::{SeaOrmStorage, now_ts};
use crate::entity::sessions::{ActiveModel, Column, Entity as Sessions};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{Result, VLabError};
use crate::models::{
    PaginationInfo,
    sessions::{
        entities::{Session, SessionWithUser},
        requests::{NewSession, SessionListParams, SessionStatusFilter},
        responses::{SessionListResponse, SessionStatistics},
    },
    users::entities::UserRole,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建会话
    pub async fn create_session_impl(&self, session: NewSession) -> Result<Session> {
        let now = now_ts();
        let model = ActiveModel {
            token: Set(session.token),
            user_id: Set(session.user_id),
            is_guest: Set(session.is_guest),
            ip_address: Set(session.ip_address),
            user_agent: Set(session.user_agent),
            expires_at: Set(session.expires_at.timestamp()),
            last_accessed_at: Set(now),
            is_active: Set(true),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| VLabError::from_db("创建会话失败", e))?;

        Ok(result.into_session())
    }

    /// 通过令牌获取会话
    pub async fn get_session_by_token_impl(&self, token: &str) -> Result<Option<Session>> {
        let result = Sessions::find()
            .filter(Column::Token.eq(token))
            .one(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询会话失败: {e}")))?;

        Ok(result.map(|m| m.into_session()))
    }

    /// 刷新最后访问时间
    pub async fn touch_session_impl(&self, id: i64) -> Result<()> {
        Sessions::update_many()
            .col_expr(Column::LastAccessedAt, Expr::value(now_ts()))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("刷新会话失败: {e}")))?;
        Ok(())
    }

    /// 通过令牌注销会话
    pub async fn deactivate_session_by_token_impl(&self, token: &str) -> Result<bool> {
        let result = Sessions::update_many()
            .col_expr(Column::IsActive, Expr::value(false))
            .filter(Column::Token.eq(token))
            .filter(Column::IsActive.eq(true))
            .exec(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("注销会话失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 批量注销，返回实际被注销的令牌
    pub async fn deactivate_sessions_impl(&self, ids: &[i64]) -> Result<Vec<String>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let tokens: Vec<String> = Sessions::find()
            .select_only()
            .column(Column::Token)
            .filter(Column::Id.is_in(ids.to_vec()))
            .filter(Column::IsActive.eq(true))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询会话失败: {e}")))?;

        Sessions::update_many()
            .col_expr(Column::IsActive, Expr::value(false))
            .filter(Column::Id.is_in(ids.to_vec()))
            .exec(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("注销会话失败: {e}")))?;

        Ok(tokens)
    }

    /// 注销某用户的全部活跃会话，返回被注销的令牌
    pub(crate) async fn revoke_user_sessions_in<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
    ) -> Result<Vec<String>> {
        let tokens: Vec<String> = Sessions::find()
            .select_only()
            .column(Column::Token)
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsActive.eq(true))
            .into_tuple()
            .all(conn)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询会话失败: {e}")))?;
        if tokens.is_empty() {
            return Ok(tokens);
        }

        Sessions::update_many()
            .col_expr(Column::IsActive, Expr::value(false))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsActive.eq(true))
            .exec(conn)
            .await
            .map_err(|e| VLabError::database_operation(format!("注销会话失败: {e}")))?;

        Ok(tokens)
    }

    pub async fn revoke_user_sessions_impl(&self, user_id: i64) -> Result<Vec<String>> {
        Self::revoke_user_sessions_in(&self.db, user_id).await
    }

    /// 注销所有已过期的活跃会话
    pub async fn cleanup_expired_sessions_impl(&self) -> Result<u64> {
        let result = Sessions::update_many()
            .col_expr(Column::IsActive, Expr::value(false))
            .filter(Column::IsActive.eq(true))
            .filter(Column::ExpiresAt.lte(now_ts()))
            .exec(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("清理过期会话失败: {e}")))?;

        Ok(result.rows_affected)
    }

    /// 分页列出会话及统计
    pub async fn list_sessions_with_pagination_impl(
        &self,
        params: SessionListParams,
    ) -> Result<SessionListResponse> {
        let (page, size) = params.pagination.normalized();
        let now = now_ts();

        let active = Condition::all()
            .add(Column::IsActive.eq(true))
            .add(Column::ExpiresAt.gt(now));

        let mut select = Sessions::find();
        match params.status {
            Some(SessionStatusFilter::Active) => select = select.filter(active.clone()),
            Some(SessionStatusFilter::Expired) => {
                select = select.filter(Column::ExpiresAt.lte(now))
            }
            None => {}
        }
        select = select.order_by_desc(Column::LastAccessedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| VLabError::database_operation(format!("查询会话总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| VLabError::database_operation(format!("查询会话页数失败: {e}")))?;
        let sessions = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询会话列表失败: {e}")))?;

        // 活跃会话用于统计
        let active_sessions: Vec<(Option<i64>, bool)> = Sessions::find()
            .select_only()
            .column(Column::UserId)
            .column(Column::IsGuest)
            .filter(active)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("统计会话失败: {e}")))?;
        let expired_count = Sessions::find()
            .filter(Column::ExpiresAt.lte(now))
            .count(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("统计会话失败: {e}")))?;

        // 页内与统计涉及的用户
        let mut user_ids: HashSet<i64> = sessions.iter().filter_map(|s| s.user_id).collect();
        user_ids.extend(active_sessions.iter().filter_map(|(uid, _)| *uid));
        let users: HashMap<i64, (String, String)> = if user_ids.is_empty() {
            HashMap::new()
        } else {
            Users::find()
                .filter(UserColumn::Id.is_in(user_ids.into_iter().collect::<Vec<_>>()))
                .all(&self.db)
                .await
                .map_err(|e| VLabError::database_operation(format!("查询会话用户失败: {e}")))?
                .into_iter()
                .map(|u| (u.id, (u.username, u.role)))
                .collect()
        };

        let mut by_role: HashMap<String, i64> = HashMap::new();
        let mut unique_users = HashSet::new();
        for (user_id, is_guest) in &active_sessions {
            let role = match user_id.and_then(|id| users.get(&id)) {
                Some((_, role)) if !is_guest => role.clone(),
                _ => UserRole::GUEST.to_string(),
            };
            *by_role.entry(role).or_default() += 1;
            if let Some(id) = user_id {
                unique_users.insert(*id);
            }
        }

        let statistics = SessionStatistics {
            active_count: active_sessions.len() as i64,
            expired_count: expired_count as i64,
            unique_users: unique_users.len() as i64,
            by_role,
        };

        let items = sessions
            .into_iter()
            .map(|m| {
                let user = m.user_id.and_then(|id| users.get(&id));
                SessionWithUser {
                    username: user.map(|(name, _)| name.clone()),
                    role: user.map(|(_, role)| role.clone()),
                    session: m.into_session(),
                }
            })
            .collect();

        Ok(SessionListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total, pages),
            statistics,
        })
    }
}
