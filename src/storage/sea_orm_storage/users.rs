//! 用户存储操作

use super::{SeaOrmStorage, commit, now_ts};
use crate::entity::user_roles::{
    ActiveModel as UserRoleActiveModel, Column as UserRoleColumn, Entity as UserRoles,
};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{Result, VLabError};
use crate::models::{
    PaginationInfo,
    users::{
        entities::{User, UserStatus, UserWithRoles},
        requests::{CreateUserRequest, UpdateUserRequest, UserListParams},
        responses::UserListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
    sea_query::{Expr, OnConflict},
};

impl SeaOrmStorage {
    fn user_active_model(req: CreateUserRequest, now: i64) -> ActiveModel {
        ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            phone: Set(req.phone),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            school_id: Set(req.school_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    /// 为用户挂上角色（已存在则忽略）
    pub(crate) async fn attach_role<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        role_name: &str,
    ) -> Result<()> {
        let Some(role_id) = Self::role_id_by_name(conn, role_name).await? else {
            // 角色尚未写入时只保留 users.role
            return Ok(());
        };

        let model = UserRoleActiveModel {
            user_id: Set(user_id),
            role_id: Set(role_id),
            is_active: Set(true),
            assigned_at: Set(now_ts()),
            ..Default::default()
        };
        UserRoles::insert(model)
            .on_conflict(
                OnConflict::columns([UserRoleColumn::UserId, UserRoleColumn::RoleId])
                    .update_column(UserRoleColumn::IsActive)
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(|e| VLabError::from_db("分配角色失败", e))?;
        Ok(())
    }

    /// 创建用户（password 字段已是哈希）
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let role = req.role;
        let txn = self.begin().await?;

        let user = Self::user_active_model(req, now_ts())
            .insert(&txn)
            .await
            .map_err(|e| VLabError::from_db("创建用户失败", e))?;
        Self::attach_role(&txn, user.id, role.as_str()).await?;

        commit(txn).await?;
        Ok(user.into_user())
    }

    /// 按 username 插入或更新
    pub async fn upsert_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let username = req.username.clone();
        let role = req.role;
        let on_conflict = OnConflict::column(Column::Username)
            .update_columns([
                Column::Email,
                Column::PasswordHash,
                Column::FirstName,
                Column::LastName,
                Column::Phone,
                Column::Role,
                Column::SchoolId,
                Column::UpdatedAt,
            ])
            .to_owned();

        let txn = self.begin().await?;
        Users::insert(Self::user_active_model(req, now_ts()))
            .on_conflict(on_conflict)
            .exec_without_returning(&txn)
            .await
            .map_err(|e| VLabError::from_db("写入用户失败", e))?;

        let user = Users::find()
            .filter(Column::Username.eq(&username))
            .one(&txn)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询用户失败: {e}")))?
            .ok_or_else(|| VLabError::not_found(format!("用户 {username} 写入后未找到")))?;
        Self::attach_role(&txn, user.id, role.as_str()).await?;

        commit(txn).await?;
        Ok(user.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名或邮箱获取用户
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 获取用户及全部角色
    pub async fn get_user_with_roles_impl(&self, id: i64) -> Result<Option<UserWithRoles>> {
        let Some(user) = self.get_user_by_id_impl(id).await? else {
            return Ok(None);
        };
        let roles = self.user_role_names(user.id, user.role.as_str()).await?;
        Ok(Some(UserWithRoles { user, roles }))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        params: UserListParams,
    ) -> Result<UserListResponse> {
        let (page, size) = params.pagination.normalized();

        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = params.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Username.contains(&escaped))
                    .add(Column::Email.contains(&escaped))
                    .add(Column::FirstName.contains(&escaped))
                    .add(Column::LastName.contains(&escaped)),
            );
        }

        if let Some(role) = params.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        if let Some(status) = params.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        if let Some(school_id) = params.school_id {
            select = select.filter(Column::SchoolId.eq(school_id));
        }

        select = select.order_by_desc(Column::CreatedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| VLabError::database_operation(format!("查询用户总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| VLabError::database_operation(format!("查询用户页数失败: {e}")))?;
        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(Column::LastLogin, Expr::value(now_ts()))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("更新最后登录时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户信息
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        if self.get_user_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        if let Some(email) = update.email {
            model.email = Set(email);
        }
        if let Some(password) = update.password {
            model.password_hash = Set(password);
        }
        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(school_id) = update.school_id {
            model.school_id = Set(Some(school_id));
        }

        let txn = self.begin().await?;
        let updated = model
            .update(&txn)
            .await
            .map_err(|e| VLabError::from_db("更新用户失败", e))?;
        if let Some(role) = update.role {
            Self::attach_role(&txn, id, role.as_str()).await?;
        }
        commit(txn).await?;

        Ok(Some(updated.into_user()))
    }

    /// 删除用户
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| VLabError::from_db("删除用户失败", e))?;

        Ok(result.rows_affected > 0)
    }

    /// 修改密码并注销全部会话，返回被注销的令牌
    pub async fn change_password_impl(
        &self,
        user_id: i64,
        password_hash: String,
    ) -> Result<Vec<String>> {
        let txn = self.begin().await?;
        let now = now_ts();

        let updated = Users::update_many()
            .col_expr(Column::PasswordHash, Expr::value(password_hash))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| VLabError::database_operation(format!("更新密码失败: {e}")))?;
        if updated.rows_affected == 0 {
            return Err(VLabError::not_found(format!("用户 {user_id} 不存在")));
        }

        let tokens = Self::revoke_user_sessions_in(&txn, user_id).await?;

        commit(txn).await?;
        Ok(tokens)
    }
}
