//! 角色、权限、学校访问与家长关联

use std::collections::{BTreeSet, HashMap};

use super::{SeaOrmStorage, commit, now_ts};
use crate::entity::parent_students::{
    ActiveModel as ParentStudentActiveModel, Column as ParentStudentColumn,
    Entity as ParentStudents,
};
use crate::entity::permissions::{
    ActiveModel as PermissionActiveModel, Column as PermissionColumn, Entity as Permissions,
};
use crate::entity::role_permissions::{
    ActiveModel as RolePermissionActiveModel, Column as RolePermissionColumn,
    Entity as RolePermissions,
};
use crate::entity::roles::{ActiveModel as RoleActiveModel, Column as RoleColumn, Entity as Roles};
use crate::entity::user_roles::{
    ActiveModel as UserRoleActiveModel, Column as UserRoleColumn, Entity as UserRoles,
};
use crate::entity::user_school_access::{
    ActiveModel as AccessActiveModel, Column as AccessColumn, Entity as UserSchoolAccess,
};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{Result, VLabError};
use crate::models::{
    auth::entities::{AccessLevel, SchoolAccess},
    portal::responses::ChildSummary,
    users::entities::UserRole,
};
use crate::storage::{IdentityParts, RoleSeed};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
    sea_query::{Expr, OnConflict},
};

impl SeaOrmStorage {
    pub(crate) async fn role_id_by_name<C: ConnectionTrait>(
        conn: &C,
        name: &str,
    ) -> Result<Option<i64>> {
        let role = Roles::find()
            .filter(RoleColumn::Name.eq(name))
            .one(conn)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询角色失败: {e}")))?;
        Ok(role.map(|r| r.id))
    }

    /// 主角色与有效的附加角色（去重、排序）
    pub(crate) async fn user_role_names(&self, user_id: i64, primary_role: &str) -> Result<Vec<String>> {
        let assigned = UserRoles::find()
            .filter(UserRoleColumn::UserId.eq(user_id))
            .filter(UserRoleColumn::IsActive.eq(true))
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询用户角色失败: {e}")))?;

        let mut names = BTreeSet::new();
        names.insert(primary_role.to_string());

        let role_ids: Vec<i64> = assigned.iter().map(|ur| ur.role_id).collect();
        if !role_ids.is_empty() {
            let roles = Roles::find()
                .filter(RoleColumn::Id.is_in(role_ids))
                .filter(RoleColumn::IsActive.eq(true))
                .all(&self.db)
                .await
                .map_err(|e| VLabError::database_operation(format!("查询角色失败: {e}")))?;
            names.extend(roles.into_iter().map(|r| r.name));
        }

        Ok(names.into_iter().collect())
    }

    /// 幂等写入角色、权限与授权
    pub async fn seed_rbac_impl(&self, seeds: &[RoleSeed]) -> Result<()> {
        let txn = self.begin().await?;

        let mut role_ids: HashMap<String, i64> = Roles::find()
            .all(&txn)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询角色失败: {e}")))?
            .into_iter()
            .map(|r| (r.name, r.id))
            .collect();
        let mut permission_ids: HashMap<String, i64> = Permissions::find()
            .all(&txn)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询权限失败: {e}")))?
            .into_iter()
            .map(|p| (p.name, p.id))
            .collect();

        for seed in seeds {
            if !role_ids.contains_key(seed.name) {
                let role = RoleActiveModel {
                    name: Set(seed.name.to_string()),
                    description: Set(Some(seed.description.to_string())),
                    is_active: Set(true),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(|e| VLabError::from_db("写入角色失败", e))?;
                role_ids.insert(role.name, role.id);
            }

            for name in &seed.permissions {
                if permission_ids.contains_key(*name) {
                    continue;
                }
                let (resource, action) = name.split_once('.').unwrap_or((*name, "*"));
                let permission = PermissionActiveModel {
                    name: Set(name.to_string()),
                    resource: Set(resource.to_string()),
                    action: Set(action.to_string()),
                    description: Set(None),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(|e| VLabError::from_db("写入权限失败", e))?;
                permission_ids.insert(permission.name, permission.id);
            }
        }

        for seed in seeds {
            let Some(&role_id) = role_ids.get(seed.name) else {
                continue;
            };
            for name in &seed.permissions {
                let Some(&permission_id) = permission_ids.get(*name) else {
                    continue;
                };
                let grant = RolePermissionActiveModel {
                    role_id: Set(role_id),
                    permission_id: Set(permission_id),
                    ..Default::default()
                };
                RolePermissions::insert(grant)
                    .on_conflict(
                        OnConflict::columns([
                            RolePermissionColumn::RoleId,
                            RolePermissionColumn::PermissionId,
                        ])
                        .do_nothing()
                        .to_owned(),
                    )
                    .exec_without_returning(&txn)
                    .await
                    .map_err(|e| VLabError::from_db("写入角色权限失败", e))?;
            }
        }

        commit(txn).await
    }

    /// 替换用户角色，第一个角色成为主角色
    pub async fn replace_user_roles_impl(
        &self,
        user_id: i64,
        roles: &[UserRole],
    ) -> Result<Vec<String>> {
        let Some(primary) = roles.first() else {
            return Err(VLabError::validation("至少需要一个角色"));
        };

        let txn = self.begin().await?;

        let updated = Users::update_many()
            .col_expr(UserColumn::Role, Expr::value(primary.to_string()))
            .col_expr(UserColumn::UpdatedAt, Expr::value(now_ts()))
            .filter(UserColumn::Id.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| VLabError::database_operation(format!("更新主角色失败: {e}")))?;
        if updated.rows_affected == 0 {
            return Err(VLabError::not_found(format!("用户 {user_id} 不存在")));
        }

        UserRoles::delete_many()
            .filter(UserRoleColumn::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| VLabError::database_operation(format!("清除用户角色失败: {e}")))?;

        let mut names = BTreeSet::new();
        for role in roles {
            let role_id = Self::role_id_by_name(&txn, role.as_str())
                .await?
                .ok_or_else(|| VLabError::validation(format!("角色未初始化: {role}")))?;
            if !names.insert(role.to_string()) {
                continue;
            }
            UserRoleActiveModel {
                user_id: Set(user_id),
                role_id: Set(role_id),
                is_active: Set(true),
                assigned_at: Set(now_ts()),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| VLabError::from_db("分配角色失败", e))?;
        }

        commit(txn).await?;
        Ok(names.into_iter().collect())
    }

    /// 会话解析：角色、权限、学校访问
    pub async fn load_identity_parts_impl(
        &self,
        user_id: i64,
        primary_role: &str,
    ) -> Result<IdentityParts> {
        let roles = self.user_role_names(user_id, primary_role).await?;

        let role_ids: Vec<i64> = Roles::find()
            .filter(RoleColumn::Name.is_in(roles.clone()))
            .filter(RoleColumn::IsActive.eq(true))
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询角色失败: {e}")))?
            .into_iter()
            .map(|r| r.id)
            .collect();

        let mut permissions = BTreeSet::new();
        if !role_ids.is_empty() {
            let permission_ids: Vec<i64> = RolePermissions::find()
                .filter(RolePermissionColumn::RoleId.is_in(role_ids))
                .all(&self.db)
                .await
                .map_err(|e| VLabError::database_operation(format!("查询角色权限失败: {e}")))?
                .into_iter()
                .map(|rp| rp.permission_id)
                .collect();
            if !permission_ids.is_empty() {
                let rows = Permissions::find()
                    .filter(PermissionColumn::Id.is_in(permission_ids))
                    .all(&self.db)
                    .await
                    .map_err(|e| VLabError::database_operation(format!("查询权限失败: {e}")))?;
                permissions.extend(rows.into_iter().map(|p| p.name));
            }
        }

        let school_access = UserSchoolAccess::find()
            .filter(AccessColumn::UserId.eq(user_id))
            .order_by_asc(AccessColumn::SchoolId)
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询学校访问失败: {e}")))?
            .into_iter()
            .map(|m| m.into_school_access())
            .collect();

        Ok(IdentityParts {
            roles,
            permissions: permissions.into_iter().collect(),
            school_access,
        })
    }

    /// 授予或更新学校访问级别
    pub async fn grant_school_access_impl(
        &self,
        user_id: i64,
        school_id: i64,
        level: AccessLevel,
    ) -> Result<SchoolAccess> {
        let model = AccessActiveModel {
            user_id: Set(user_id),
            school_id: Set(school_id),
            access_level: Set(level.to_string()),
            granted_at: Set(now_ts()),
            ..Default::default()
        };

        UserSchoolAccess::insert(model)
            .on_conflict(
                OnConflict::columns([AccessColumn::UserId, AccessColumn::SchoolId])
                    .update_columns([AccessColumn::AccessLevel, AccessColumn::GrantedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| VLabError::from_db("授予学校访问失败", e))?;

        Ok(SchoolAccess {
            school_id,
            access_level: level,
        })
    }

    /// 关联家长与学生
    pub async fn link_parent_student_impl(
        &self,
        parent_id: i64,
        student_id: i64,
        relationship: &str,
    ) -> Result<()> {
        let model = ParentStudentActiveModel {
            parent_id: Set(parent_id),
            student_id: Set(student_id),
            relationship: Set(relationship.to_string()),
            created_at: Set(now_ts()),
            ..Default::default()
        };

        ParentStudents::insert(model)
            .on_conflict(
                OnConflict::columns([
                    ParentStudentColumn::ParentId,
                    ParentStudentColumn::StudentId,
                ])
                .update_column(ParentStudentColumn::Relationship)
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| VLabError::from_db("关联家长与学生失败", e))?;
        Ok(())
    }

    pub async fn is_parent_of_impl(&self, parent_id: i64, student_id: i64) -> Result<bool> {
        let count = ParentStudents::find()
            .filter(ParentStudentColumn::ParentId.eq(parent_id))
            .filter(ParentStudentColumn::StudentId.eq(student_id))
            .count(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询家长关联失败: {e}")))?;
        Ok(count > 0)
    }

    /// 家长关联的学生
    pub async fn list_children_impl(&self, parent_id: i64) -> Result<Vec<ChildSummary>> {
        let links = ParentStudents::find()
            .filter(ParentStudentColumn::ParentId.eq(parent_id))
            .order_by_asc(ParentStudentColumn::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询家长关联失败: {e}")))?;
        if links.is_empty() {
            return Ok(Vec::new());
        }

        let student_ids: Vec<i64> = links.iter().map(|l| l.student_id).collect();
        let students: HashMap<i64, _> = Users::find()
            .filter(UserColumn::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| VLabError::database_operation(format!("查询学生失败: {e}")))?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(links
            .into_iter()
            .filter_map(|link| {
                let student = students.get(&link.student_id)?;
                Some(ChildSummary {
                    id: student.id,
                    username: student.username.clone(),
                    first_name: student.first_name.clone(),
                    last_name: student.last_name.clone(),
                    email: student.email.clone(),
                    school_id: student.school_id,
                    relationship: link.relationship,
                })
            })
            .collect())
    }
}
