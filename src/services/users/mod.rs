pub mod access;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::users::requests::{
    AssignRolesRequest, CreateUserRequest, GrantSchoolAccessRequest, LinkChildRequest,
    UpdateUserRequest, UserListParams,
};
use crate::services::auth::session::forget_tokens;
use crate::storage::Storage;

pub struct UserService {
    storage: Option<Arc<dyn Storage>>,
}

impl UserService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    /// 注销用户的全部会话并清除身份缓存，返回注销数量
    pub(crate) async fn revoke_sessions(
        &self,
        request: &HttpRequest,
        user_id: i64,
    ) -> Result<usize> {
        let tokens = self.get_storage(request).revoke_user_sessions(user_id).await?;
        forget_tokens(request, &tokens).await;
        Ok(tokens.len())
    }

    // 获取用户列表
    pub async fn list_users(
        &self,
        query: UserListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, query, request).await
    }

    // 创建用户
    pub async fn create_user(
        &self,
        user_data: CreateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_user(self, user_data, request).await
    }

    // 按用户名 upsert
    pub async fn upsert_user(
        &self,
        user_data: CreateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::upsert_user(self, user_data, request).await
    }

    // 根据ID获取用户（含角色）
    pub async fn get_user(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_user(self, user_id, request).await
    }

    // 更新用户信息
    pub async fn update_user(
        &self,
        user_id: i64,
        update_data: UpdateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_user(self, user_id, update_data, request).await
    }

    // 删除用户
    pub async fn delete_user(
        &self,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_user(self, user_id, request).await
    }

    // 替换角色
    pub async fn assign_roles(
        &self,
        user_id: i64,
        roles: AssignRolesRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        access::assign_roles(self, user_id, roles, request).await
    }

    // 授予学校访问
    pub async fn grant_school_access(
        &self,
        user_id: i64,
        grant: GrantSchoolAccessRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        access::grant_school_access(self, user_id, grant, request).await
    }

    // 关联子女
    pub async fn link_child(
        &self,
        parent_id: i64,
        link: LinkChildRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        access::link_child(self, parent_id, link, request).await
    }
}
