pub mod current;
pub mod guest;
pub mod login;
pub mod logout;
pub mod password;
pub mod permission;
pub mod session;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::auth::requests::{ChangePasswordRequest, LoginRequest, PermissionCheckParams};
use crate::storage::Storage;

pub struct AuthService {
    storage: Option<Arc<dyn Storage>>,
}

impl AuthService {
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

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    pub(crate) async fn forget_tokens(&self, request: &HttpRequest, tokens: &[String]) {
        session::forget_tokens(request, tokens).await;
    }

    // 登录
    pub async fn login(
        &self,
        login_request: LoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, login_request, request).await
    }

    // 登出
    pub async fn logout(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        logout::handle_logout(self, request).await
    }

    // 当前会话
    pub async fn current_session(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        current::handle_current_session(request).await
    }

    // 创建访客会话
    pub async fn create_guest_session(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        guest::handle_create_guest_session(self, request).await
    }

    // 权限检查
    pub async fn check_permission(
        &self,
        params: PermissionCheckParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        permission::handle_check_permission(params, request).await
    }

    // 修改密码
    pub async fn change_password(
        &self,
        change_request: ChangePasswordRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        password::handle_change_password(self, change_request, request).await
    }
}
