pub mod list;
pub mod revoke;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::sessions::requests::{BulkRevokeRequest, SessionListParams};
use crate::storage::Storage;

pub struct SessionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SessionService {
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

    // 会话列表及统计
    pub async fn list_sessions(
        &self,
        query: SessionListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_sessions(self, query, request).await
    }

    // 注销单个会话
    pub async fn revoke_session(
        &self,
        session_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        revoke::revoke_session(self, session_id, request).await
    }

    // 批量注销
    pub async fn bulk_revoke(
        &self,
        bulk: BulkRevokeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        revoke::bulk_revoke(self, bulk, request).await
    }

    // 清理过期会话
    pub async fn cleanup_expired(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        revoke::cleanup_expired(self, request).await
    }
}
