pub mod create;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::activity_logs::requests::{ActivityLogListParams, CreateActivityLogRequest};
use crate::storage::Storage;

pub struct ActivityLogService {
    storage: Option<Arc<dyn Storage>>,
}

impl ActivityLogService {
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

    // 当前用户的活动日志
    pub async fn list_logs(
        &self,
        query: ActivityLogListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_logs(self, query, request).await
    }

    // 客户端事件上报
    pub async fn create_log(
        &self,
        log: CreateActivityLogRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_log(self, log, request).await
    }
}
