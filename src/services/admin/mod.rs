pub mod activity;
pub mod dashboard;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::activity_logs::requests::{ActivityLogListParams, SecurityEventRequest};
use crate::storage::Storage;

pub struct AdminService {
    storage: Option<Arc<dyn Storage>>,
}

impl AdminService {
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

    // 仪表盘统计
    pub async fn dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        dashboard::get_dashboard(self, request).await
    }

    // 全站活动日志
    pub async fn list_activity(
        &self,
        query: ActivityLogListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        activity::list_activity(self, query, request).await
    }

    // 安全事件上报
    pub async fn log_security_event(
        &self,
        event: SecurityEventRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        activity::log_security_event(self, event, request).await
    }
}
