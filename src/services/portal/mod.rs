pub mod parent;
pub mod student;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

/// 学生与家长门户
pub struct PortalService {
    storage: Option<Arc<dyn Storage>>,
}

impl PortalService {
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

    pub async fn student_stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        student::student_stats(self, request).await
    }

    pub async fn student_progress(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        student::student_progress(self, request).await
    }

    pub async fn children(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        parent::list_children(self, request).await
    }

    pub async fn child_grades(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        parent::child_grades(self, student_id, request).await
    }
}
