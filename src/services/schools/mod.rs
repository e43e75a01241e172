pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::schools::requests::{SchoolListParams, SchoolPayload, UpdateSchoolRequest};
use crate::storage::Storage;

pub struct SchoolService {
    storage: Option<Arc<dyn Storage>>,
}

impl SchoolService {
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

    // 学校列表（含汇总）
    pub async fn list_schools(
        &self,
        query: SchoolListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_schools(self, query, request).await
    }

    // 创建学校
    pub async fn create_school(
        &self,
        payload: SchoolPayload,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_school(self, payload, request).await
    }

    // 按 school_code upsert
    pub async fn upsert_school(
        &self,
        payload: SchoolPayload,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::upsert_school(self, payload, request).await
    }

    pub async fn get_school(
        &self,
        school_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_school(self, school_id, request).await
    }

    pub async fn update_school(
        &self,
        school_id: i64,
        update: UpdateSchoolRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_school(self, school_id, update, request).await
    }

    pub async fn delete_school(
        &self,
        school_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_school(self, school_id, request).await
    }
}
