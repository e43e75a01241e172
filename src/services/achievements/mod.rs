pub mod award;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::achievements::requests::{AwardAchievementRequest, CreateAchievementRequest};
use crate::storage::Storage;

pub struct AchievementService {
    storage: Option<Arc<dyn Storage>>,
}

impl AchievementService {
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

    pub async fn list_achievements(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_achievements(self, request).await
    }

    pub async fn create_achievement(
        &self,
        achievement: CreateAchievementRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        award::create_achievement(self, achievement, request).await
    }

    pub async fn award_achievement(
        &self,
        award: AwardAchievementRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        award::award_achievement(self, award, request).await
    }

    // 学生本人、关联家长或教职工可查看
    pub async fn student_achievements(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::student_achievements(self, student_id, request).await
    }
}
