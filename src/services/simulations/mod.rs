pub mod create;
pub mod get;
pub mod list;
pub mod progress;
pub mod update;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    auth::entities::Identity,
    simulations::{
        entities::Simulation,
        requests::{
            CreateSimulationRequest, SimulationListParams, UpdateProgressRequest,
            UpdateSimulationRequest,
        },
    },
};
use crate::storage::Storage;

pub struct SimulationService {
    storage: Option<Arc<dyn Storage>>,
}

/// 未发布的仿真仅对 simulations.manage 持有者可见
pub fn can_view_simulation(identity: Option<&Identity>, simulation: &Simulation) -> bool {
    if simulation.is_published {
        return true;
    }
    identity.is_some_and(|i| i.has_permission("simulations.manage"))
}

impl SimulationService {
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

    // 公开仿真列表
    pub async fn list_public(
        &self,
        query: SimulationListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_public(self, query, request).await
    }

    // 公开仿真按学科统计
    pub async fn public_stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::public_stats(self, request).await
    }

    pub async fn list_simulations(
        &self,
        query: SimulationListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_simulations(self, query, request).await
    }

    pub async fn create_simulation(
        &self,
        simulation: CreateSimulationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_simulation(self, simulation, request).await
    }

    pub async fn get_simulation(
        &self,
        simulation_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_simulation(self, simulation_id, request).await
    }

    pub async fn update_simulation(
        &self,
        simulation_id: i64,
        update: UpdateSimulationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_simulation(self, simulation_id, update, request).await
    }

    pub async fn delete_simulation(
        &self,
        simulation_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::delete_simulation(self, simulation_id, request).await
    }

    // 开始仿真（访客可用）
    pub async fn start_simulation(
        &self,
        simulation_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        progress::start_simulation(self, simulation_id, request).await
    }

    // 进度上报
    pub async fn update_progress(
        &self,
        simulation_id: i64,
        update: UpdateProgressRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        progress::update_progress(self, simulation_id, update, request).await
    }

    // 使用统计
    pub async fn usage_stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        progress::usage_stats(self, request).await
    }

    // 上传配置
    pub async fn upload_config(&self) -> ActixResult<HttpResponse> {
        upload::upload_config().await
    }

    // 上传仿真页面或图片
    pub async fn upload(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        upload::handle_upload(self, request, payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::entities::fixtures::identity_with;

    fn simulation(is_published: bool) -> Simulation {
        Simulation {
            id: 1,
            slug: "pendulum".into(),
            title: "Pendulum".into(),
            description: None,
            subject: Some("physics".into()),
            grade_level: None,
            simulation_url: Some("/uploads/simulations/pendulum.html".into()),
            thumbnail_url: None,
            is_published,
            allow_guest: true,
            created_by: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_unpublished_visibility() {
        let student = identity_with(3, &["student"], &["simulations.read"]);
        let teacher = identity_with(2, &["teacher"], &["simulations.manage"]);
        assert!(can_view_simulation(None, &simulation(true)));
        assert!(!can_view_simulation(Some(&student), &simulation(false)));
        assert!(can_view_simulation(Some(&teacher), &simulation(false)));
        assert!(!can_view_simulation(None, &simulation(false)));
    }
}
