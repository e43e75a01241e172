pub mod analytics;
pub mod attempts;
pub mod create;
pub mod get;
pub mod grading;
pub mod list;
pub mod scoring;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    auth::entities::Identity,
    labs::requests::{
        AnnotateRequest, CreateLabRequest, LabListParams, ManualScoreRequest, ScoreLabRequest,
        StopLabRequest, SubmitLabRequest, UpdateLabRequest,
    },
};
use crate::storage::{ScoreActor, Storage};

pub struct LabService {
    storage: Option<Arc<dyn Storage>>,
}

/// 评分人：管理员或持有 scores.grade_all 可评任意课程
pub fn score_actor(identity: &Identity) -> ScoreActor {
    ScoreActor {
        user_id: identity.user_id,
        can_grade_all: identity.is_admin() || identity.has_permission("scores.grade_all"),
    }
}

/// 教师视角：可以查看全部成绩
pub fn is_grader(identity: &Identity) -> bool {
    identity.is_admin() || identity.has_permission("scores.grade")
}

impl LabService {
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

    pub async fn list_labs(
        &self,
        query: LabListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_labs(self, query, request).await
    }

    // 创建实验及评分标准
    pub async fn create_lab(
        &self,
        lab: CreateLabRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_lab(self, lab, request).await
    }

    pub async fn get_lab(&self, lab_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_lab(self, lab_id, request).await
    }

    pub async fn update_lab(
        &self,
        lab_id: i64,
        update: UpdateLabRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_lab(self, lab_id, update, request).await
    }

    pub async fn delete_lab(
        &self,
        lab_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::delete_lab(self, lab_id, request).await
    }

    // 开始或恢复作答
    pub async fn start_lab(&self, lab_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        attempts::start_lab(self, lab_id, request).await
    }

    // 自动保存或正式提交
    pub async fn submit_lab(
        &self,
        lab_id: i64,
        submit: SubmitLabRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        attempts::submit_lab(self, lab_id, submit, request).await
    }

    pub async fn stop_lab(
        &self,
        lab_id: i64,
        stop: StopLabRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        attempts::stop_lab(self, lab_id, stop, request).await
    }

    pub async fn score_lab(
        &self,
        lab_id: i64,
        score: ScoreLabRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grading::score_lab(self, lab_id, score, request).await
    }

    // 学生看自己的成绩，教师看全部及统计
    pub async fn get_scores(&self, lab_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        grading::get_scores(self, lab_id, request).await
    }

    pub async fn set_manual_score(
        &self,
        lab_id: i64,
        student_id: i64,
        score: ManualScoreRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grading::set_manual_score(self, lab_id, student_id, score, request).await
    }

    // 逐项批注
    pub async fn annotate(
        &self,
        lab_id: i64,
        student_id: i64,
        annotation: AnnotateRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grading::annotate(self, lab_id, student_id, annotation, request).await
    }

    pub async fn analytics(&self, lab_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        analytics::lab_analytics(self, lab_id, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::entities::fixtures::identity_with;

    #[test]
    fn test_score_actor() {
        let teacher = score_actor(&identity_with(2, &["teacher"], &["scores.grade"]));
        assert_eq!(teacher.user_id, 2);
        assert!(!teacher.can_grade_all);
        assert!(score_actor(&identity_with(4, &["principal"], &["scores.grade_all"])).can_grade_all);
        assert!(score_actor(&identity_with(1, &["admin"], &[])).can_grade_all);
    }

    #[test]
    fn test_grader_view() {
        assert!(is_grader(&identity_with(2, &["teacher"], &["scores.grade"])));
        assert!(!is_grader(&identity_with(3, &["student"], &["scores.read"])));
    }
}
