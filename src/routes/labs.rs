use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequirePermission};
use crate::models::{
    labs::requests::{
        AnnotateRequest, CreateLabRequest, LabListParams, ManualScoreRequest, ScoreLabRequest,
        StopLabRequest, SubmitLabRequest, UpdateLabRequest,
    },
    users::entities::UserRole,
};
use crate::services::LabService;
use crate::utils::{SafeIDI64, SafeStudentIdI64};

static LAB_SERVICE: Lazy<LabService> = Lazy::new(LabService::new_lazy);

pub async fn list_labs(
    req: HttpRequest,
    query: web::Query<LabListParams>,
) -> ActixResult<HttpResponse> {
    LAB_SERVICE.list_labs(query.into_inner(), &req).await
}

pub async fn create_lab(
    req: HttpRequest,
    lab: web::Json<CreateLabRequest>,
) -> ActixResult<HttpResponse> {
    LAB_SERVICE.create_lab(lab.into_inner(), &req).await
}

pub async fn get_lab(req: HttpRequest, lab_id: SafeIDI64) -> ActixResult<HttpResponse> {
    LAB_SERVICE.get_lab(lab_id.0, &req).await
}

pub async fn update_lab(
    req: HttpRequest,
    lab_id: SafeIDI64,
    update: web::Json<UpdateLabRequest>,
) -> ActixResult<HttpResponse> {
    LAB_SERVICE
        .update_lab(lab_id.0, update.into_inner(), &req)
        .await
}

pub async fn delete_lab(req: HttpRequest, lab_id: SafeIDI64) -> ActixResult<HttpResponse> {
    LAB_SERVICE.delete_lab(lab_id.0, &req).await
}

pub async fn start_lab(req: HttpRequest, lab_id: SafeIDI64) -> ActixResult<HttpResponse> {
    LAB_SERVICE.start_lab(lab_id.0, &req).await
}

pub async fn submit_lab(
    req: HttpRequest,
    lab_id: SafeIDI64,
    submit: web::Json<SubmitLabRequest>,
) -> ActixResult<HttpResponse> {
    LAB_SERVICE
        .submit_lab(lab_id.0, submit.into_inner(), &req)
        .await
}

pub async fn stop_lab(
    req: HttpRequest,
    lab_id: SafeIDI64,
    stop: web::Json<StopLabRequest>,
) -> ActixResult<HttpResponse> {
    LAB_SERVICE.stop_lab(lab_id.0, stop.into_inner(), &req).await
}

pub async fn score_lab(
    req: HttpRequest,
    lab_id: SafeIDI64,
    score: web::Json<ScoreLabRequest>,
) -> ActixResult<HttpResponse> {
    LAB_SERVICE
        .score_lab(lab_id.0, score.into_inner(), &req)
        .await
}

pub async fn get_scores(req: HttpRequest, lab_id: SafeIDI64) -> ActixResult<HttpResponse> {
    LAB_SERVICE.get_scores(lab_id.0, &req).await
}

pub async fn set_manual_score(
    req: HttpRequest,
    lab_id: SafeIDI64,
    student_id: SafeStudentIdI64,
    score: web::Json<ManualScoreRequest>,
) -> ActixResult<HttpResponse> {
    LAB_SERVICE
        .set_manual_score(lab_id.0, student_id.0, score.into_inner(), &req)
        .await
}

pub async fn annotate(
    req: HttpRequest,
    lab_id: SafeIDI64,
    student_id: SafeStudentIdI64,
    annotation: web::Json<AnnotateRequest>,
) -> ActixResult<HttpResponse> {
    LAB_SERVICE
        .annotate(lab_id.0, student_id.0, annotation.into_inner(), &req)
        .await
}

pub async fn analytics(req: HttpRequest, lab_id: SafeIDI64) -> ActixResult<HttpResponse> {
    LAB_SERVICE.analytics(lab_id.0, &req).await
}

pub fn configure_lab_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/labs")
            .wrap(middlewares::RequireSession::new())
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_labs)
                            .wrap(RequirePermission::new("labs.read")),
                    )
                    .route(
                        web::post()
                            .to(create_lab)
                            .wrap(RequirePermission::new("labs.create")),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::get()
                            .to(get_lab)
                            .wrap(RequirePermission::new("labs.read")),
                    )
                    .route(
                        web::put()
                            .to(update_lab)
                            .wrap(RequirePermission::new("labs.update")),
                    )
                    .route(
                        web::delete()
                            .to(delete_lab)
                            .wrap(RequirePermission::new("labs.delete")),
                    ),
            )
            // 学生作答
            .service(
                web::resource("/{id}/start")
                    .route(web::post().to(start_lab))
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
            )
            .service(
                web::resource("/{id}/submit")
                    .route(web::post().to(submit_lab))
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
            )
            .service(
                web::resource("/{id}/stop")
                    .route(web::post().to(stop_lab))
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
            )
            .service(
                web::resource("/{id}/score")
                    // 学生看自己的成绩，评分人看全部
                    .route(
                        web::get()
                            .to(get_scores)
                            .wrap(RequirePermission::new("scores.read")),
                    )
                    .route(
                        web::post()
                            .to(score_lab)
                            .wrap(RequirePermission::new("scores.grade")),
                    ),
            )
            .service(
                web::resource("/{id}/score/{student_id}").route(
                    web::put()
                        .to(set_manual_score)
                        .wrap(RequirePermission::new("scores.grade")),
                ),
            )
            .service(
                web::resource("/{id}/annotate/{student_id}").route(
                    web::post()
                        .to(annotate)
                        .wrap(RequirePermission::new("scores.grade")),
                ),
            )
            .service(
                web::resource("/{id}/analytics")
                    .route(web::get().to(analytics))
                    .wrap(RequirePermission::new("analytics.read")),
            ),
    );
}
