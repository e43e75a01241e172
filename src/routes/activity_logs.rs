use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::activity_logs::requests::{ActivityLogListParams, CreateActivityLogRequest};
use crate::services::ActivityLogService;

static ACTIVITY_LOG_SERVICE: Lazy<ActivityLogService> = Lazy::new(ActivityLogService::new_lazy);

pub async fn list_logs(
    req: HttpRequest,
    query: web::Query<ActivityLogListParams>,
) -> ActixResult<HttpResponse> {
    ACTIVITY_LOG_SERVICE.list_logs(query.into_inner(), &req).await
}

pub async fn create_log(
    req: HttpRequest,
    log: web::Json<CreateActivityLogRequest>,
) -> ActixResult<HttpResponse> {
    ACTIVITY_LOG_SERVICE.create_log(log.into_inner(), &req).await
}

pub fn configure_activity_log_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/activity-logs")
            .wrap(middlewares::RequireSession::new())
            .service(
                web::resource("")
                    .route(web::get().to(list_logs))
                    .route(
                        web::post()
                            .to(create_log)
                            .wrap(middlewares::RateLimit::api()),
                    ),
            ),
    );
}
