use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::services::PortalService;
use crate::utils::SafeIDI64;

static PORTAL_SERVICE: Lazy<PortalService> = Lazy::new(PortalService::new_lazy);

pub async fn student_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    PORTAL_SERVICE.student_stats(&req).await
}

pub async fn student_progress(req: HttpRequest) -> ActixResult<HttpResponse> {
    PORTAL_SERVICE.student_progress(&req).await
}

pub async fn children(req: HttpRequest) -> ActixResult<HttpResponse> {
    PORTAL_SERVICE.children(&req).await
}

pub async fn child_grades(req: HttpRequest, student_id: SafeIDI64) -> ActixResult<HttpResponse> {
    PORTAL_SERVICE.child_grades(student_id.0, &req).await
}

pub fn configure_portal_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/student")
            .wrap(middlewares::RequireRole::new_any(UserRole::student_roles()))
            .wrap(middlewares::RequireSession::new())
            .route("/stats", web::get().to(student_stats))
            .route("/progress", web::get().to(student_progress)),
    )
    .service(
        web::scope("/api/parent")
            .wrap(middlewares::RequireRole::new_any(UserRole::parent_roles()))
            .wrap(middlewares::RequireSession::new())
            .route("/children", web::get().to(children))
            .route("/child/{id}/grades", web::get().to(child_grades)),
    );
}
