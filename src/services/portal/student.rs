use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PortalService;
use crate::models::{ApiResponse, portal::responses::StudentProgressResponse};
use crate::services::{internal_error, require_identity};

pub async fn student_stats(
    service: &PortalService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);
    let storage = service.get_storage(request);

    match storage.student_stats(identity.user_id).await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            stats,
            "Student statistics retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve student statistics", &e)),
    }
}

pub async fn student_progress(
    service: &PortalService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);
    let storage = service.get_storage(request);

    match storage.student_course_progress(identity.user_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentProgressResponse { items },
            "Course progress retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve course progress", &e)),
    }
}
