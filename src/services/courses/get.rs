use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::{ApiResponse, ErrorCode, courses::responses::CourseDetailResponse};
use crate::services::{forbidden, internal_error, not_found, require_identity};

pub async fn get_course(
    service: &CourseService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);
    let storage = service.get_storage(request);

    let detail = match storage.get_course_detail(course_id).await {
        Ok(Some(detail)) => detail,
        Ok(None) => return Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => return Ok(internal_error("Failed to retrieve course", &e)),
    };

    // 学生只能查看已选课程
    if identity.is_student() && !identity.is_admin() {
        match storage.is_enrolled(course_id, identity.user_id).await {
            Ok(true) => {}
            Ok(false) => return Ok(forbidden("You are not enrolled in this course")),
            Err(e) => return Ok(internal_error("Failed to retrieve course", &e)),
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CourseDetailResponse { course: detail },
        "Course retrieved successfully",
    )))
}
