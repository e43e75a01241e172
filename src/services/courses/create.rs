use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseService;
use crate::models::{
    ApiResponse, ErrorCode,
    courses::{requests::CreateCourseRequest, responses::CourseDetailResponse},
};
use crate::services::{
    activity::ActivityLogger, bad_request, internal_error, require_identity,
};

pub async fn create_course(
    service: &CourseService,
    mut course: CreateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);

    if let Err(msg) = course.validate() {
        return Ok(bad_request(ErrorCode::CourseValidationFailed, msg));
    }
    course.code = course.code.trim().to_string();
    course.title = course.title.trim().to_string();
    // 未指定任课教师时为创建者
    if course.instructor_id.is_none() && !identity.is_admin() {
        course.instructor_id = Some(identity.user_id);
    }

    let storage = service.get_storage(request);

    match storage.create_course(course).await {
        Ok(detail) => {
            info!(
                "Course {} created with {} schedules",
                detail.course.code,
                detail.schedules.len()
            );
            let entry = ActivityLogger::entry(request, "course.create")
                .resource("course", detail.course.id)
                .details(serde_json::json!({
                    "code": detail.course.code,
                    "schedules": detail.schedules.len(),
                }));
            ActivityLogger::log(storage.as_ref(), entry).await;

            Ok(HttpResponse::Created().json(ApiResponse::success(
                CourseDetailResponse { course: detail },
                "Course created successfully",
            )))
        }
        Err(e) if e.is_conflict() => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::CourseAlreadyExists,
            "Course code already exists",
        ))),
        Err(crate::errors::VLabError::Validation(msg)) => {
            Ok(bad_request(ErrorCode::CourseValidationFailed, msg))
        }
        Err(e) => Ok(internal_error("Failed to create course", &e)),
    }
}
