use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CourseService, can_manage_course};
use crate::models::{
    ApiResponse, ErrorCode,
    courses::{requests::UpdateCourseRequest, responses::CourseResponse},
};
use crate::services::{
    activity::ActivityLogger, bad_request, forbidden, internal_error, not_found, require_identity,
};

pub async fn update_course(
    service: &CourseService,
    course_id: i64,
    update: UpdateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);

    if let Some(title) = &update.title
        && title.trim().is_empty()
    {
        return Ok(bad_request(
            ErrorCode::CourseValidationFailed,
            "title must not be empty",
        ));
    }

    let storage = service.get_storage(request);

    match storage.get_course_by_id(course_id).await {
        Ok(Some(course)) if !can_manage_course(&identity, &course) => {
            return Ok(forbidden("Only the course instructor can update this course"));
        }
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => return Ok(internal_error("Failed to update course", &e)),
    }

    match storage.update_course(course_id, update).await {
        Ok(Some(course)) => {
            let entry = ActivityLogger::entry(request, "course.update")
                .resource("course", course.id);
            ActivityLogger::log(storage.as_ref(), entry).await;

            Ok(HttpResponse::Ok().json(ApiResponse::success(
                CourseResponse { course },
                "Course updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => Ok(internal_error("Failed to update course", &e)),
    }
}

pub async fn delete_course(
    service: &CourseService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);
    let storage = service.get_storage(request);

    match storage.get_course_by_id(course_id).await {
        Ok(Some(course)) if !can_manage_course(&identity, &course) => {
            return Ok(forbidden("Only the course instructor can delete this course"));
        }
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => return Ok(internal_error("Failed to delete course", &e)),
    }

    match storage.delete_course(course_id).await {
        Ok(true) => {
            let entry = ActivityLogger::entry(request, "course.delete")
                .resource("course", course_id);
            ActivityLogger::log(storage.as_ref(), entry).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Course deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => Ok(internal_error("Failed to delete course", &e)),
    }
}
