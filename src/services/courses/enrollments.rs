use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::{
    ApiResponse, ErrorCode,
    courses::{
        requests::EnrollStudentRequest,
        responses::{EnrollmentListResponse, EnrollmentResponse},
    },
};
use crate::services::{activity::ActivityLogger, bad_request, internal_error, not_found};
use crate::storage::EnrollOutcome;

pub async fn list_enrollments(
    service: &CourseService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_course_by_id(course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => return Ok(internal_error("Failed to retrieve enrollments", &e)),
    }

    match storage.list_enrollments(course_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            EnrollmentListResponse { items },
            "Enrollments retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve enrollments", &e)),
    }
}

pub async fn enroll_student(
    service: &CourseService,
    course_id: i64,
    enroll: EnrollStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_course_by_id(course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => return Ok(internal_error("Failed to enroll student", &e)),
    }

    match storage.enroll_student(course_id, enroll.student_id).await {
        Ok(EnrollOutcome::Enrolled(enrollment)) => {
            let entry = ActivityLogger::entry(request, "course.enroll")
                .resource("course", course_id)
                .details(serde_json::json!({ "student_id": enroll.student_id }));
            ActivityLogger::log(storage.as_ref(), entry).await;

            Ok(HttpResponse::Created().json(ApiResponse::success(
                EnrollmentResponse { enrollment },
                "Student enrolled successfully",
            )))
        }
        Ok(EnrollOutcome::StudentNotFound) => Ok(bad_request(
            ErrorCode::UserNotFound,
            "Student does not exist",
        )),
        Ok(EnrollOutcome::NotAStudent) => Ok(bad_request(
            ErrorCode::RoleInvalid,
            "User does not hold the student role",
        )),
        Ok(EnrollOutcome::AlreadyEnrolled) => {
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::EnrollmentExists,
                "Student is already enrolled in this course",
            )))
        }
        Err(e) => Ok(internal_error("Failed to enroll student", &e)),
    }
}

pub async fn drop_enrollment(
    service: &CourseService,
    course_id: i64,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.drop_enrollment(course_id, student_id).await {
        Ok(true) => {
            let entry = ActivityLogger::entry(request, "course.drop")
                .resource("course", course_id)
                .details(serde_json::json!({ "student_id": student_id }));
            ActivityLogger::log(storage.as_ref(), entry).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Enrollment dropped")))
        }
        Ok(false) => Ok(not_found(ErrorCode::NotFound, "Enrollment not found")),
        Err(e) => Ok(internal_error("Failed to drop enrollment", &e)),
    }
}
