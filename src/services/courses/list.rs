use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CourseService, course_visibility};
use crate::models::{ApiResponse, courses::requests::CourseListParams};
use crate::services::{internal_error, require_identity};

pub async fn list_courses(
    service: &CourseService,
    query: CourseListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);
    let storage = service.get_storage(request);

    match storage
        .list_courses_with_pagination(query, course_visibility(&identity))
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Course list retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve course list", &e)),
    }
}
