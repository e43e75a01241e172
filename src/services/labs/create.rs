use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::LabService;
use crate::models::{
    ApiResponse, ErrorCode,
    labs::{requests::CreateLabRequest, responses::LabResponse},
};
use crate::services::{
    activity::ActivityLogger, bad_request, courses::can_manage_course, forbidden, internal_error,
    not_found, require_identity,
};

pub async fn create_lab(
    service: &LabService,
    lab: CreateLabRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);

    if let Err(msg) = lab.validate() {
        return Ok(bad_request(ErrorCode::LabValidationFailed, msg));
    }

    let storage = service.get_storage(request);

    match storage.get_course_by_id(lab.course_id).await {
        Ok(Some(course)) if !can_manage_course(&identity, &course) => {
            return Ok(forbidden("Only the course instructor can create labs"));
        }
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => return Ok(internal_error("Failed to create lab", &e)),
    }

    match storage.create_lab(lab, Some(identity.user_id)).await {
        Ok(detail) => {
            let entry = ActivityLogger::entry(request, "lab.create")
                .resource("lab", detail.lab.id)
                .details(serde_json::json!({
                    "course_id": detail.lab.course_id,
                    "criteria": detail.criteria.len(),
                }));
            ActivityLogger::log(storage.as_ref(), entry).await;

            Ok(HttpResponse::Created().json(ApiResponse::success(
                LabResponse { lab: detail },
                "Lab created successfully",
            )))
        }
        Err(e) => Ok(internal_error("Failed to create lab", &e)),
    }
}
