use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SchoolService;
use crate::models::{
    ApiResponse, ErrorCode,
    schools::{requests::SchoolPayload, responses::SchoolResponse},
};
use crate::services::{activity::ActivityLogger, bad_request, internal_error};

pub async fn create_school(
    service: &SchoolService,
    payload: SchoolPayload,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let record = match payload.into_record() {
        Ok(record) => record,
        Err(msg) => return Ok(bad_request(ErrorCode::SchoolValidationFailed, msg)),
    };

    let storage = service.get_storage(request);

    match storage.create_school(record).await {
        Ok(school) => {
            info!("School {} created", school.school_code);
            let entry = ActivityLogger::entry(request, "school.create")
                .resource("school", school.id)
                .details(serde_json::json!({ "school_code": school.school_code }));
            ActivityLogger::log(storage.as_ref(), entry).await;

            Ok(HttpResponse::Created().json(ApiResponse::success(
                SchoolResponse { school },
                "School created successfully",
            )))
        }
        Err(e) if e.is_conflict() => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::SchoolAlreadyExists,
            "School code already exists",
        ))),
        Err(e) => Ok(internal_error("Failed to create school", &e)),
    }
}

pub async fn upsert_school(
    service: &SchoolService,
    payload: SchoolPayload,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let record = match payload.into_record() {
        Ok(record) => record,
        Err(msg) => return Ok(bad_request(ErrorCode::SchoolValidationFailed, msg)),
    };

    let storage = service.get_storage(request);

    match storage.upsert_school(record).await {
        Ok(school) => {
            let entry = ActivityLogger::entry(request, "school.upsert")
                .resource("school", school.id);
            ActivityLogger::log(storage.as_ref(), entry).await;

            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SchoolResponse { school },
                "School saved successfully",
            )))
        }
        Err(e) => Ok(internal_error("Failed to save school", &e)),
    }
}
