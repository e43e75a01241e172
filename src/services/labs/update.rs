use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::LabService;
use crate::models::{
    ApiResponse, ErrorCode,
    labs::{requests::UpdateLabRequest, responses::LabResponse},
};
use crate::services::{activity::ActivityLogger, bad_request, internal_error, not_found};

pub async fn update_lab(
    service: &LabService,
    lab_id: i64,
    update: UpdateLabRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Ok(bad_request(
            ErrorCode::LabValidationFailed,
            "title must not be empty",
        ));
    }
    if update.max_attempts.is_some_and(|n| n < 1) {
        return Ok(bad_request(
            ErrorCode::LabValidationFailed,
            "max_attempts must be at least 1",
        ));
    }

    let storage = service.get_storage(request);

    match storage.update_lab(lab_id, update).await {
        Ok(Some(lab)) => {
            let entry = ActivityLogger::entry(request, "lab.update").resource("lab", lab.id);
            ActivityLogger::log(storage.as_ref(), entry).await;

            match storage.get_lab_detail(lab.id).await {
                Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                    LabResponse { lab: detail },
                    "Lab updated successfully",
                ))),
                Ok(None) => Ok(not_found(ErrorCode::LabNotFound, "Lab not found")),
                Err(e) => Ok(internal_error("Failed to retrieve lab", &e)),
            }
        }
        Ok(None) => Ok(not_found(ErrorCode::LabNotFound, "Lab not found")),
        Err(e) => Ok(internal_error("Failed to update lab", &e)),
    }
}

pub async fn delete_lab(
    service: &LabService,
    lab_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_lab(lab_id).await {
        Ok(true) => {
            let entry = ActivityLogger::entry(request, "lab.delete").resource("lab", lab_id);
            ActivityLogger::log(storage.as_ref(), entry).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Lab deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::LabNotFound, "Lab not found")),
        Err(e) => Ok(internal_error("Failed to delete lab", &e)),
    }
}
