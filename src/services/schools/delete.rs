use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SchoolService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{activity::ActivityLogger, internal_error, not_found};

pub async fn delete_school(
    service: &SchoolService,
    school_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_school(school_id).await {
        Ok(true) => {
            let entry = ActivityLogger::entry(request, "school.delete")
                .resource("school", school_id);
            ActivityLogger::log(storage.as_ref(), entry).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("School deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::SchoolNotFound, "School not found")),
        Err(e) => Ok(internal_error("Failed to delete school", &e)),
    }
}
