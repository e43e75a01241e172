use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SchoolService;
use crate::models::{
    ApiResponse, ErrorCode,
    schools::{requests::UpdateSchoolRequest, responses::SchoolResponse},
};
use crate::services::{activity::ActivityLogger, bad_request, internal_error, not_found};
use crate::utils::validate::validate_email;

pub async fn update_school(
    service: &SchoolService,
    school_id: i64,
    update: UpdateSchoolRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(name) = &update.school_name
        && name.trim().is_empty()
    {
        return Ok(bad_request(
            ErrorCode::SchoolValidationFailed,
            "school_name must not be empty",
        ));
    }
    if let Some(email) = update.email.as_deref().filter(|e| !e.is_empty())
        && let Err(msg) = validate_email(email)
    {
        return Ok(bad_request(ErrorCode::SchoolValidationFailed, msg));
    }

    let storage = service.get_storage(request);

    match storage.update_school(school_id, update).await {
        Ok(Some(school)) => {
            let entry = ActivityLogger::entry(request, "school.update")
                .resource("school", school.id);
            ActivityLogger::log(storage.as_ref(), entry).await;

            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SchoolResponse { school },
                "School updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::SchoolNotFound, "School not found")),
        Err(e) => Ok(internal_error("Failed to update school", &e)),
    }
}
