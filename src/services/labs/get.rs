use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::LabService;
use crate::models::{ApiResponse, ErrorCode, labs::responses::LabResponse};
use crate::services::{internal_error, not_found, require_identity};

pub async fn get_lab(
    service: &LabService,
    lab_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);
    let storage = service.get_storage(request);

    match storage.get_lab_detail(lab_id).await {
        // 未发布的实验对学生不可见
        Ok(Some(detail)) if identity.is_student() && !detail.lab.is_published => {
            Ok(not_found(ErrorCode::LabNotFound, "Lab not found"))
        }
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            LabResponse { lab: detail },
            "Lab retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::LabNotFound, "Lab not found")),
        Err(e) => Ok(internal_error("Failed to retrieve lab", &e)),
    }
}
