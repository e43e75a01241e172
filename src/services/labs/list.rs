use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::LabService;
use crate::models::{
    ApiResponse,
    labs::{requests::LabListParams, responses::LabListResponse},
};
use crate::services::{internal_error, require_identity};
use crate::storage::LabVisibility;

pub async fn list_labs(
    service: &LabService,
    query: LabListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);
    let storage = service.get_storage(request);

    // 学生只看已选课程中已发布的实验
    let visibility = if identity.is_student() && !identity.is_admin() {
        LabVisibility::PublishedForStudent(identity.user_id)
    } else {
        LabVisibility::All
    };

    match storage.list_labs(query.course_id, visibility).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            LabListResponse { items },
            "Labs retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve labs", &e)),
    }
}
