use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ActivityLogService;
use crate::models::{ApiResponse, activity_logs::requests::ActivityLogListParams};
use crate::services::{internal_error, require_identity};

/// 非管理员只能查看自己的日志
pub async fn list_logs(
    service: &ActivityLogService,
    mut query: ActivityLogListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);
    if !identity.is_admin() || query.user_id.is_none() {
        query.user_id = Some(identity.user_id);
    }

    let storage = service.get_storage(request);

    match storage.list_activity_logs(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Activity logs retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve activity logs", &e)),
    }
}
