use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ActivityLogService;
use crate::models::{ApiResponse, ErrorCode, activity_logs::requests::CreateActivityLogRequest};
use crate::services::{bad_request, internal_error, require_identity};
use crate::services::activity::ActivityLogger;

const MAX_ACTION_LEN: usize = 100;

pub async fn create_log(
    service: &ActivityLogService,
    log: CreateActivityLogRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);

    let action = log.action.trim();
    if action.is_empty() || action.len() > MAX_ACTION_LEN {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "action must be between 1 and 100 characters",
        ));
    }

    let mut entry = ActivityLogger::entry(request, action).user(Some(identity.user_id));
    entry.resource_type = log.resource_type;
    entry.resource_id = log.resource_id;
    entry.details = log.details;

    let storage = service.get_storage(request);

    // 客户端上报需要确认写入结果
    match storage.insert_activity_log(entry).await {
        Ok(()) => Ok(HttpResponse::Created().json(ApiResponse::success_empty("Activity recorded"))),
        Err(e) => Ok(internal_error("Failed to record activity", &e)),
    }
}
