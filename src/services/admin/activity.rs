use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AdminService;
use crate::models::{
    ApiResponse,
    activity_logs::{
        entities::Severity,
        requests::{ActivityLogListParams, SecurityEventRequest},
    },
};
use crate::services::{activity::ActivityLogger, internal_error};

pub async fn list_activity(
    service: &AdminService,
    query: ActivityLogListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_activity_logs(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Activity logs retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve activity logs", &e)),
    }
}

/// 写入失败同样返回成功
pub async fn log_security_event(
    service: &AdminService,
    event: SecurityEventRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let mut entry = ActivityLogger::entry(request, event.action.trim())
        .resource_type("security")
        .severity(event.severity.unwrap_or(Severity::Medium));
    if event.user_id.is_some() {
        entry = entry.user(event.user_id);
    }
    if let Some(ip) = event.ip.filter(|ip| !ip.is_empty()) {
        entry.ip_address = Some(ip);
    }
    if let Some(details) = event.details {
        entry = entry.details(details);
    }
    ActivityLogger::log(storage.as_ref(), entry).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Security event recorded")))
}
