use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SessionService;
use crate::models::{
    ApiResponse, ErrorCode,
    activity_logs::entities::Severity,
    sessions::{
        requests::BulkRevokeRequest,
        responses::{SessionCleanupResponse, SessionRevokeResponse},
    },
};
use crate::services::auth::session::forget_tokens;
use crate::services::{activity::ActivityLogger, bad_request, internal_error, not_found};

pub async fn revoke_session(
    service: &SessionService,
    session_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.deactivate_sessions(&[session_id]).await {
        Ok(tokens) if tokens.is_empty() => Ok(not_found(
            ErrorCode::NotFound,
            "Session not found or already inactive",
        )),
        Ok(tokens) => {
            forget_tokens(request, &tokens).await;
            let entry = ActivityLogger::entry(request, "session.revoke")
                .resource("session", session_id)
                .severity(Severity::Medium);
            ActivityLogger::log(storage.as_ref(), entry).await;

            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SessionRevokeResponse { revoked: 1 },
                "Session revoked",
            )))
        }
        Err(e) => Ok(internal_error("Failed to revoke session", &e)),
    }
}

pub async fn bulk_revoke(
    service: &SessionService,
    bulk: BulkRevokeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = bulk.validate() {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request);

    match storage.deactivate_sessions(&bulk.session_ids).await {
        Ok(tokens) => {
            forget_tokens(request, &tokens).await;
            let revoked = tokens.len() as u64;
            let entry = ActivityLogger::entry(request, "session.bulk_revoke")
                .resource_type("session")
                .severity(Severity::Medium)
                .details(serde_json::json!({
                    "requested": bulk.session_ids.len(),
                    "revoked": revoked,
                }));
            ActivityLogger::log(storage.as_ref(), entry).await;

            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SessionRevokeResponse { revoked },
                format!("{revoked} sessions revoked"),
            )))
        }
        Err(e) => Ok(internal_error("Failed to revoke sessions", &e)),
    }
}

pub async fn cleanup_expired(
    service: &SessionService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.cleanup_expired_sessions().await {
        Ok(cleaned) => {
            info!("Cleaned up {} expired sessions", cleaned);
            let entry = ActivityLogger::entry(request, "session.cleanup")
                .resource_type("session")
                .details(serde_json::json!({ "cleaned": cleaned }));
            ActivityLogger::log(storage.as_ref(), entry).await;

            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SessionCleanupResponse { cleaned },
                "Expired sessions cleaned up",
            )))
        }
        Err(e) => Ok(internal_error("Failed to clean up sessions", &e)),
    }
}
