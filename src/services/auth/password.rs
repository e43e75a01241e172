use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::{ApiResponse, ErrorCode, auth::requests::ChangePasswordRequest};
use crate::services::{activity::ActivityLogger, internal_error, require_identity, unauthorized};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::session_token;
use crate::utils::validate::validate_password_simple;

use super::AuthService;

/// 修改密码后注销该用户全部会话（含当前会话）
pub async fn handle_change_password(
    service: &AuthService,
    change_request: ChangePasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);
    if identity.is_guest {
        return Ok(unauthorized());
    }

    if let Err(msg) = validate_password_simple(&change_request.new_password) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PasswordPolicyViolation,
            msg,
        )));
    }

    let storage = service.get_storage(request);

    let user = match storage.get_user_by_id(identity.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(unauthorized()),
        Err(e) => return Ok(internal_error("Failed to change password", &e)),
    };

    if !verify_password(&change_request.current_password, &user.password_hash) {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            "Current password is incorrect",
        )));
    }

    let password_hash = match hash_password(&change_request.new_password) {
        Ok(hash) => hash,
        Err(e) => return Ok(internal_error("Failed to hash password", &e)),
    };

    let revoked = match storage.change_password(user.id, password_hash).await {
        Ok(tokens) => tokens,
        Err(e) => return Ok(internal_error("Failed to change password", &e)),
    };
    service.forget_tokens(request, &revoked).await;

    let entry = ActivityLogger::entry(request, "auth.password_change")
        .resource("user", user.id)
        .details(serde_json::json!({ "revoked_sessions": revoked.len() }));
    ActivityLogger::log(storage.as_ref(), entry).await;

    info!(
        "User {} changed password, {} sessions revoked",
        user.username,
        revoked.len()
    );

    Ok(HttpResponse::Ok()
        .cookie(session_token::clear_session_cookie())
        .json(ApiResponse::<()>::success_empty(
            "Password changed, please log in again",
        )))
}
